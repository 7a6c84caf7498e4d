use std::time::Duration;

/// The `Snag` enum holds every way an `offload` operation can go sideways.
///
/// Library code propagates a `Snag` with `?`.  The demo surfaces, the [`crate::Director`] and the
/// binary, catch it and log a warning instead of handing it to the user, because a demo that
/// stops on a hiccup demonstrates nothing.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum Snag {
    #[display("io error: {_0}")]
    #[from]
    Io(std::io::Error),
    #[display("json error: {_0}")]
    #[from]
    Json(serde_json::Error),
    #[display("csv error: {_0}")]
    #[from]
    Csv(csv::Error),
    #[display("config error: {_0}")]
    #[from]
    Config(config::ConfigError),
    #[display("task failed to join: {_0}")]
    #[from]
    Join(tokio::task::JoinError),
    #[display("no tokio runtime to dispatch from: {_0}")]
    #[from]
    NoRuntime(tokio::runtime::TryCurrentError),
    #[display("waiting thread never got its signal: {_0}")]
    #[from]
    Recv(std::sync::mpsc::RecvError),
    /// The signal channel to the [`crate::Director`] is closed.
    #[display("signal channel closed")]
    Closed,
    /// A dispatched unit ran past its time limit.
    #[display("unit exceeded its time limit of {_0:?}")]
    TimeLimit(#[error(not(source))] Duration),
    /// A dispatched unit was cancelled before it finished.
    #[display("unit cancelled")]
    Cancelled,
    /// A unit reported its own failure.
    #[display("unit failed: {_0}")]
    Unit(#[error(not(source))] String),
}

/// Result alias used throughout the crate.
pub type Outcome<T> = Result<T, Snag>;

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for Snag {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        Self::Closed
    }
}

impl From<futures_util::future::Aborted> for Snag {
    fn from(_: futures_util::future::Aborted) -> Self {
        Self::Cancelled
    }
}

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// The `trace_init` function installs the global [`tracing`] subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise everything at `info` and above prints.
/// Timings from the demos log at `info`, so the default shows them.  Calling this twice is
/// harmless: the second install fails quietly and the first subscriber stays in charge, which
/// keeps tests that each call it from fighting over the global.
pub fn trace_init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init()
        .is_ok()
    {
        tracing::trace!("Subscriber initialized.");
    }
}

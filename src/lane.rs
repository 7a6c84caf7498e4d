use crate::{Outcome, Snag};
use convert_case::Casing;
use futures_util::future::{AbortHandle, Abortable};
use std::future::Future;
use std::time::Duration;
use tokio::runtime;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// The `Lane` enum names the runtime a unit of work runs on.
///
/// Tokio tasks carry no priority, so "low priority" here means "somewhere else".  The
/// `Foreground` lane is the caller's own runtime.  The `Background` lane is a dedicated runtime
/// with a single worker thread, owned by the [`Dispatcher`].  Work on the background lane can
/// saturate that one worker all it likes without taking a turn away from the caller.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Lane {
    #[default]
    Foreground,
    Background,
}

/// How a dispatched unit ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum Settled {
    Finished,
    Cancelled,
    TimedOut,
}

/// The `Dispatcher` struct owns the background lane and hands out work to either lane.
///
/// Create it from inside a tokio runtime: the dispatcher captures that runtime as its foreground
/// lane.  Dropping the dispatcher shuts the background runtime down without waiting, so any unit
/// still running there is abandoned.  Join a [`Dispatch`] first if its units must finish.
#[derive(Debug)]
pub struct Dispatcher {
    foreground: runtime::Handle,
    background: runtime::Handle,
    runtime: Option<runtime::Runtime>,
}

impl Dispatcher {
    /// Builds the background runtime.  Fails outside of a tokio runtime, or if the operating
    /// system refuses us a thread.
    #[tracing::instrument]
    pub fn new() -> Outcome<Self> {
        let foreground = runtime::Handle::try_current()?;
        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("offload-background")
            .enable_all()
            .build()?;
        let background = runtime.handle().clone();
        tracing::trace!("Background lane ready.");
        Ok(Self {
            foreground,
            background,
            runtime: Some(runtime),
        })
    }

    pub fn handle(&self, lane: Lane) -> &runtime::Handle {
        match lane {
            Lane::Foreground => &self.foreground,
            Lane::Background => &self.background,
        }
    }

    /// Spawns a future on `lane`.
    pub fn spawn<F>(&self, lane: Lane, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle(lane).spawn(future)
    }

    /// Runs blocking work on the blocking pool that belongs to `lane`.
    pub fn spawn_blocking<F, R>(&self, lane: Lane, f: F) -> JoinHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.handle(lane).spawn_blocking(f)
    }

    /// The `perform_low_priority` method starts every unit in `tasks` on the background lane and
    /// returns at once.  The caller never waits on the units and the units keep no order among
    /// themselves.
    ///
    /// When `time_limit` is set, a unit that runs past it is dropped at its next suspension point
    /// and logged as timed out.  Each unit gets a generated name so the logs can tell them apart.
    /// The returned [`Dispatch`] can cancel the units or wait for them; dropping it leaves them
    /// running.
    #[tracing::instrument(skip_all)]
    pub fn perform_low_priority<I, F>(&self, tasks: I, time_limit: Option<Duration>) -> Dispatch
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = ()> + Send + 'static,
    {
        let tasks = tasks.into_iter().collect::<Vec<F>>();
        let names = names::Generator::default()
            .take(tasks.len())
            .map(|v| v.to_case(convert_case::Case::Title))
            .collect::<Vec<String>>();
        let mut dispatch = Dispatch::default();
        for (i, task) in tasks.into_iter().enumerate() {
            let name = names.get(i).cloned().unwrap_or_else(|| format!("Unit {i}"));
            let (abort, registration) = AbortHandle::new_pair();
            let span = tracing::info_span!("unit", name = %name);
            let job = async move {
                let run = Abortable::new(task, registration);
                let settled = match time_limit {
                    Some(limit) => match tokio::time::timeout(limit, run).await {
                        Ok(Ok(())) => Settled::Finished,
                        Ok(Err(_)) => Settled::Cancelled,
                        Err(_) => {
                            tracing::warn!("{}", Snag::TimeLimit(limit));
                            Settled::TimedOut
                        }
                    },
                    None => match run.await {
                        Ok(()) => Settled::Finished,
                        Err(_) => Settled::Cancelled,
                    },
                };
                tracing::trace!("{settled}.");
                settled
            };
            let handle = self.spawn(Lane::Background, job.instrument(span));
            dispatch.aborts.push(abort);
            dispatch.handles.push(handle);
        }
        tracing::info!("Dispatched {} low priority units.", dispatch.len());
        dispatch
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// The `Dispatch` struct tracks a batch of units started by
/// [`Dispatcher::perform_low_priority`].
#[derive(Debug, Default)]
pub struct Dispatch {
    aborts: Vec<AbortHandle>,
    handles: Vec<JoinHandle<Settled>>,
}

impl Dispatch {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Asks every unit still running to stop.  A unit stops at its next suspension point, so a
    /// unit that never yields runs to completion anyway.
    pub fn cancel(&self) {
        for abort in &self.aborts {
            abort.abort();
        }
        tracing::info!("Cancelled {} units.", self.aborts.len());
    }

    /// True once every unit has ended, however it ended.
    pub fn is_settled(&self) -> bool {
        self.handles.iter().all(|handle| handle.is_finished())
    }

    /// Waits for every unit and counts how each one ended.
    #[tracing::instrument(skip_all)]
    pub async fn join(self) -> Tally {
        let mut tally = Tally::default();
        for handle in self.handles {
            match handle.await {
                Ok(Settled::Finished) => tally.finished += 1,
                Ok(Settled::Cancelled) => tally.cancelled += 1,
                Ok(Settled::TimedOut) => tally.timed_out += 1,
                Err(e) => {
                    tracing::warn!("{}", Snag::from(e));
                    tally.failed += 1;
                }
            }
        }
        tracing::info!("{tally}");
        tally
    }
}

/// Counts of how the units in a [`Dispatch`] ended.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, derive_getters::Getters, derive_more::Display,
)]
#[display("{finished} finished, {cancelled} cancelled, {timed_out} timed out, {failed} failed")]
pub struct Tally {
    finished: usize,
    cancelled: usize,
    timed_out: usize,
    failed: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.finished + self.cancelled + self.timed_out + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    #[tokio::test]
    async fn dispatch_returns_before_units_finish() -> Outcome<()> {
        let dispatcher = Dispatcher::new()?;
        let done = Arc::new(AtomicUsize::new(0));
        let tasks = (0..4)
            .map(|_| {
                let done = Arc::clone(&done);
                async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    done.fetch_add(1, Ordering::SeqCst);
                }
            })
            .collect::<Vec<_>>();
        let start = Instant::now();
        let dispatch = dispatcher.perform_low_priority(tasks, None);
        assert!(start.elapsed() < Duration::from_millis(50));
        assert_eq!(dispatch.len(), 4);

        let tally = dispatch.join().await;
        assert_eq!(*tally.finished(), 4);
        assert_eq!(done.load(Ordering::SeqCst), 4);
        Ok(())
    }

    #[tokio::test]
    async fn background_units_run_off_the_caller_thread() -> Outcome<()> {
        let dispatcher = Dispatcher::new()?;
        let caller = std::thread::current().id();
        let worker = dispatcher
            .spawn(Lane::Background, async { std::thread::current().id() })
            .await?;
        assert_ne!(caller, worker);
        let name = dispatcher
            .spawn_blocking(Lane::Background, || {
                std::thread::current().name().map(String::from)
            })
            .await?;
        assert_eq!(name.as_deref(), Some("offload-background"));
        Ok(())
    }

    #[tokio::test]
    async fn cancel_stops_pending_units() -> Outcome<()> {
        let dispatcher = Dispatcher::new()?;
        let dispatch = dispatcher.perform_low_priority(
            (0..3).map(|_| async { tokio::time::sleep(Duration::from_secs(30)).await }),
            None,
        );
        dispatch.cancel();
        let tally = dispatch.join().await;
        assert_eq!(*tally.cancelled(), 3);
        assert_eq!(tally.total(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn time_limit_cuts_long_units() -> Outcome<()> {
        let dispatcher = Dispatcher::new()?;
        let quick = Box::pin(async { tokio::time::sleep(Duration::from_millis(1)).await })
            as std::pin::Pin<Box<dyn Future<Output = ()> + Send>>;
        let slow = Box::pin(async { tokio::time::sleep(Duration::from_secs(30)).await })
            as std::pin::Pin<Box<dyn Future<Output = ()> + Send>>;
        let dispatch =
            dispatcher.perform_low_priority(vec![quick, slow], Some(Duration::from_millis(100)));
        let tally = dispatch.join().await;
        assert_eq!(*tally.finished(), 1);
        assert_eq!(*tally.timed_out(), 1);
        Ok(())
    }

    #[test]
    fn dispatcher_needs_a_runtime() {
        assert!(matches!(Dispatcher::new(), Err(Snag::NoRuntime(_))));
    }
}

use crate::Outcome;
use std::future::Future;
use tokio::runtime;
use tokio::task::JoinSet;

/// The `execute_concurrently` function fans `tasks` out onto the current runtime and fans them
/// back in.  It resumes only once every unit has finished and returns one result per unit.
///
/// Units finish in whatever order the scheduler pleases; results come back in the order the
/// units were handed in.  If a unit panics, the units still running are aborted when the
/// [`JoinSet`] drops and the panic surfaces as [`crate::Snag::Join`].
#[tracing::instrument(skip_all)]
pub async fn execute_concurrently<I, F, T>(tasks: I) -> Outcome<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let mut set = JoinSet::new();
    for (i, task) in tasks.into_iter().enumerate() {
        set.spawn(async move { (i, task.await) });
    }
    fan_in(set).await
}

/// Same as [`execute_concurrently`], but the units run on the runtime behind `handle`.  Pass the
/// background lane's handle to keep a fan-out from competing with the caller.
#[tracing::instrument(skip_all)]
pub async fn execute_concurrently_on<I, F, T>(handle: &runtime::Handle, tasks: I) -> Outcome<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let mut set = JoinSet::new();
    for (i, task) in tasks.into_iter().enumerate() {
        set.spawn_on(async move { (i, task.await) }, handle);
    }
    fan_in(set).await
}

/// The fallible flavor of [`execute_concurrently`].  The first unit to fail wins: its error comes
/// back and every unit still running is aborted.
#[tracing::instrument(skip_all)]
pub async fn try_execute_concurrently<I, F, T>(tasks: I) -> Outcome<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Outcome<T>> + Send + 'static,
    T: Send + 'static,
{
    let mut set = JoinSet::new();
    for (i, task) in tasks.into_iter().enumerate() {
        set.spawn(async move { (i, task.await) });
    }
    let mut slots = std::iter::repeat_with(|| None)
        .take(set.len())
        .collect::<Vec<Option<T>>>();
    while let Some(joined) = set.join_next().await {
        let (i, value) = joined?;
        slots[i] = Some(value?);
    }
    Ok(slots.into_iter().flatten().collect())
}

async fn fan_in<T: Send + 'static>(mut set: JoinSet<(usize, T)>) -> Outcome<Vec<T>> {
    let mut slots = std::iter::repeat_with(|| None)
        .take(set.len())
        .collect::<Vec<Option<T>>>();
    while let Some(joined) = set.join_next().await {
        let (i, value) = joined?;
        slots[i] = Some(value);
    }
    tracing::trace!("Fanned in {} units.", slots.len());
    Ok(slots.into_iter().flatten().collect())
}

/// The `run_rounds` function runs `rounds` fan-out/fan-in batches one after the other.  Round
/// `n` starts only after every unit of round `n - 1` has finished.  `make_tasks` builds the
/// units for each round from its zero-based index.
#[tracing::instrument(skip_all)]
pub async fn run_rounds<M, I, F, T>(rounds: usize, mut make_tasks: M) -> Outcome<Vec<Vec<T>>>
where
    M: FnMut(usize) -> I,
    I: IntoIterator<Item = F>,
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let mut all = Vec::with_capacity(rounds);
    for round in 0..rounds {
        let results = execute_concurrently(make_tasks(round)).await?;
        tracing::info!("Round {} of {rounds} completed.", round + 1);
        all.push(results);
    }
    tracing::info!("All rounds completed.");
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Snag;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn resumes_after_every_unit_with_one_result_each() -> Outcome<()> {
        let done = Arc::new(AtomicUsize::new(0));
        let tasks = (0..8u64)
            .map(|i| {
                let done = Arc::clone(&done);
                async move {
                    // later units finish first
                    tokio::time::sleep(Duration::from_millis(40 - i * 5)).await;
                    done.fetch_add(1, Ordering::SeqCst);
                    i * i
                }
            })
            .collect::<Vec<_>>();
        let results = execute_concurrently(tasks).await?;
        assert_eq!(done.load(Ordering::SeqCst), 8);
        assert_eq!(results, vec![0, 1, 4, 9, 16, 25, 36, 49]);
        Ok(())
    }

    #[tokio::test]
    async fn empty_fan_out_returns_nothing() -> Outcome<()> {
        let results = execute_concurrently(Vec::<std::future::Ready<u8>>::new()).await?;
        assert!(results.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn units_run_concurrently() -> Outcome<()> {
        let start = std::time::Instant::now();
        execute_concurrently((0..10).map(|_| tokio::time::sleep(Duration::from_millis(100))))
            .await?;
        assert!(start.elapsed() < Duration::from_millis(900));
        Ok(())
    }

    #[tokio::test]
    async fn panic_abandons_the_rest() {
        let finished = Arc::new(AtomicBool::new(false));
        let slow = {
            let finished = Arc::clone(&finished);
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                finished.store(true, Ordering::SeqCst);
            }) as std::pin::Pin<Box<dyn Future<Output = ()> + Send>>
        };
        let boom = Box::pin(async { panic!("unit blew up") })
            as std::pin::Pin<Box<dyn Future<Output = ()> + Send>>;
        let result = execute_concurrently(vec![slow, boom]).await;
        assert!(matches!(result, Err(Snag::Join(_))));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn first_failure_is_returned() {
        let tasks = (0..5).map(|i| async move {
            if i == 3 {
                Err(Snag::Unit(format!("unit {i} refused")))
            } else {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(i)
            }
        });
        match try_execute_concurrently(tasks).await {
            Err(Snag::Unit(msg)) => assert_eq!(msg, "unit 3 refused"),
            other => panic!("expected unit failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rounds_run_in_sequence() -> Outcome<()> {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let rounds = run_rounds(3, |round| {
            let log = Arc::clone(&log);
            (0..4).map(move |unit| {
                let log = Arc::clone(&log);
                async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    log.lock().expect("log lock").push(round);
                    unit
                }
            })
        })
        .await?;
        assert_eq!(rounds.len(), 3);
        assert!(rounds.iter().all(|r| r == &vec![0, 1, 2, 3]));
        let log = log.lock().expect("log lock").clone();
        assert_eq!(log, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn fan_out_can_target_another_runtime() -> Outcome<()> {
        let dispatcher = crate::Dispatcher::new()?;
        let handle = dispatcher.handle(crate::Lane::Background).clone();
        let names = execute_concurrently_on(
            &handle,
            (0..3).map(|_| async { std::thread::current().name().map(String::from) }),
        )
        .await?;
        assert!(names
            .iter()
            .all(|name| name.as_deref() == Some("offload-background")));
        Ok(())
    }
}

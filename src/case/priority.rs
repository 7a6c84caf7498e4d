use crate::{execute_concurrently, execute_concurrently_on};
use crate::{CalculationTask, Dispatch, Dispatcher, Lane, Outcome};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::runtime;

/// `count` tasks with ids `1..=count`, each `iterations` long.
pub fn calculation_tasks(count: usize, iterations: usize) -> Vec<CalculationTask> {
    (1..=count)
        .map(|id| CalculationTask::new(id, iterations))
        .collect()
}

fn collect(results: Vec<crate::CalculationResult>) -> BTreeMap<usize, f64> {
    results
        .into_iter()
        .map(|r| (*r.task_id(), *r.result()))
        .collect()
}

/// Fans the heavy calculations out onto the caller's own runtime.  Every worker the caller has is
/// now busy summing sines, so anything else waiting on that runtime waits on them.
#[tracing::instrument]
pub async fn run_high_priority_tasks(
    count: usize,
    iterations: usize,
) -> Outcome<BTreeMap<usize, f64>> {
    let tasks = calculation_tasks(count, iterations)
        .into_iter()
        .map(|task| async move { task.run() });
    let results = execute_concurrently(tasks).await?;
    Ok(collect(results))
}

/// Fans the same calculations out onto the runtime behind `handle`, normally the background
/// lane, leaving the caller's runtime alone.
#[tracing::instrument(skip(handle))]
pub async fn run_optimized_tasks(
    handle: &runtime::Handle,
    count: usize,
    iterations: usize,
) -> Outcome<BTreeMap<usize, f64>> {
    let tasks = calculation_tasks(count, iterations).into_iter().map(|task| async move {
        let result = task.run();
        // give the single background worker a chance to serve its other units
        tokio::task::yield_now().await;
        result
    });
    let results = execute_concurrently_on(handle, tasks).await?;
    Ok(collect(results))
}

/// Dispatches `rounds` runs of [`run_optimized_tasks`] as low-priority units and returns without
/// waiting on any of them.
#[tracing::instrument(skip(dispatcher))]
pub fn perform_optimized_rounds(
    dispatcher: &Dispatcher,
    rounds: usize,
    count: usize,
    iterations: usize,
    time_limit: Option<Duration>,
) -> Dispatch {
    let units = (0..rounds).map(|round| {
        let handle = dispatcher.handle(Lane::Background).clone();
        async move {
            match run_optimized_tasks(&handle, count, iterations).await {
                Ok(results) => tracing::info!(
                    "Optimized round {} finished {} tasks.",
                    round + 1,
                    results.len()
                ),
                Err(e) => tracing::warn!("Optimized round {} failed: {e}", round + 1),
            }
        }
    });
    dispatcher.perform_low_priority(units, time_limit)
}

use crate::{run_rounds, Dispatch, Dispatcher, Outcome, Settings};
use std::time::Duration;

async fn do_something(delay: Duration) {
    tokio::time::sleep(delay).await;
}

/// Background units for the task group demo.  Every unit sleeps `delay` except the second, which
/// sleeps `long` to show that one straggler holds nobody up.
pub fn background_units(
    count: usize,
    delay: Duration,
    long: Duration,
) -> Vec<impl std::future::Future<Output = ()> + Send + 'static> {
    (1..=count)
        .map(|n| {
            let wait = if n == 2 { long } else { delay };
            async move {
                do_something(wait).await;
                tracing::info!("Background task {n} executed.");
            }
        })
        .collect()
}

/// The `taskgroup_demo` function kicks off the background units on the low-priority lane, then
/// runs the foreground units as sequential fan-out/fan-in rounds.
///
/// The call returns once the last round is done.  The background units may still be running; the
/// returned [`Dispatch`] tracks them.
#[tracing::instrument(skip_all)]
pub async fn taskgroup_demo(dispatcher: &Dispatcher, settings: &Settings) -> Outcome<Dispatch> {
    let background = background_units(
        *settings.background_units(),
        settings.unit_delay(),
        settings.long_unit(),
    );
    let dispatch = dispatcher.perform_low_priority(background, settings.time_limit());

    let units = *settings.group_units();
    let delay = settings.unit_delay();
    run_rounds(*settings.group_rounds(), |_| {
        (1..=units).map(move |n| async move {
            do_something(delay).await;
            tracing::info!("Task {n} completed.");
        })
    })
    .await?;
    Ok(dispatch)
}

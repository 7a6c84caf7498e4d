use offload::{trace_init, Director, Outcome, Perf, Settings, Signal};
use std::time::Instant;

// One thread, like a screen's main thread: a bad case that blocks it stalls everything here.
// The clock starts before the runtime is built so its setup counts toward launch time.
fn main() -> Outcome<()> {
    let launch = Instant::now();
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(Perf::since(launch)))
}

async fn run(perf: Perf) -> Outcome<()> {
    trace_init();
    let settings = Settings::load("Offload");
    let (mut director, tx) = Director::summon(settings.clone(), perf.clone(), 16)?;
    let stage = tokio::spawn(async move { director.listen().await });

    let flavor = *settings.flavor();
    for scene in settings.scenes() {
        tx.send(Signal::Appear(*scene, flavor)).await?;
        tx.send(Signal::Disappear(*scene)).await?;
    }
    tx.send(Signal::Quit).await?;

    for tally in stage.await? {
        tracing::info!("Background batch: {tally}");
    }
    perf.show_time("All scenes shown.");
    if let Some(path) = settings.report() {
        if let Err(e) = perf.write_csv(path) {
            tracing::warn!("Could not write timing report: {e}");
        }
    }
    Ok(())
}

use offload::{
    execute_concurrently, Director, Flavor, Outcome, Perf, Scene, Settings, SettingsBuilder,
    Signal,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn quick(flavor: Flavor) -> Settings {
    SettingsBuilder::default()
        .flavor(flavor)
        .scenes(vec![Scene::LoadFile, Scene::Semaphore, Scene::Cache, Scene::TaskGroup])
        .file_lines(3)
        .line_delay_ms(20)
        .semaphore_wait_ms(60)
        .fib_numbers(vec![30, 31])
        .group_units(3)
        .group_rounds(2)
        .unit_delay_ms(5)
        .background_units(2)
        .long_unit_ms(30)
        .heartbeat_ms(5)
        .build()
        .expect("defaults fill the rest")
}

async fn drive(settings: Settings, perf: Perf) -> Outcome<Vec<offload::Tally>> {
    let (mut director, tx) = Director::summon(settings.clone(), perf, 8)?;
    let stage = tokio::spawn(async move { director.listen().await });
    for scene in settings.scenes() {
        tx.send(Signal::Appear(*scene, *settings.flavor())).await?;
        tx.send(Signal::Disappear(*scene)).await?;
    }
    tx.send(Signal::Quit).await?;
    Ok(stage.await?)
}

#[tokio::test(flavor = "current_thread")]
async fn signals_drive_every_scene() -> Outcome<()> {
    offload::trace_init();
    let perf = Perf::launch();
    let tallies = drive(quick(Flavor::Good), perf.clone()).await?;
    let labels = perf
        .timings()
        .iter()
        .map(|t| t.label().clone())
        .collect::<Vec<String>>();
    assert_eq!(
        labels,
        vec![
            "Asynchronously optimize file reading.",
            "Asynchronously optimize the semaphore.",
            "Cached Fibonacci.",
            "Task group completed.",
        ]
    );
    // the good task group leaves its background units for the director to settle on quit
    assert_eq!(tallies.len(), 1);
    assert_eq!(*tallies[0].finished(), 2);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn bad_flavor_leaves_nothing_pending() -> Outcome<()> {
    let perf = Perf::launch();
    let tallies = drive(quick(Flavor::Bad), perf.clone()).await?;
    assert!(tallies.is_empty());
    assert_eq!(perf.timings().len(), 4);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn dropping_the_sender_ends_the_show() -> Outcome<()> {
    let (mut director, tx) = Director::summon(quick(Flavor::Good), Perf::launch(), 1)?;
    drop(tx);
    let tallies = tokio::time::timeout(Duration::from_secs(5), director.listen())
        .await
        .map_err(|_| offload::Snag::TimeLimit(Duration::from_secs(5)))?;
    assert!(tallies.is_empty());
    Ok(())
}

#[tokio::test]
async fn fan_in_waits_for_all_and_answers_each() -> Outcome<()> {
    for n in [0usize, 1, 7, 32] {
        let done = Arc::new(AtomicUsize::new(0));
        let tasks = (0..n).map(|i| {
            let done = Arc::clone(&done);
            async move {
                tokio::time::sleep(Duration::from_millis((i % 4) as u64 * 3)).await;
                done.fetch_add(1, Ordering::SeqCst);
                i
            }
        });
        let results = execute_concurrently(tasks).await?;
        assert_eq!(done.load(Ordering::SeqCst), n);
        assert_eq!(results, (0..n).collect::<Vec<usize>>());
    }
    Ok(())
}

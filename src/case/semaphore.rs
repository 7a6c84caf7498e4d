use crate::Outcome;
use std::sync::mpsc;
use std::time::Duration;

/// Hands `wait` of work to a helper thread, then parks the caller on a blocking receive until the
/// helper signals.  The caller's thread sits idle and unavailable the whole time.
#[tracing::instrument]
pub fn bad_semaphore(wait: Duration) -> Outcome<()> {
    let (signal, waiter) = mpsc::channel();
    std::thread::spawn(move || {
        std::thread::sleep(wait);
        let _ = signal.send(());
    });
    waiter.recv()?;
    tracing::trace!("Signal received after blocking.");
    Ok(())
}

/// Suspends the calling task for `wait` instead.  The thread underneath goes on to other tasks.
#[tracing::instrument]
pub async fn good_semaphore(wait: Duration) {
    tokio::time::sleep(wait).await;
    tracing::trace!("Woke without blocking.");
}

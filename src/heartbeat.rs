use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time;

/// The `Heartbeat` struct stands in for an animation running on the caller's runtime.
///
/// It ticks once per `period` and remembers the longest gap it saw between two ticks.  While the
/// runtime is free the gap stays near `period`.  When something blocks the runtime's thread the
/// heartbeat cannot tick, and the gap grows by however long the block lasted, which is exactly
/// the stutter a user would have seen.
#[derive(Debug)]
pub struct Heartbeat {
    period: Duration,
    longest: Arc<AtomicU64>,
    beats: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl Heartbeat {
    /// Starts ticking on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime.
    pub fn start(period: Duration) -> Self {
        let longest = Arc::new(AtomicU64::new(0));
        let beats = Arc::new(AtomicU64::new(0));
        let task = {
            let longest = Arc::clone(&longest);
            let beats = Arc::clone(&beats);
            tokio::spawn(async move {
                let mut interval = time::interval(period);
                interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
                interval.tick().await;
                let mut last = Instant::now();
                loop {
                    interval.tick().await;
                    let now = Instant::now();
                    let gap = now.duration_since(last).as_micros() as u64;
                    longest.fetch_max(gap, Ordering::Relaxed);
                    beats.fetch_add(1, Ordering::Relaxed);
                    last = now;
                }
            })
        };
        Self {
            period,
            longest,
            beats,
            task,
        }
    }

    /// The longest gap between two ticks since the last reset.
    pub fn longest_gap(&self) -> Duration {
        Duration::from_micros(self.longest.load(Ordering::Relaxed))
    }

    pub fn beats(&self) -> u64 {
        self.beats.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.longest.store(0, Ordering::Relaxed);
    }

    /// Gives the heartbeat a couple of periods to notice a stall that just ended, then reports the
    /// longest gap.
    pub async fn settle(&self) -> Duration {
        time::sleep(self.period * 2).await;
        self.longest_gap()
    }

    /// True when the longest gap is well past the tick period.
    pub fn stuttered(&self) -> bool {
        self.longest_gap() > self.period * 4
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn blocking_the_thread_shows_up_as_a_gap() {
        let heartbeat = Heartbeat::start(Duration::from_millis(5));
        time::sleep(Duration::from_millis(30)).await;
        heartbeat.reset();
        std::thread::sleep(Duration::from_millis(120));
        let gap = heartbeat.settle().await;
        assert!(gap >= Duration::from_millis(100), "gap was {gap:?}");
        assert!(heartbeat.stuttered());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn suspending_keeps_the_beat() {
        let heartbeat = Heartbeat::start(Duration::from_millis(5));
        time::sleep(Duration::from_millis(30)).await;
        let before = heartbeat.beats();
        time::sleep(Duration::from_millis(60)).await;
        assert!(heartbeat.beats() > before + 3);
    }
}

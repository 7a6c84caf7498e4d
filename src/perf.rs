use crate::Outcome;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use std::{fs, path};

/// The `Timing` struct is one diagnostic measurement: a label and the seconds elapsed between
/// process launch and the moment the labelled event finished.
#[derive(
    Debug,
    Clone,
    PartialEq,
    PartialOrd,
    derive_new::new,
    derive_getters::Getters,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[display("Process create to {label} time: {seconds:.2} seconds")]
pub struct Timing {
    label: String,
    seconds: f64,
}

/// The `Perf` struct is the stopwatch the demos read from.
///
/// The clock starts when `Perf` is created, so create it first thing in `main`, or capture an
/// [`Instant`] there and hand it to [`Perf::since`].  Clones share the
/// same launch instant and the same timing log, which lets every demo report into one place
/// without passing a mutable reference around.  The log sits behind a [`Mutex`] since demos on
/// the background lane report from other threads.
#[derive(Debug, Clone)]
pub struct Perf {
    launch: Instant,
    timings: Arc<Mutex<Vec<Timing>>>,
}

impl Perf {
    /// Marks the launch instant as now.
    pub fn launch() -> Self {
        Self::since(Instant::now())
    }

    /// Measures from an instant captured earlier.
    pub fn since(launch: Instant) -> Self {
        Self {
            launch,
            timings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Time elapsed since launch.
    pub fn uptime(&self) -> Duration {
        self.launch.elapsed()
    }

    /// The `show_time` method logs how long the process has been running, tagged with `label`,
    /// and keeps the measurement for the report.
    pub fn show_time(&self, label: &str) -> Timing {
        let timing = Timing::new(label.to_string(), self.uptime().as_secs_f64());
        tracing::info!("{timing}");
        match self.timings.lock() {
            Ok(mut timings) => timings.push(timing.clone()),
            Err(e) => tracing::warn!("Timing log poisoned: {e}"),
        }
        timing
    }

    /// Copies out every timing recorded so far, oldest first.
    pub fn timings(&self) -> Vec<Timing> {
        self.timings
            .lock()
            .map(|timings| timings.clone())
            .unwrap_or_default()
    }

    /// The `write_csv` method writes recorded timings to `path` with a `label,seconds` header.
    /// Parent directories are created as needed.
    #[tracing::instrument(skip(self))]
    pub fn write_csv(&self, path: &path::Path) -> Outcome<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut wtr = csv::Writer::from_path(path)?;
        let timings = self.timings();
        for timing in &timings {
            wtr.serialize(timing)?;
        }
        wtr.flush()?;
        tracing::info!("Wrote {} timings to {}", timings.len(), path.display());
        Ok(())
    }
}

impl Default for Perf {
    fn default() -> Self {
        Self::launch()
    }
}

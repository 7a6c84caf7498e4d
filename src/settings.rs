use crate::{Flavor, Outcome, Scene};
use std::path::PathBuf;
use std::time::Duration;
use strum::IntoEnumIterator;

/// The `Settings` struct holds every knob the demos turn.
///
/// The defaults reproduce the numbers the demos were first written with: ten lines at 300 ms each,
/// a two second semaphore wait, ten thousand and one JSON items, Fibonacci of 35 through 42, and
/// so on.  Those numbers are picked to make a blocked caller obvious to a human watching the
/// console, which also makes them too slow for tests.  Tests build smaller settings with
/// [`SettingsBuilder`].
///
/// Durations are stored as integer milliseconds (microseconds for the per-card delay) so that
/// `Offload.toml` and `OFFLOAD_*` environment variables stay plain numbers.  The accessor methods
/// without a unit suffix hand back a [`Duration`].
#[derive(
    Debug,
    Clone,
    PartialEq,
    derive_getters::Getters,
    derive_builder::Builder,
    serde::Serialize,
    serde::Deserialize,
)]
#[builder(default)]
#[serde(default)]
pub struct Settings {
    /// Which half of each pair to run.
    flavor: Flavor,
    /// Scenes to show, in order.
    scenes: Vec<Scene>,
    file_lines: usize,
    line_delay_ms: u64,
    semaphore_wait_ms: u64,
    json_items: usize,
    fib_numbers: Vec<u32>,
    /// `None` keeps every Fibonacci result forever.
    memo_capacity: Option<usize>,
    priority_tasks: usize,
    high_iterations: usize,
    low_iterations: usize,
    low_rounds: usize,
    card_total: usize,
    card_batch: usize,
    card_delay_us: u64,
    particle_count: usize,
    group_units: usize,
    group_rounds: usize,
    unit_delay_ms: u64,
    background_units: usize,
    long_unit_ms: u64,
    /// Upper bound on each low-priority unit, if any.
    time_limit_ms: Option<u64>,
    heartbeat_ms: u64,
    /// Where to write the timing report, if anywhere.
    report: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flavor: Flavor::Good,
            scenes: Scene::iter().collect(),
            file_lines: 10,
            line_delay_ms: 300,
            semaphore_wait_ms: 2_000,
            json_items: 10_001,
            fib_numbers: (35..=42).collect(),
            memo_capacity: None,
            priority_tasks: 10,
            high_iterations: 500_000,
            low_iterations: 50_000,
            low_rounds: 11,
            card_total: 1_000,
            card_batch: 100,
            card_delay_us: 1_000,
            particle_count: 1_000,
            group_units: 5,
            group_rounds: 3,
            unit_delay_ms: 2_000,
            background_units: 4,
            long_unit_ms: 10_000,
            time_limit_ms: None,
            heartbeat_ms: 16,
            report: None,
        }
    }
}

impl Settings {
    /// The `load` method reads settings the way the rest of the program wants them: from the file
    /// `name` (any extension the [`config`] crate understands, `Offload.toml` by default) layered
    /// under `OFFLOAD_*` environment variables.
    ///
    /// A missing file is fine.  A file that will not parse is not fatal either: we warn and fall
    /// back on [`Settings::default`], since a demo with default numbers beats no demo.
    #[tracing::instrument]
    pub fn load(name: &str) -> Self {
        match Self::read(name) {
            Ok(settings) => {
                tracing::trace!("Settings read from {name}.");
                tracing::trace!("{:#?}", settings);
                settings
            }
            Err(e) => {
                tracing::warn!("Could not read settings, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Reads settings from `name` and the environment, reporting any parse failure.
    pub fn read(name: &str) -> Outcome<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(name).required(false))
            .add_source(
                config::Environment::with_prefix("OFFLOAD")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("scenes")
                    .with_list_parse_key("fib_numbers"),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn line_delay(&self) -> Duration {
        Duration::from_millis(self.line_delay_ms)
    }

    pub fn semaphore_wait(&self) -> Duration {
        Duration::from_millis(self.semaphore_wait_ms)
    }

    pub fn card_delay(&self) -> Duration {
        Duration::from_micros(self.card_delay_us)
    }

    pub fn unit_delay(&self) -> Duration {
        Duration::from_millis(self.unit_delay_ms)
    }

    pub fn long_unit(&self) -> Duration {
        Duration::from_millis(self.long_unit_ms)
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms.max(1))
    }
}

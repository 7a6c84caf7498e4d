//! The `offload` crate is a collection of ways to keep a caller from stalling, each shown next to
//! the way that stalls it.
//!
//! Every pair does the same work twice.  The bad flavor does it right where it was asked for, on
//! the caller's thread.  The good flavor hands it to somebody else and picks the result up later.
//! The pairs are:
//!
//! 1. Reading a slow file - [`case::bad_load_file`] and [`case::good_load_file`].
//! 2. Waiting on a signal - [`case::bad_semaphore`] blocks on a channel, [`case::good_semaphore`]
//!    suspends.
//! 3. Parsing a big JSON payload - [`case::bad_json_decode`] and [`case::good_json_decode`].
//! 4. Recomputing vs. remembering - [`case::Calculator`] over a [`Memo`].
//! 5. Hogging the caller's runtime vs. using the background [`Lane`] -
//!    [`case::run_high_priority_tasks`] and [`case::run_optimized_tasks`].
//! 6. Painting a wall of cards one by one vs. in concurrent batches - [`case::update_cards_synchronously`]
//!    and [`case::update_cards_asynchronously`].
//! 7. Spawning particles on the caller vs. on the blocking pool - [`case::ParticleSystem`].
//! 8. Sequential fan-out/fan-in rounds next to fire-and-forget background units -
//!    [`case::taskgroup_demo`].
//!
//! Three helpers do the real lifting and are useful on their own:
//!
//! * [`Memo`] remembers results by key, optionally bounded with least-recently-used eviction.
//! * [`Dispatcher`] owns a background runtime and starts low-priority work there without making
//!   the caller wait, handing back a [`Dispatch`] that can cancel or join the work.
//! * [`execute_concurrently`] and friends fan work out and resume once all of it is done.
//!
//! To watch the pairs side by side, summon a [`Director`] and send it [`Signal`]s, the way a
//! screen would announce that a scene became visible.  The director keeps a [`Heartbeat`] ticking
//! on its own runtime and logs how long each demo kept it from ticking.  [`Perf`] logs seconds
//! since launch after each demo and can write them out as CSV.
//!
//! Numbers come from `Offload.toml` through [`Settings::load`], and logging goes through
//! [`tracing`] once [`trace_init`] has run.
pub mod case;
mod director;
mod error;
mod group;
mod heartbeat;
mod lane;
mod memo;
mod model;
mod perf;
mod settings;
mod utils;

/// The crate is small, so the working types are lifted to the top level.
pub use case::{Flavor, Scene};
pub use director::{Director, Signal};
pub use error::{Outcome, Snag};
pub use group::{
    execute_concurrently, execute_concurrently_on, run_rounds, try_execute_concurrently,
};
pub use heartbeat::Heartbeat;
pub use lane::{Dispatch, Dispatcher, Lane, Settled, Tally};
pub use memo::Memo;
pub use model::{CalculationResult, CalculationTask, Card, Color, Item, Items, Particle, Point};
pub use perf::{Perf, Timing};
pub use settings::{Settings, SettingsBuilder};
pub use utils::trace_init;

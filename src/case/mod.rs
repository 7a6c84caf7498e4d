//! Paired demos.  Each module holds a way to stall the caller and a way not to.
mod cache;
mod cards;
mod json;
mod load_file;
mod particles;
mod priority;
mod semaphore;
mod taskgroup;

pub use cache::{fibonacci, Calculator};
pub use cards::{batches, update_cards_asynchronously, update_cards_synchronously};
pub use json::{bad_json_decode, good_json_decode};
pub use load_file::{bad_load_file, good_load_file};
pub use particles::ParticleSystem;
pub use priority::{
    calculation_tasks, perform_optimized_rounds, run_high_priority_tasks, run_optimized_tasks,
};
pub use semaphore::{bad_semaphore, good_semaphore};
pub use taskgroup::{background_units, taskgroup_demo};

/// The `Scene` enum names each demo, the way a screen would name the view it just showed.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    LoadFile,
    Semaphore,
    Json,
    Cache,
    Priority,
    Cards,
    Particles,
    TaskGroup,
}

/// Which half of a pair to run.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// Blocks, recomputes, or hogs the caller.
    Bad,
    #[default]
    Good,
}

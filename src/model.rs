use rand::Rng;

/// One record in the JSON payload the parsing demo chews through.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    derive_new::new,
    derive_getters::Getters,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Item {
    id: u64,
    title: String,
    description: String,
}

/// The `Items` struct wraps a vector of [`Item`], dereferencing to the vector underneath.
#[derive(
    Debug,
    Default,
    Clone,
    PartialEq,
    Eq,
    derive_more::Deref,
    derive_more::DerefMut,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Items(Vec<Item>);

impl Items {
    /// Builds `count` items with ids `0..count`, titled `Title {i}`, each carrying a description
    /// long enough to make parsing noticeably slow at ten thousand items.
    pub fn generate(count: usize) -> Self {
        let items = (0..count as u64)
            .map(|i| {
                Item::new(
                    i,
                    format!("Title {i}"),
                    format!(
                        "This is a long descriptive text used to simulate the data volume in real-world scenarios {i}"
                    ),
                )
            })
            .collect::<Vec<Item>>();
        Self(items)
    }

    /// The JSON encoding of [`Items::generate`].
    pub fn generate_json(count: usize) -> crate::Outcome<Vec<u8>> {
        Ok(serde_json::to_vec(&Self::generate(count))?)
    }

    pub fn from_json(bytes: &[u8]) -> crate::Outcome<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// An RGB color with channels in `0.0..=1.0`.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    derive_new::new,
    derive_getters::Getters,
    derive_more::Display,
)]
#[display("rgb({red:.2}, {green:.2}, {blue:.2})")]
pub struct Color {
    red: f64,
    green: f64,
    blue: f64,
}

impl Color {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            rng.gen_range(0.0..=1.0),
            rng.gen_range(0.0..=1.0),
            rng.gen_range(0.0..=1.0),
        )
    }
}

/// A card on the card wall.
#[derive(Debug, Clone, PartialEq, derive_new::new, derive_getters::Getters)]
pub struct Card {
    title: String,
    color: Color,
}

impl Card {
    /// Card number `i`, painted a random color.
    pub fn numbered<R: Rng + ?Sized>(i: usize, rng: &mut R) -> Self {
        Self::new(format!("Card #{i}"), Color::random(rng))
    }
}

/// A position or velocity on the particle plane.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    derive_new::new,
    derive_more::AddAssign,
)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A single particle.  Velocity components fall in `-5.0..=5.0` and size in `2.0..=6.0`.
#[derive(
    Debug,
    Clone,
    PartialEq,
    derive_new::new,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct Particle {
    position: Point,
    velocity: Point,
    color: Color,
    size: f64,
}

impl Particle {
    /// A particle launched from `origin` in a random direction.
    pub fn burst<R: Rng + ?Sized>(origin: Point, rng: &mut R) -> Self {
        let velocity = Point::new(rng.gen_range(-5.0..=5.0), rng.gen_range(-5.0..=5.0));
        Self::new(origin, velocity, Color::random(rng), rng.gen_range(2.0..=6.0))
    }

    /// Moves the particle one frame along its velocity.
    pub fn advance(&mut self) {
        self.position += self.velocity;
    }

    /// True once the particle has drifted past the bottom or either side of the stage.
    pub fn off_stage(&self) -> bool {
        self.position.y > 1000.0 || self.position.x < -100.0 || self.position.x > 500.0
    }
}

/// A compute-bound unit for the priority demo.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, derive_new::new, derive_getters::Getters,
)]
pub struct CalculationTask {
    id: usize,
    iterations: usize,
}

impl CalculationTask {
    /// Sums `sin(i)` for `i` in `0..iterations`.
    pub fn run(&self) -> CalculationResult {
        let result = (0..self.iterations).map(|i| (i as f64).sin()).sum();
        CalculationResult::new(self.id, result)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, derive_new::new, derive_getters::Getters)]
pub struct CalculationResult {
    task_id: usize,
    result: f64,
}

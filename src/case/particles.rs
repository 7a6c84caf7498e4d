use crate::{Outcome, Particle, Point};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

/// The `ParticleSystem` struct holds the particles on stage and the animation that moves them.
///
/// Particles live behind an [`Arc<Mutex>`] so the animation task and the owner can both reach
/// them.  The lock is never held across an await.
#[derive(Debug, Default)]
pub struct ParticleSystem {
    particles: Arc<Mutex<Vec<Particle>>>,
    animation: Option<JoinHandle<()>>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(particles: &Mutex<Vec<Particle>>) -> MutexGuard<'_, Vec<Particle>> {
        // a panic mid-update leaves the particles in a usable state, so poisoning is ignored
        particles.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn generate(origin: Point, count: usize) -> Vec<Particle> {
        let mut rng = rand::thread_rng();
        (0..count).map(|_| Particle::burst(origin, &mut rng)).collect()
    }

    /// Builds `count` particles at `origin` on the caller's thread and adds them to the stage.
    #[tracing::instrument(skip(self))]
    pub fn create_particles(&self, origin: Point, count: usize) {
        let fresh = Self::generate(origin, count);
        Self::lock(&self.particles).extend(fresh);
    }

    /// Builds the particles on the blocking pool, then adds them to the stage in one go.
    #[tracing::instrument(skip(self))]
    pub async fn create_particles_async(&self, origin: Point, count: usize) -> Outcome<()> {
        let fresh = tokio::task::spawn_blocking(move || Self::generate(origin, count)).await?;
        Self::lock(&self.particles).extend(fresh);
        Ok(())
    }

    fn step(particles: &Mutex<Vec<Particle>>) -> usize {
        let mut particles = Self::lock(particles);
        particles.iter_mut().for_each(Particle::advance);
        particles.retain(|p| !p.off_stage());
        particles.len()
    }

    /// Advances every particle one frame and drops those that left the stage.  Returns how many
    /// remain.
    pub fn update(&self) -> usize {
        Self::step(&self.particles)
    }

    /// The `start_animation` method calls [`ParticleSystem::update`] once per `frame` on the
    /// current runtime until stopped.  Starting twice restarts the animation.  Panics outside a
    /// tokio runtime.
    pub fn start_animation(&mut self, frame: Duration) {
        self.stop_animation();
        let particles = Arc::clone(&self.particles);
        self.animation = Some(tokio::spawn(async move {
            let mut interval = time::interval(frame);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                Self::step(&particles);
            }
        }));
        tracing::trace!("Animation started.");
    }

    pub fn stop_animation(&mut self) {
        if let Some(animation) = self.animation.take() {
            animation.abort();
            tracing::trace!("Animation stopped.");
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn len(&self) -> usize {
        Self::lock(&self.particles).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        Self::lock(&self.particles).clear();
    }

    /// A copy of the particles on stage.
    pub fn snapshot(&self) -> Vec<Particle> {
        Self::lock(&self.particles).clone()
    }
}

impl Drop for ParticleSystem {
    fn drop(&mut self) {
        self.stop_animation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn created_particles_start_at_the_origin() {
        let system = ParticleSystem::new();
        let origin = Point::new(200.0, 300.0);
        system.create_particles(origin, 50);
        assert_eq!(system.len(), 50);
        assert!(system.snapshot().iter().all(|p| *p.position() == origin));
    }

    #[tokio::test]
    async fn async_creation_adds_to_the_stage() -> Outcome<()> {
        let system = ParticleSystem::new();
        system.create_particles(Point::default(), 5);
        system.create_particles_async(Point::default(), 20).await?;
        assert_eq!(system.len(), 25);
        Ok(())
    }

    #[test]
    fn update_culls_departed_particles() {
        let system = ParticleSystem::new();
        {
            let mut particles = ParticleSystem::lock(&system.particles);
            particles.push(Particle::new(
                Point::new(0.0, 0.0),
                Point::new(0.0, 1.0),
                Color::default(),
                3.0,
            ));
            particles.push(Particle::new(
                Point::new(499.0, 0.0),
                Point::new(5.0, 0.0),
                Color::default(),
                3.0,
            ));
        }
        assert_eq!(system.update(), 1);
        assert_eq!(*system.snapshot()[0].position(), Point::new(0.0, 1.0));
    }

    #[tokio::test(start_paused = true)]
    async fn animation_moves_particles_until_stopped() {
        let mut system = ParticleSystem::new();
        {
            let mut particles = ParticleSystem::lock(&system.particles);
            particles.push(Particle::new(
                Point::default(),
                Point::new(0.0, 1.0),
                Color::default(),
                2.0,
            ));
        }
        system.start_animation(Duration::from_millis(16));
        assert!(system.is_animating());
        time::sleep(Duration::from_millis(100)).await;
        system.stop_animation();
        let y = system.snapshot()[0].position().y;
        assert!(y >= 5.0, "particle only reached {y}");
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(system.snapshot()[0].position().y, y);
        assert!(!system.is_animating());
    }
}

use crate::case::{self, Calculator, ParticleSystem};
use crate::{Dispatch, Dispatcher, Flavor, Heartbeat, Outcome, Perf, Point, Scene, Settings, Tally};
use tokio::sync::mpsc;

/// The `Signal` enum is what the screen layer tells the [`Director`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Signal {
    /// A scene became visible.  Run its demo.
    #[display("appear {_0} ({_1})")]
    Appear(Scene, Flavor),
    /// A scene went away.  Stop the scene's foreground animation.
    #[display("disappear {_0}")]
    Disappear(Scene),
    /// Settle outstanding background work and stop listening.
    #[display("quit")]
    Quit,
}

/// The `Director` struct runs demos when scenes appear.
///
/// The director owns everything a scene keeps between appearances: the [`Calculator`] and its
/// memo, the [`ParticleSystem`], and the [`Dispatch`] handles of background work still running.
/// It also keeps a [`Heartbeat`] on the runtime it listens from, so each demo can be judged by
/// how long it kept that runtime from ticking.
///
/// Signals arrive over an [`mpsc`] channel.  [`Director::summon`] hands back the sender; the
/// screen layer, or `main`, holds on to it and the director sits in [`Director::listen`].  A demo
/// that fails is logged and the director carries on with the next signal.
#[derive(Debug)]
pub struct Director {
    settings: Settings,
    perf: Perf,
    dispatcher: Dispatcher,
    calculator: Calculator,
    particles: ParticleSystem,
    heartbeat: Heartbeat,
    pending: Vec<Dispatch>,
    rx: mpsc::Receiver<Signal>,
}

impl Director {
    /// Builds a director and the sender that drives it.  `buffer` bounds how many signals may
    /// queue up unanswered.  Must be called from inside a tokio runtime.
    #[tracing::instrument(skip(settings, perf))]
    pub fn summon(
        settings: Settings,
        perf: Perf,
        buffer: usize,
    ) -> Outcome<(Self, mpsc::Sender<Signal>)> {
        let dispatcher = Dispatcher::new()?;
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let calculator = Calculator::new(*settings.memo_capacity());
        let heartbeat = Heartbeat::start(settings.heartbeat());
        let director = Self {
            settings,
            perf,
            dispatcher,
            calculator,
            particles: ParticleSystem::new(),
            heartbeat,
            pending: Vec::new(),
            rx,
        };
        Ok((director, tx))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Answers signals until [`Signal::Quit`] arrives or every sender is gone, then settles the
    /// background work.
    #[tracing::instrument(skip_all)]
    pub async fn listen(&mut self) -> Vec<Tally> {
        while let Some(signal) = self.rx.recv().await {
            tracing::trace!("Signal: {signal}");
            match signal {
                Signal::Appear(scene, flavor) => {
                    if let Err(e) = self.appear(scene, flavor).await {
                        tracing::warn!("{scene} ({flavor}) failed: {e}");
                    }
                }
                Signal::Disappear(scene) => self.disappear(scene),
                Signal::Quit => break,
            }
        }
        self.settle().await
    }

    /// Runs the demo for `scene` and records a timing labelled after it.  The heartbeat gap
    /// observed during the demo is logged alongside.
    #[tracing::instrument(skip(self))]
    pub async fn appear(&mut self, scene: Scene, flavor: Flavor) -> Outcome<()> {
        self.prune().await;
        self.heartbeat.reset();
        let label = self.show(scene, flavor).await?;
        self.perf.show_time(&label);
        let gap = self.heartbeat.settle().await;
        if self.heartbeat.stuttered() {
            tracing::warn!("{scene} ({flavor}) stalled the caller for {gap:?}.");
        } else {
            tracing::info!("{scene} ({flavor}) longest tick gap {gap:?}.");
        }
        Ok(())
    }

    async fn show(&mut self, scene: Scene, flavor: Flavor) -> Outcome<String> {
        let settings = &self.settings;
        let label = match (scene, flavor) {
            (Scene::LoadFile, Flavor::Bad) => {
                case::bad_load_file(*settings.file_lines(), settings.line_delay());
                "Unoptimized file reading."
            }
            (Scene::LoadFile, Flavor::Good) => {
                case::good_load_file(*settings.file_lines(), settings.line_delay()).await?;
                "Asynchronously optimize file reading."
            }
            (Scene::Semaphore, Flavor::Bad) => {
                case::bad_semaphore(settings.semaphore_wait())?;
                "Unoptimized semaphore."
            }
            (Scene::Semaphore, Flavor::Good) => {
                case::good_semaphore(settings.semaphore_wait()).await;
                "Asynchronously optimize the semaphore."
            }
            (Scene::Json, Flavor::Bad) => {
                case::bad_json_decode(*settings.json_items())?;
                "Unoptimized JSON parsing."
            }
            (Scene::Json, Flavor::Good) => {
                case::good_json_decode(&self.dispatcher, *settings.json_items()).await?;
                "Asynchronously optimize JSON parsing."
            }
            (Scene::Cache, Flavor::Bad) => {
                self.calculator.calculate_without_cache(settings.fib_numbers());
                "Uncached Fibonacci."
            }
            (Scene::Cache, Flavor::Good) => {
                self.calculator.calculate_with_cache(settings.fib_numbers());
                "Cached Fibonacci."
            }
            (Scene::Priority, Flavor::Bad) => {
                let results = case::run_high_priority_tasks(
                    *settings.priority_tasks(),
                    *settings.high_iterations(),
                )
                .await?;
                tracing::info!("High priority finished {} tasks.", results.len());
                "High-priority execution completed."
            }
            (Scene::Priority, Flavor::Good) => {
                let dispatch = case::perform_optimized_rounds(
                    &self.dispatcher,
                    *settings.low_rounds(),
                    *settings.priority_tasks(),
                    *settings.low_iterations(),
                    settings.time_limit(),
                );
                self.pending.push(dispatch);
                "Low-priority execution completed."
            }
            (Scene::Cards, Flavor::Bad) => {
                let cards = case::update_cards_synchronously(
                    *settings.card_total(),
                    settings.card_delay(),
                );
                tracing::info!("Painted {} cards.", cards.len());
                "Synchronous card update."
            }
            (Scene::Cards, Flavor::Good) => {
                let cards = case::update_cards_asynchronously(
                    *settings.card_total(),
                    *settings.card_batch(),
                    settings.card_delay(),
                )
                .await?;
                tracing::info!("Painted {} cards.", cards.len());
                "Asynchronous card update."
            }
            (Scene::Particles, flavor) => {
                let origin = Point::new(200.0, 400.0);
                self.particles.start_animation(settings.heartbeat());
                match flavor {
                    Flavor::Bad => self
                        .particles
                        .create_particles(origin, *settings.particle_count()),
                    Flavor::Good => {
                        self.particles
                            .create_particles_async(origin, *settings.particle_count())
                            .await?
                    }
                }
                tracing::info!("{} particles on stage.", self.particles.len());
                match flavor {
                    Flavor::Bad => "Particles created on the caller.",
                    Flavor::Good => "Particles created in the background.",
                }
            }
            (Scene::TaskGroup, Flavor::Bad) => {
                // the bad flavor waits on the background units instead of leaving them be
                let dispatch = case::taskgroup_demo(&self.dispatcher, settings).await?;
                dispatch.join().await;
                "Task group with background units awaited."
            }
            (Scene::TaskGroup, Flavor::Good) => {
                let dispatch = case::taskgroup_demo(&self.dispatcher, settings).await?;
                self.pending.push(dispatch);
                "Task group completed."
            }
        };
        Ok(label.to_string())
    }

    /// Stops whatever `scene` left running in the foreground.
    #[tracing::instrument(skip(self))]
    pub fn disappear(&mut self, scene: Scene) {
        match scene {
            Scene::Particles => {
                self.particles.stop_animation();
                self.particles.clear();
            }
            _ => tracing::trace!("Nothing to stop for {scene}."),
        }
    }

    /// Cancels all background work still in flight.  Returns at once.
    pub fn cancel(&self) {
        for dispatch in &self.pending {
            dispatch.cancel();
        }
    }

    /// Waits for all background work dispatched so far and reports how each batch ended.
    #[tracing::instrument(skip_all)]
    pub async fn settle(&mut self) -> Vec<Tally> {
        let mut tallies = Vec::with_capacity(self.pending.len());
        for dispatch in self.pending.drain(..) {
            tallies.push(dispatch.join().await);
        }
        tallies
    }

    /// Joins the dispatches that have already ended so the pending list only holds work still in
    /// flight.  Their tallies are logged by [`Dispatch::join`].
    async fn prune(&mut self) {
        let (settled, running): (Vec<Dispatch>, Vec<Dispatch>) =
            self.pending.drain(..).partition(|dispatch| dispatch.is_settled());
        self.pending = running;
        for dispatch in settled {
            dispatch.join().await;
        }
    }
}

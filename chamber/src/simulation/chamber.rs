//! The particle chamber: owner of the particle arena and the step loop
//!
//! One control thread owns the [`Chamber`] and is the only writer of its
//! particles. Each physics step fans one [`ForceTask`] per particle out to a
//! rayon pool against an immutable copy of the arena, waits for all of them,
//! then integrates and merges sequentially. Other threads talk to the chamber
//! through a [`ChamberHandle`]: scalar settings, queued additions and
//! deep-copied snapshots.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::{Result, SimError};
use crate::simulation::collision::plan_merges;
use crate::simulation::engine::{valid_rate, valid_update_rate, Engine};
use crate::simulation::forces::{ForceTask, InteractionSet, ParticleUpdate};
use crate::simulation::integrator::euler_integrator;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Particle, ParticleId, ParticleIds, Snapshot};

/// Longest single idle sleep, keeps stop requests responsive at low update rates
const MAX_IDLE: Duration = Duration::from_millis(50);

/// Outcome of one physics step
#[derive(Debug)]
pub enum StepReport {
    Applied {
        particles: usize, // active particles after the step
        merges: usize, // merge products inserted
        removed: usize, // particles consumed by merges
    },
    Skipped(SimError),
}

impl StepReport {
    pub fn is_applied(&self) -> bool {
        matches!(self, StepReport::Applied { .. })
    }
}

/// Last published state for readers
struct Published {
    particles: Vec<Particle>,
    updated_at: Instant,
}

/// State shared between the control thread and handles
struct Shared {
    running: AtomicBool,
    simulation_rate: AtomicU64, // f64 bits
    update_rate: AtomicU64, // f64 bits
    allow_collision: AtomicBool,
    pending: Mutex<Vec<Particle>>,
    published: RwLock<Published>,
}

impl Shared {
    fn rate(cell: &AtomicU64) -> f64 {
        f64::from_bits(cell.load(Ordering::Relaxed))
    }

    fn set_rate(cell: &AtomicU64, name: &str, rate: f64, valid: fn(f64) -> bool) -> bool {
        if !valid(rate) {
            log::warn!("ignoring {name} {rate}, out of range");
            return false;
        }
        cell.store(rate.to_bits(), Ordering::Relaxed);
        true
    }
}

/// Cloneable, thread-safe control surface of a chamber
#[derive(Clone)]
pub struct ChamberHandle {
    shared: Arc<Shared>,
    ids: ParticleIds,
}

impl ChamberHandle {
    /// Id source to build particles for this chamber
    pub fn ids(&self) -> ParticleIds {
        self.ids.clone()
    }

    /// Queue particles; the chamber inserts them at the start of its next step
    pub fn add_particles(&self, particles: impl IntoIterator<Item = Particle>) {
        let mut pending = self.shared.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.extend(particles);
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Request a start or stop; a running loop observes it at its next iteration
    pub fn set_running(&self, running: bool) {
        self.shared.running.store(running, Ordering::Release);
    }

    pub fn simulation_rate(&self) -> f64 {
        Shared::rate(&self.shared.simulation_rate)
    }

    /// Returns false and keeps the previous value when `rate` is not finite and positive
    pub fn set_simulation_rate(&self, rate: f64) -> bool {
        Shared::set_rate(&self.shared.simulation_rate, "simulation rate", rate, valid_rate)
    }

    pub fn update_rate(&self) -> f64 {
        Shared::rate(&self.shared.update_rate)
    }

    /// Physics steps per wall-clock second. Also rejects rates so small that
    /// the step period does not fit in a `Duration`.
    pub fn set_update_rate(&self, rate: f64) -> bool {
        Shared::set_rate(&self.shared.update_rate, "update rate", rate, valid_update_rate)
    }

    pub fn allow_collision(&self) -> bool {
        self.shared.allow_collision.load(Ordering::Relaxed)
    }

    pub fn set_allow_collision(&self, allow: bool) {
        self.shared.allow_collision.store(allow, Ordering::Relaxed);
    }

    /// Deep copy of the last published state and the time since it was published
    pub fn snapshot(&self) -> Snapshot {
        let published = self.shared.published.read().unwrap_or_else(PoisonError::into_inner);
        Snapshot {
            seconds_since_update: published.updated_at.elapsed().as_secs_f64(),
            particles: published.particles.clone(),
        }
    }
}

/// Particle arena plus the machinery to step it
pub struct Chamber {
    particles: BTreeMap<ParticleId, Particle>,
    interactions: InteractionSet,
    params: Parameters,
    pool: rayon::ThreadPool,
    handle: ChamberHandle,
}

impl Chamber {
    pub fn new(engine: &Engine, params: Parameters) -> Result<Self> {
        Self::with_ids(engine, params, ParticleIds::new())
    }

    /// Build a chamber around an existing id source, for particles made
    /// before the chamber itself
    pub fn with_ids(engine: &Engine, params: Parameters, ids: ParticleIds) -> Result<Self> {
        if !valid_update_rate(engine.update_rate) {
            return Err(SimError::InvalidConfig(format!(
                "update rate {} must be > 0 with a representable period",
                engine.update_rate
            )));
        }
        if !valid_rate(engine.simulation_rate) {
            return Err(SimError::InvalidConfig(format!("simulation rate {} must be > 0", engine.simulation_rate)));
        }
        if engine.thread_count == 0 {
            return Err(SimError::InvalidConfig("thread count must be at least 1".into()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(engine.thread_count)
            .thread_name(|i| format!("chamber-worker-{i}"))
            .build()?;

        let shared = Arc::new(Shared {
            running: AtomicBool::new(false),
            simulation_rate: AtomicU64::new(engine.simulation_rate.to_bits()),
            update_rate: AtomicU64::new(engine.update_rate.to_bits()),
            allow_collision: AtomicBool::new(engine.allow_collision),
            pending: Mutex::new(Vec::new()),
            published: RwLock::new(Published {
                particles: Vec::new(),
                updated_at: Instant::now(),
            }),
        });

        Ok(Self {
            particles: BTreeMap::new(),
            interactions: InteractionSet::from_parameters(&params),
            params,
            pool,
            handle: ChamberHandle { shared, ids },
        })
    }

    /// Replace the default gravity + Coulomb terms
    pub fn with_interactions(mut self, interactions: InteractionSet) -> Self {
        self.interactions = interactions;
        self
    }

    pub fn handle(&self) -> ChamberHandle {
        self.handle.clone()
    }

    pub fn ids(&self) -> &ParticleIds {
        &self.handle.ids
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(&id)
    }

    /// Active particles in ascending id order
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.values()
    }

    /// Insert directly; only the owner of the chamber can call this
    pub fn add_particles(&mut self, particles: impl IntoIterator<Item = Particle>) {
        for p in particles {
            if self.particles.contains_key(&p.id()) {
                log::warn!("particle {} already present, ignoring duplicate", p.id());
                continue;
            }
            self.particles.insert(p.id(), p);
        }
        self.publish(false);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.handle.snapshot()
    }

    /// One step scaled by the current simulation rate
    pub fn advance(&mut self, elapsed_seconds: f64) -> StepReport {
        let dt = elapsed_seconds * self.handle.simulation_rate();
        self.step(dt)
    }

    /// One physics step of `dt` simulated seconds
    ///
    /// Particles queued through a handle are inserted first. All force tasks
    /// then read the same pre-step copy of the arena. If any task fails or
    /// panics, nothing from this step is applied.
    pub fn step(&mut self, dt: f64) -> StepReport {
        self.drain_pending();

        let view: Vec<Particle> = self.particles.values().cloned().collect();
        let task = ForceTask {
            interactions: &self.interactions,
            min_distance: self.params.min_distance,
            allow_collision: self.handle.allow_collision(),
        };

        let collected = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                view.par_iter()
                    .map(|focus| task.evaluate(focus, &view))
                    .collect::<Result<Vec<ParticleUpdate>>>()
            })
        }));

        let updates = match collected {
            Ok(Ok(updates)) => updates,
            Ok(Err(err)) => {
                log::warn!("skipping step: {err}");
                return StepReport::Skipped(err);
            }
            Err(payload) => {
                let err = SimError::TaskPanicked(panic_message(payload.as_ref()));
                log::warn!("skipping step: {err}");
                return StepReport::Skipped(err);
            }
        };

        euler_integrator(&mut self.particles, &updates, dt);

        let plan = plan_merges(&updates, &self.particles, &self.handle.ids);
        let merges = plan.replacements.len();
        let removed = plan.removed.len();
        if !plan.is_empty() {
            log::debug!("{merges} merge(s) consumed {removed} particle(s)");
            plan.apply(&mut self.particles);
        }

        self.publish(true);

        StepReport::Applied {
            particles: self.particles.len(),
            merges,
            removed,
        }
    }

    /// Run the step loop on the current thread until stopped
    pub fn run(&mut self) {
        self.handle.set_running(true);
        self.run_loop();
    }

    /// Move the chamber onto its own control thread
    pub fn spawn(mut self) -> std::io::Result<RunningChamber> {
        let handle = self.handle();
        handle.set_running(true);
        let thread = thread::Builder::new()
            .name("chamber-control".into())
            .spawn(move || {
                self.run_loop();
                self
            })?;
        Ok(RunningChamber { handle, thread })
    }

    fn run_loop(&mut self) {
        log::info!("Starting particle chamber with {} particles.", self.particles.len());

        let mut previous = Instant::now();
        let mut since_update = Duration::ZERO;
        let mut skipped = 0u64;

        while self.handle.is_running() {
            // additions show up in snapshots even while waiting for the next step
            self.drain_pending();

            let now = Instant::now();
            since_update += now - previous;
            previous = now;

            let period = Duration::try_from_secs_f64(self.handle.update_rate().recip()).unwrap_or(Duration::MAX);
            if since_update > period {
                let elapsed = since_update.as_secs_f64();
                since_update = Duration::ZERO;
                if let StepReport::Skipped(_) = self.advance(elapsed) {
                    skipped += 1;
                }
            } else {
                thread::sleep((period - since_update).min(MAX_IDLE));
            }
        }

        log::info!("Particle chamber stopped ({skipped} skipped steps).");
    }

    fn drain_pending(&mut self) {
        let queued = {
            let mut pending = self.handle.shared.pending.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *pending)
        };
        if !queued.is_empty() {
            log::debug!("adding {} queued particle(s)", queued.len());
            self.add_particles(queued);
        }
    }

    /// Copy the arena out for readers; `stepped` restarts the time-since-update clock
    fn publish(&self, stepped: bool) {
        let particles: Vec<Particle> = self.particles.values().cloned().collect();
        let mut published = self.handle.shared.published.write().unwrap_or_else(PoisonError::into_inner);
        published.particles = particles;
        if stepped {
            published.updated_at = Instant::now();
        }
    }
}

/// A chamber running on its own control thread
pub struct RunningChamber {
    handle: ChamberHandle,
    thread: JoinHandle<Chamber>,
}

impl RunningChamber {
    pub fn handle(&self) -> ChamberHandle {
        self.handle.clone()
    }

    /// Request a stop and wait for the in-flight step to finish
    pub fn stop(self) -> thread::Result<Chamber> {
        self.handle.set_running(false);
        self.thread.join()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

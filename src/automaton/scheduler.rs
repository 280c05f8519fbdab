//! Generation scheduler: owns a simulation from seeding to its final
//! generation.
//!
//! State machine:
//!
//! ```text
//! Idle --seed--> Seeded --start--> Running --(limit reached)--> Completed
//!                              \--> RunningIndefinitely   (unbounded mode)
//! ```
//!
//! A tick computes one whole generation and commits it; suspension (timer or
//! stop signal) only ever happens between ticks.

use glam::Vec3;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::watch;

use super::classify::{collect_dead_cell_pool, render_mask};
use super::lattice::{Coord, Lattice};
use super::rewards::place_rewards;
use super::rules::RuleSet;
use super::seeder::{generate_dead_zones, seed_lattice};
use super::stepping::step_generation;
use super::topology::{NeighborCache, Neighborhood};
use crate::config::{RunMode, SimulationConfig};
use crate::error::{AutomatonError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Seeded,
    Running,
    Completed,
    RunningIndefinitely,
}

/// What a bounded run leaves behind for the rendering and gameplay layers.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    pub generation: u64,
    /// Indexed like [`Lattice::cells`].
    pub render_mask: Vec<bool>,
    pub rewards: Vec<Coord>,
    /// Rewards that did not fit in the dead-cell pool.
    pub missing_rewards: usize,
}

/// Sending half of a stop signal.
#[derive(Debug)]
pub struct StopHandle(watch::Sender<bool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.send_replace(true);
    }
}

/// Receiving half of a stop signal, checked between ticks.
#[derive(Clone, Debug)]
pub struct StopSignal(watch::Receiver<bool>);

impl StopSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        StopSignal(rx)
    }

    pub fn is_stopped(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once stop has been requested. Pends forever if the handle
    /// was dropped without stopping.
    pub async fn stopped(&mut self) {
        loop {
            if *self.0.borrow_and_update() {
                return;
            }
            if self.0.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle(tx), StopSignal(rx))
}

struct World {
    lattice: Lattice,
    neighbors: NeighborCache,
}

/// A configured simulation and the scheduler driving it.
pub struct Simulation {
    config: SimulationConfig,
    rules: RuleSet,
    state: SchedulerState,
    world: Option<World>,
    rng: ChaCha8Rng,
    thread_pool: rayon::ThreadPool,
    outcome: Option<RunOutcome>,
}

impl Simulation {
    /// Validate `config` and build an idle simulation. Nothing is allocated
    /// for the lattice until it is seeded.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let rules = config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads())
            .build()
            .map_err(|e| AutomatonError::config(format!("failed to build worker pool: {e}")))?;

        Ok(Simulation {
            config,
            rules,
            state: SchedulerState::Idle,
            world: None,
            rng,
            thread_pool,
            outcome: None,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn lattice(&self) -> Option<&Lattice> {
        self.world.as_ref().map(|w| &w.lattice)
    }

    pub fn generation(&self) -> u64 {
        self.lattice().map_or(0, Lattice::generation)
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// Rewards placed by a completed run; empty otherwise.
    pub fn rewards(&self) -> &[Coord] {
        match &self.outcome {
            Some(outcome) => &outcome.rewards,
            None => &[],
        }
    }

    fn expect_state(&self, expected: SchedulerState, action: &'static str) -> Result<()> {
        if self.state != expected {
            return Err(AutomatonError::InvalidTransition {
                from: self.state,
                action,
            });
        }
        Ok(())
    }

    fn world(&self, action: &'static str) -> Result<&World> {
        self.world.as_ref().ok_or(AutomatonError::InvalidTransition {
            from: self.state,
            action,
        })
    }

    /// Committed state of a cell.
    pub fn get(&self, x: i16, y: i16, z: i16) -> Result<bool> {
        self.world("read cells")?.lattice.get(x, y, z)
    }

    /// Whether the host should draw a cell. Only answered after a bounded
    /// run has completed.
    pub fn is_render_eligible(&self, x: i16, y: i16, z: i16) -> Result<bool> {
        let lattice = &self.world("query render eligibility")?.lattice;
        let outcome = self
            .outcome
            .as_ref()
            .ok_or(AutomatonError::InvalidTransition {
                from: self.state,
                action: "query render eligibility",
            })?;
        lattice.get(x, y, z)?;
        Ok(outcome.render_mask[lattice.index_of(Coord::new(x, y, z))])
    }

    /// Host-space position of a cell, scaled by the configured sub-cell size.
    pub fn cell_position(&self, coord: Coord) -> Result<Vec3> {
        let lattice = &self.world("locate cells")?.lattice;
        Ok(lattice.world_position(coord, self.config.sub_cell_size))
    }

    /// Seed from a fresh batch of random dead zones.
    pub fn seed(&mut self) -> Result<()> {
        self.expect_state(SchedulerState::Idle, "seed")?;
        let side = self.config.side_length;
        let spheres = generate_dead_zones(
            side,
            self.config.dead_zone_count,
            self.config.dead_zone_radius,
            &mut self.rng,
        )?;
        let lattice = self.thread_pool.install(|| seed_lattice(side, &spheres))?;
        info!(
            "seeded {}³ lattice with {} dead zones, {} cells alive",
            side,
            spheres.len(),
            lattice.alive_count()
        );
        self.install(lattice);
        Ok(())
    }

    /// Seed a solid lattice with no dead zones.
    pub fn seed_all_alive(&mut self) -> Result<()> {
        self.seed_with(|_| true)
    }

    /// Seed from an arbitrary per-cell predicate.
    pub fn seed_with<F>(&mut self, alive: F) -> Result<()>
    where
        F: Fn(Coord) -> bool + Sync + Send,
    {
        self.expect_state(SchedulerState::Idle, "seed")?;
        let side = self.config.side_length;
        let lattice = self
            .thread_pool
            .install(|| Lattice::initialize(side, alive))?;
        info!("seeded {}³ lattice, {} cells alive", side, lattice.alive_count());
        self.install(lattice);
        Ok(())
    }

    fn install(&mut self, lattice: Lattice) {
        let neighbors = NeighborCache::build(lattice.side(), Neighborhood::Moore);
        self.world = Some(World { lattice, neighbors });
        self.state = SchedulerState::Seeded;
    }

    /// Leave `Seeded`. Bounded runs with a limit of 0 complete immediately.
    pub fn start(&mut self) -> Result<SchedulerState> {
        self.expect_state(SchedulerState::Seeded, "start")?;
        match self.config.run {
            RunMode::Bounded { generations } => {
                info!("starting bounded run of {generations} generations, rule {}", self.rules);
                self.state = SchedulerState::Running;
                if generations == 0 {
                    self.finish()?;
                }
            }
            RunMode::Unbounded => {
                info!("starting unbounded run, rule {}", self.rules);
                self.state = SchedulerState::RunningIndefinitely;
            }
        }
        Ok(self.state)
    }

    /// Compute and commit exactly one generation.
    pub fn tick(&mut self) -> Result<SchedulerState> {
        if !matches!(
            self.state,
            SchedulerState::Running | SchedulerState::RunningIndefinitely
        ) {
            return Err(AutomatonError::InvalidTransition {
                from: self.state,
                action: "tick",
            });
        }

        let world = self.world.as_mut().ok_or(AutomatonError::InvalidTransition {
            from: self.state,
            action: "tick",
        })?;
        let rules = &self.rules;
        let generation = self
            .thread_pool
            .install(|| step_generation(&mut world.lattice, rules, &world.neighbors))?;

        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "generation {generation}: {} cells alive",
                world.lattice.alive_count()
            );
        }

        if let RunMode::Bounded { generations } = self.config.run {
            if self.state == SchedulerState::Running && generation >= u64::from(generations) {
                self.finish()?;
            }
        }
        Ok(self.state)
    }

    /// Classify the final generation and place rewards.
    fn finish(&mut self) -> Result<()> {
        let world = self.world.as_ref().ok_or(AutomatonError::InvalidTransition {
            from: self.state,
            action: "finish",
        })?;
        let lattice = &world.lattice;

        let render_mask = self.thread_pool.install(|| render_mask(lattice));
        let mut pool = collect_dead_cell_pool(lattice);
        let requested = self.config.reward_count;
        let rewards = match place_rewards(&mut pool, requested, &mut self.rng) {
            Ok(placed) => placed,
            Err(AutomatonError::InsufficientCapacity { placed, .. }) => {
                warn!(
                    "only {} of {} rewards fit in the dead-cell pool",
                    placed.len(),
                    requested
                );
                placed
            }
            Err(e) => return Err(e),
        };

        info!(
            "run completed at generation {}: {} cells drawn, {} rewards placed",
            lattice.generation(),
            render_mask.iter().filter(|&&r| r).count(),
            rewards.len()
        );

        self.outcome = Some(RunOutcome {
            generation: lattice.generation(),
            render_mask,
            missing_rewards: requested - rewards.len(),
            rewards,
        });
        self.state = SchedulerState::Completed;
        Ok(())
    }

    /// Drive a bounded run to its end without waiting between ticks.
    pub fn run_to_completion(&mut self) -> Result<&RunOutcome> {
        if let RunMode::Unbounded = self.config.run {
            return Err(AutomatonError::InvalidTransition {
                from: self.state,
                action: "run an unbounded simulation to completion",
            });
        }
        if self.state == SchedulerState::Seeded {
            self.start()?;
        }
        while self.state == SchedulerState::Running {
            self.tick()?;
        }
        self.outcome.as_ref().ok_or(AutomatonError::InvalidTransition {
            from: self.state,
            action: "read the run outcome",
        })
    }

    /// Tick on the configured interval until the run completes or `stop`
    /// fires. Starts the run if it is only seeded.
    ///
    /// With a zero interval the loop still yields to the runtime between
    /// ticks.
    pub async fn run(&mut self, mut stop: StopSignal) -> Result<SchedulerState> {
        match self.state {
            SchedulerState::Idle => {
                return Err(AutomatonError::InvalidTransition {
                    from: SchedulerState::Idle,
                    action: "run",
                })
            }
            SchedulerState::Seeded => {
                self.start()?;
            }
            _ => {}
        }

        let interval = self.config.tick_interval();
        loop {
            if !matches!(
                self.state,
                SchedulerState::Running | SchedulerState::RunningIndefinitely
            ) {
                return Ok(self.state);
            }
            if stop.is_stopped() {
                info!("stopped at generation {}", self.generation());
                return Ok(self.state);
            }

            if self.tick()? == SchedulerState::Completed {
                return Ok(SchedulerState::Completed);
            }

            if interval.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = stop.stopped() => {}
                }
            }
        }
    }
}

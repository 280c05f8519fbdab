//! Core automaton logic.
//!
//! This module contains the lattice, its neighbor topology, the transition
//! rules, seeding, post-run classification and the scheduler that drives a
//! run. The FFI layer in `ffi/` calls into these types.

pub mod classify;
pub mod lattice;
pub mod region;
pub mod rewards;
pub mod rules;
pub mod scheduler;
pub mod seeder;
pub mod stepping;
pub mod topology;

pub use classify::{collect_dead_cell_pool, is_render_eligible, render_mask};
pub use lattice::{Coord, Lattice};
pub use region::{extract_region, extract_render_region, Region};
pub use rewards::{place_rewards, RewardPool};
pub use rules::{count_live_neighbors, next_state, NeighborCounts, RuleSet};
pub use scheduler::{stop_channel, RunOutcome, SchedulerState, Simulation, StopHandle, StopSignal};
pub use seeder::{derive_initial_state, generate_dead_zones, seed_lattice, DeadZoneSphere};
pub use stepping::step_generation;
pub use topology::{
    face_neighbor_offsets, full_neighbor_offsets, valid_neighbors_of, NeighborCache, Neighborhood,
};

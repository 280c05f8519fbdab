//! C FFI layer for host engines.
//!
//! This module exports C ABI functions over an opaque `Simulation` handle.
//! All functions are marked with `#[no_mangle]` and use `extern "C"`.
//!
//! The actual logic is in the `automaton` module. These functions are thin wrappers
//! that handle null checks, pointer safety, and C-to-Rust conversions. Errors
//! never cross the boundary: they become null handles, zero values or status
//! codes.

pub mod lattice;
pub mod lifecycle;
pub mod outcome;
pub mod region;

pub use lattice::{ca_get_cell, ca_run_to_completion, ca_tick};
pub use lifecycle::{ca_create, ca_destroy, ca_get_generation, ca_get_side_length, ca_get_state};
pub use outcome::{ca_is_render_eligible, ca_reward_at, ca_reward_count};
pub use region::{ca_extract_region, ca_extract_render_region};

use crate::automaton::SchedulerState;

/// Returned in place of a state code when the call failed.
pub const CA_ERROR: i32 = -1;

/// Scheduler states as seen by the host.
pub(crate) fn state_code(state: SchedulerState) -> i32 {
    match state {
        SchedulerState::Idle => 0,
        SchedulerState::Seeded => 1,
        SchedulerState::Running => 2,
        SchedulerState::Completed => 3,
        SchedulerState::RunningIndefinitely => 4,
    }
}

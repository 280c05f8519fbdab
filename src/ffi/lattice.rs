//! Cell access and stepping.

use log::error;

use super::{state_code, CA_ERROR};
use crate::automaton::Simulation;

/// Gets the committed state of a cell (0 = dead, 1 = alive).
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// 0 if out of bounds, null pointer, or dead; 1 if alive.
#[no_mangle]
pub unsafe extern "C" fn ca_get_cell(ptr: *const Simulation, x: i16, y: i16, z: i16) -> u8 {
    if ptr.is_null() {
        return 0;
    }
    match (*ptr).get(x, y, z) {
        Ok(alive) => alive as u8,
        Err(_) => 0,
    }
}

/// Advances the simulation by one generation.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// The scheduler state after the tick: 2 = running, 3 = completed,
/// 4 = running indefinitely. `CA_ERROR` (-1) on a null pointer or when the
/// simulation is not running.
#[no_mangle]
pub unsafe extern "C" fn ca_tick(ptr: *mut Simulation) -> i32 {
    if ptr.is_null() {
        return CA_ERROR;
    }
    match (*ptr).tick() {
        Ok(state) => state_code(state),
        Err(_) => CA_ERROR,
    }
}

/// Ticks a bounded run until it completes.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// 0 on success, 1 on failure (null pointer, unbounded run).
#[no_mangle]
pub unsafe extern "C" fn ca_run_to_completion(ptr: *mut Simulation) -> i32 {
    if ptr.is_null() {
        return 1;
    }
    match (*ptr).run_to_completion() {
        Ok(_) => 0,
        Err(e) => {
            error!("ca_run_to_completion failed: {e}");
            1
        }
    }
}

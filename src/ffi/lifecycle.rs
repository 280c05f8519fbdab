//! Simulation creation, destruction, and status queries.

use std::ffi::{c_char, CStr};

use log::error;

use super::{state_code, CA_ERROR};
use crate::automaton::Simulation;
use crate::config::SimulationConfig;
use crate::error::{AutomatonError, Result};

fn build(config_toml: *const c_char) -> Result<Simulation> {
    let config = if config_toml.is_null() {
        SimulationConfig::default()
    } else {
        // SAFETY: the caller guarantees a NUL-terminated string.
        let raw = unsafe { CStr::from_ptr(config_toml) }
            .to_str()
            .map_err(|e| AutomatonError::config(format!("config is not UTF-8: {e}")))?;
        SimulationConfig::from_toml_str(raw)?
    };

    let mut sim = Simulation::new(config)?;
    sim.seed()?;
    sim.start()?;
    Ok(sim)
}

/// Creates, seeds and starts a simulation.
///
/// `config_toml` is TOML text in the `SimulationConfig` layout; missing keys
/// take their defaults and a null pointer means all defaults.
///
/// # Returns
/// An opaque handle, or null if the config is invalid.
///
/// # Safety
/// - `config_toml` must be null or point to a NUL-terminated string
/// - The returned pointer must eventually be freed with `ca_destroy()`
#[no_mangle]
pub unsafe extern "C" fn ca_create(config_toml: *const c_char) -> *mut Simulation {
    match build(config_toml) {
        Ok(sim) => Box::into_raw(Box::new(sim)),
        Err(e) => {
            error!("ca_create failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Destroys a simulation and frees its memory.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `ca_create()`, or null
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn ca_destroy(ptr: *mut Simulation) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// Gets the committed generation counter.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// The generation counter, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn ca_get_generation(ptr: *const Simulation) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).generation()
}

/// Gets the lattice side length.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// The side length, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn ca_get_side_length(ptr: *const Simulation) -> i16 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).lattice().map_or(0, |l| l.side())
}

/// Gets the scheduler state code (see `ca_tick`).
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
#[no_mangle]
pub unsafe extern "C" fn ca_get_state(ptr: *const Simulation) -> i32 {
    if ptr.is_null() {
        return CA_ERROR;
    }
    state_code((*ptr).state())
}

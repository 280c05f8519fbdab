//! Post-run queries: render eligibility and reward placement.

use crate::automaton::Simulation;

/// Whether the host should draw a cell (1) or not (0).
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// 0 for a null pointer, out-of-bounds coordinates, or a run that has not
/// completed.
#[no_mangle]
pub unsafe extern "C" fn ca_is_render_eligible(
    ptr: *const Simulation,
    x: i16,
    y: i16,
    z: i16,
) -> u8 {
    if ptr.is_null() {
        return 0;
    }
    match (*ptr).is_render_eligible(x, y, z) {
        Ok(eligible) => eligible as u8,
        Err(_) => 0,
    }
}

/// Number of rewards placed by a completed run.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
#[no_mangle]
pub unsafe extern "C" fn ca_reward_count(ptr: *const Simulation) -> u32 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).rewards().len() as u32
}

/// Writes the coordinate of reward `index` through the out pointers.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
/// - `out_x`, `out_y`, `out_z` must be valid for writes, or null
///
/// # Returns
/// 0 on success, 1 on failure (null pointer, index past `ca_reward_count`).
#[no_mangle]
pub unsafe extern "C" fn ca_reward_at(
    ptr: *const Simulation,
    index: u32,
    out_x: *mut i16,
    out_y: *mut i16,
    out_z: *mut i16,
) -> i32 {
    if ptr.is_null() || out_x.is_null() || out_y.is_null() || out_z.is_null() {
        return 1;
    }

    let coord = match (*ptr).rewards().get(index as usize) {
        Some(c) => *c,
        None => return 1,
    };
    *out_x = coord.x;
    *out_y = coord.y;
    *out_z = coord.z;
    0
}

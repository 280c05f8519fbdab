//! Region extraction FFI functions.

use crate::automaton::{self, Coord, Region, Simulation};

/// Bytes the caller must provide for the unclamped region.
fn region_len(min: Coord, max: Coord) -> usize {
    let span = |lo: i16, hi: i16| (i32::from(hi) - i32::from(lo)).max(0) as usize;
    span(min.x, max.x) * span(min.y, max.y) * span(min.z, max.z)
}

/// Extracts a rectangular region of cells (1 = alive) into a flat output buffer.
///
/// # Layout
/// The buffer is filled in z,y,x order (z changes slowest, x changes fastest).
/// The region is clamped to the lattice before copying.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
/// - `out_buf` must point to a buffer with at least
///   `(max_x - min_x) * (max_y - min_y) * (max_z - min_z)` bytes
///
/// # Returns
/// Number of bytes written, or 0 on error.
#[no_mangle]
pub unsafe extern "C" fn ca_extract_region(
    ptr: *const Simulation,
    out_buf: *mut u8,
    min_x: i16,
    min_y: i16,
    min_z: i16,
    max_x: i16,
    max_y: i16,
    max_z: i16,
) -> u64 {
    if ptr.is_null() || out_buf.is_null() {
        return 0;
    }

    let lattice = match (*ptr).lattice() {
        Some(l) => l,
        None => return 0,
    };

    let region = Region::new(Coord::new(min_x, min_y, min_z), Coord::new(max_x, max_y, max_z));
    let buf_slice = std::slice::from_raw_parts_mut(out_buf, region_len(region.min, region.max));
    automaton::extract_region(lattice, buf_slice, region)
}

/// Extracts render eligibility (1 = draw) for a region of a completed run.
///
/// # Layout
/// Same as `ca_extract_region`.
///
/// # Safety
/// Same as `ca_extract_region`.
///
/// # Returns
/// Number of bytes written, or 0 on error or before the run has completed.
#[no_mangle]
pub unsafe extern "C" fn ca_extract_render_region(
    ptr: *const Simulation,
    out_buf: *mut u8,
    min_x: i16,
    min_y: i16,
    min_z: i16,
    max_x: i16,
    max_y: i16,
    max_z: i16,
) -> u64 {
    if ptr.is_null() || out_buf.is_null() {
        return 0;
    }

    let sim = &*ptr;
    let (lattice, outcome) = match (sim.lattice(), sim.outcome()) {
        (Some(l), Some(o)) => (l, o),
        _ => return 0,
    };

    let region = Region::new(Coord::new(min_x, min_y, min_z), Coord::new(max_x, max_y, max_z));
    let buf_slice = std::slice::from_raw_parts_mut(out_buf, region_len(region.min, region.max));
    automaton::extract_render_region(lattice, &outcome.render_mask, buf_slice, region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::lattice::ca_tick;
    use crate::ffi::lifecycle::ca_destroy;
    use crate::ffi::test_support::{create, SOLID_CORE};
    use std::ptr;

    #[test]
    fn test_extract_region() {
        unsafe {
            let sim = create(SOLID_CORE);
            ca_tick(sim);

            let mut buffer = vec![0u8; 64];
            let bytes = ca_extract_region(sim, buffer.as_mut_ptr(), 0, 0, 0, 4, 4, 4);

            assert_eq!(bytes, 64);
            assert_eq!(buffer.iter().filter(|&&b| b == 1).count(), 8);
            assert_eq!(buffer[0], 0); // (0,0,0)
            assert_eq!(buffer[16 + 4 + 1], 1); // (1,1,1)

            ca_destroy(sim);
        }
    }

    #[test]
    fn test_extract_region_clamped() {
        unsafe {
            let sim = create(SOLID_CORE);

            let mut buffer = vec![0u8; 216];
            let bytes = ca_extract_region(sim, buffer.as_mut_ptr(), -1, -1, -1, 5, 5, 5);
            assert_eq!(bytes, 64);
            assert!(buffer[..64].iter().all(|&b| b == 1));

            ca_destroy(sim);
        }
    }

    #[test]
    fn test_extract_render_region() {
        unsafe {
            let sim = create(SOLID_CORE);

            let mut buffer = vec![0u8; 64];
            assert_eq!(
                ca_extract_render_region(sim, buffer.as_mut_ptr(), 0, 0, 0, 4, 4, 4),
                0
            );

            ca_tick(sim);
            assert_eq!(
                ca_extract_render_region(sim, buffer.as_mut_ptr(), 0, 0, 0, 4, 4, 4),
                64
            );
            assert_eq!(buffer.iter().filter(|&&b| b == 1).count(), 8);

            ca_destroy(sim);
        }
    }

    #[test]
    fn test_null_pointer_handling() {
        unsafe {
            let mut buffer = vec![0u8; 64];

            assert_eq!(
                ca_extract_region(ptr::null(), buffer.as_mut_ptr(), 0, 0, 0, 4, 4, 4),
                0
            );
            let sim = create(SOLID_CORE);
            assert_eq!(ca_extract_region(sim, ptr::null_mut(), 0, 0, 0, 4, 4, 4), 0);
            assert_eq!(
                ca_extract_render_region(ptr::null(), buffer.as_mut_ptr(), 0, 0, 0, 4, 4, 4),
                0
            );
            ca_destroy(sim);
        }
    }
}

//! Region extraction for the rendering layer.

use super::lattice::{Coord, Lattice};

/// Axis-aligned block of cells, `min` inclusive and `max` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub min: Coord,
    pub max: Coord,
}

impl Region {
    pub fn new(min: Coord, max: Coord) -> Self {
        Region { min, max }
    }

    /// Whole lattice of the given side.
    pub fn full(side: i16) -> Self {
        Region {
            min: Coord::new(0, 0, 0),
            max: Coord::new(side, side, side),
        }
    }

    /// Clamp to `[0, side]` on every axis. `None` for an empty or inverted block.
    fn clamp(self, side: i16) -> Option<Region> {
        let c = |v: i16| v.max(0).min(side);
        let min = Coord::new(c(self.min.x), c(self.min.y), c(self.min.z));
        let max = Coord::new(c(self.max.x), c(self.max.y), c(self.max.z));
        if min.x >= max.x || min.y >= max.y || min.z >= max.z {
            return None;
        }
        Some(Region { min, max })
    }

    fn volume(&self) -> usize {
        (self.max.x - self.min.x) as usize
            * (self.max.y - self.min.y) as usize
            * (self.max.z - self.min.z) as usize
    }
}

/// Copy one byte per cell of `region` into `out_buf`, z,y,x order (z changes
/// slowest, x changes fastest).
///
/// # Returns
/// Number of bytes written, or 0 when the clamped region is empty or the
/// buffer is too small.
fn copy_region<F>(lattice: &Lattice, out_buf: &mut [u8], region: Region, cell: F) -> u64
where
    F: Fn(usize) -> u8,
{
    let region = match region.clamp(lattice.side()) {
        Some(r) => r,
        None => return 0,
    };

    // Ensure buffer is large enough
    if out_buf.len() < region.volume() {
        return 0;
    }

    let mut offset = 0;
    for z in region.min.z..region.max.z {
        for y in region.min.y..region.max.y {
            for x in region.min.x..region.max.x {
                out_buf[offset] = cell(lattice.index_of(Coord::new(x, y, z)));
                offset += 1;
            }
        }
    }

    offset as u64
}

/// Extract committed alive/dead state (1/0) for a region.
pub fn extract_region(lattice: &Lattice, out_buf: &mut [u8], region: Region) -> u64 {
    let cells = lattice.cells();
    copy_region(lattice, out_buf, region, |idx| cells[idx])
}

/// Extract a render-eligibility mask (1 = draw) for a region.
///
/// `mask` is indexed like [`Lattice::cells`]; a short mask yields 0.
pub fn extract_render_region(
    lattice: &Lattice,
    mask: &[bool],
    out_buf: &mut [u8],
    region: Region,
) -> u64 {
    if mask.len() != lattice.len() {
        return 0;
    }
    copy_region(lattice, out_buf, region, |idx| mask[idx] as u8)
}

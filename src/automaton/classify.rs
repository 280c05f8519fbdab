//! Post-run classification: which cells get drawn and which host rewards.

use rayon::prelude::*;

use super::lattice::{Coord, Lattice};
use super::rewards::RewardPool;
use super::rules::count_live_neighbors;
use super::topology::{face_neighbor_offsets, Neighborhood};
use crate::error::Result;

/// Alive, and not walled in on all six faces by other alive cells.
pub fn is_render_eligible(lattice: &Lattice, coord: Coord) -> Result<bool> {
    if !lattice.get(coord.x, coord.y, coord.z)? {
        return Ok(false);
    }
    let enclosed = face_neighbor_offsets().len() as u8;
    Ok(count_live_neighbors(lattice, coord, Neighborhood::Face) != enclosed)
}

/// Render eligibility for every cell, indexed like [`Lattice::cells`].
pub fn render_mask(lattice: &Lattice) -> Vec<bool> {
    let enclosed = face_neighbor_offsets().len() as u8;
    (0..lattice.len())
        .into_par_iter()
        .map(|idx| {
            lattice.alive_at(idx)
                && count_live_neighbors(lattice, lattice.coord_of(idx), Neighborhood::Face)
                    != enclosed
        })
        .collect()
}

/// Every dead cell, in lattice order.
pub fn collect_dead_cell_pool(lattice: &Lattice) -> RewardPool {
    let cells = (0..lattice.len())
        .filter(|&idx| !lattice.alive_at(idx))
        .map(|idx| lattice.coord_of(idx))
        .collect();
    RewardPool::new(cells)
}

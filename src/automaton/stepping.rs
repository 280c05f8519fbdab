//! Synchronous generation update.
//!
//! Every cell of generation N+1 is computed from the committed generation N
//! only. The current buffer is shared read-only across rayon workers, the
//! next buffer is split between them, and the swap happens after the
//! parallel loop has joined.

use rayon::prelude::*;

use super::lattice::{Lattice, ALIVE, DEAD};
use super::rules::{count_live_neighbors, RuleSet};
use super::topology::{NeighborCache, Neighborhood};
use crate::error::{AutomatonError, Result};

/// Step the lattice forward by one generation using cached neighbor lists.
///
/// Runs on the current rayon pool; wrap in `ThreadPool::install` to pick
/// the worker count. Returns the new generation number.
pub fn step_generation(
    lattice: &mut Lattice,
    rules: &RuleSet,
    neighbors: &NeighborCache,
) -> Result<u64> {
    if neighbors.len() != lattice.len() || neighbors.neighborhood() != Neighborhood::Moore {
        return Err(AutomatonError::config(format!(
            "neighbor cache for side {} does not fit lattice of side {}",
            neighbors.side(),
            lattice.side()
        )));
    }

    let (current, next) = lattice.buffers_mut();
    next.par_iter_mut().enumerate().for_each(|(idx, slot)| {
        let live = neighbors.count_live(current, idx);
        *slot = if rules.next_state(current[idx] == ALIVE, live) {
            ALIVE
        } else {
            DEAD
        };
    });

    Ok(lattice.commit_generation())
}

/// Single-threaded step that resolves neighbors on the fly.
///
/// Slower than [`step_generation`]; kept as the plain reading of the rule
/// for small lattices and for cross-checking the cached path.
pub fn step_generation_serial(lattice: &mut Lattice, rules: &RuleSet) -> Result<u64> {
    lattice.begin_generation();
    for idx in 0..lattice.len() {
        let coord = lattice.coord_of(idx);
        let live = count_live_neighbors(lattice, coord, Neighborhood::Moore);
        let alive = rules.next_state(lattice.alive_at(idx), live);
        lattice.stage_next(coord.x, coord.y, coord.z, alive)?;
    }
    Ok(lattice.commit_generation())
}

//! Reward placement: distinct dead cells drawn at random.

use rand::Rng;

use super::lattice::Coord;
use crate::error::{AutomatonError, Result};

/// Dead cells still free to host a reward. Drawn cells are removed, so a
/// cell can be handed out at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardPool {
    cells: Vec<Coord>,
}

impl RewardPool {
    pub fn new(cells: Vec<Coord>) -> Self {
        RewardPool { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    /// Remove and return a uniformly chosen cell.
    pub fn take_random<R>(&mut self, rng: &mut R) -> Option<Coord>
    where
        R: Rng + ?Sized,
    {
        if self.cells.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.cells.len());
        Some(self.cells.swap_remove(idx))
    }
}

/// Draw `count` distinct cells from `pool`.
///
/// When the pool runs dry first, returns `InsufficientCapacity` carrying every
/// cell that was placed; the pool is left empty.
pub fn place_rewards<R>(pool: &mut RewardPool, count: usize, rng: &mut R) -> Result<Vec<Coord>>
where
    R: Rng + ?Sized,
{
    let mut placed = Vec::with_capacity(count.min(pool.len()));
    while placed.len() < count {
        match pool.take_random(rng) {
            Some(coord) => placed.push(coord),
            None => {
                return Err(AutomatonError::InsufficientCapacity {
                    requested: count,
                    placed,
                })
            }
        }
    }
    Ok(placed)
}

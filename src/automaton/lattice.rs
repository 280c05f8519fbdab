//! Dense cubic lattice of alive/dead cells with a double buffer.
//!
//! Cells are stored one byte each (0 = dead, 1 = alive) in z,y,x order
//! (z changes slowest, x changes fastest). A generation is staged into the
//! `next` buffer and becomes visible only when `commit_generation` swaps the
//! two buffers.

use glam::Vec3;
use rayon::prelude::*;

use crate::error::{AutomatonError, Result};

pub const DEAD: u8 = 0;
pub const ALIVE: u8 = 1;

/// Largest supported side length. Keeps every linear index inside `u32`.
pub const MAX_SIDE: i16 = 1024;

/// Integer position of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Coord {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Coord { x, y, z }
    }

    /// Shift by a relative offset. `None` if a component overflows `i16`.
    #[inline]
    pub fn translate(self, offset: [i16; 3]) -> Option<Coord> {
        Some(Coord {
            x: self.x.checked_add(offset[0])?,
            y: self.y.checked_add(offset[1])?,
            z: self.z.checked_add(offset[2])?,
        })
    }
}

/// The cell grid plus its staging buffer.
#[derive(Clone, Debug)]
pub struct Lattice {
    side: i16,
    cells: Vec<u8>,
    next: Vec<u8>,
    staging: bool,
    generation: u64,
}

fn validate_side(side: i16) -> Result<usize> {
    if side <= 0 {
        return Err(AutomatonError::config(format!(
            "side length must be positive, got {side}"
        )));
    }
    if side > MAX_SIDE {
        return Err(AutomatonError::config(format!(
            "side length {side} exceeds maximum of {MAX_SIDE}"
        )));
    }
    let n = side as usize;
    Ok(n * n * n)
}

/// Calculate the linear index for a 3D coordinate.
#[inline]
pub fn index_of(side: i16, coord: Coord) -> usize {
    let n = side as usize;
    coord.z as usize * n * n + coord.y as usize * n + coord.x as usize
}

/// Inverse of [`index_of`].
#[inline]
pub fn coord_of(side: i16, index: usize) -> Coord {
    let n = side as usize;
    Coord {
        x: (index % n) as i16,
        y: ((index / n) % n) as i16,
        z: (index / (n * n)) as i16,
    }
}

/// Check if coordinates are within a lattice of the given side.
#[inline]
pub fn in_bounds(side: i16, x: i16, y: i16, z: i16) -> bool {
    x >= 0 && x < side && y >= 0 && y < side && z >= 0 && z < side
}

impl Lattice {
    /// Allocate an N×N×N lattice, seeding every cell from `seed`.
    ///
    /// Seeding is independent per coordinate, so it runs in parallel.
    pub fn initialize<F>(side: i16, seed: F) -> Result<Self>
    where
        F: Fn(Coord) -> bool + Sync,
    {
        let len = validate_side(side)?;

        let mut cells = vec![DEAD; len];
        cells.par_iter_mut().enumerate().for_each(|(idx, cell)| {
            if seed(coord_of(side, idx)) {
                *cell = ALIVE;
            }
        });
        let next = cells.clone();

        Ok(Lattice {
            side,
            cells,
            next,
            staging: false,
            generation: 0,
        })
    }

    /// Lattice with every cell in the same state.
    pub fn filled(side: i16, alive: bool) -> Result<Self> {
        Self::initialize(side, |_| alive)
    }

    pub fn side(&self) -> i16 {
        self.side
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Total number of cells (N³).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Read-only view of the committed generation.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    pub fn in_bounds(&self, x: i16, y: i16, z: i16) -> bool {
        in_bounds(self.side, x, y, z)
    }

    #[inline]
    pub fn index_of(&self, coord: Coord) -> usize {
        index_of(self.side, coord)
    }

    #[inline]
    pub fn coord_of(&self, index: usize) -> Coord {
        coord_of(self.side, index)
    }

    fn checked_index(&self, x: i16, y: i16, z: i16) -> Result<usize> {
        if !self.in_bounds(x, y, z) {
            return Err(AutomatonError::OutOfBounds {
                x,
                y,
                z,
                side: self.side,
            });
        }
        Ok(self.index_of(Coord::new(x, y, z)))
    }

    /// Committed state of a cell.
    pub fn get(&self, x: i16, y: i16, z: i16) -> Result<bool> {
        let idx = self.checked_index(x, y, z)?;
        Ok(self.cells[idx] == ALIVE)
    }

    /// Committed state by linear index. Caller guarantees `index < len()`.
    #[inline]
    pub fn alive_at(&self, index: usize) -> bool {
        self.cells[index] == ALIVE
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == ALIVE).count()
    }

    /// All coordinates in lattice iteration order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.cells.len()).map(move |idx| self.coord_of(idx))
    }

    /// Start staging a new generation.
    ///
    /// The next buffer starts as a copy of the current one, so any cell
    /// left unstaged carries its current value into the new generation.
    pub fn begin_generation(&mut self) {
        self.next.copy_from_slice(&self.cells);
        self.staging = true;
    }

    pub fn is_staging(&self) -> bool {
        self.staging
    }

    /// Write a cell's next state. Never affects [`Lattice::get`] until commit.
    pub fn stage_next(&mut self, x: i16, y: i16, z: i16, alive: bool) -> Result<()> {
        let idx = self.checked_index(x, y, z)?;
        if !self.staging {
            self.begin_generation();
        }
        self.next[idx] = if alive { ALIVE } else { DEAD };
        Ok(())
    }

    /// Make the staged buffer current. Returns the new generation number.
    /// No-op when nothing was begun.
    pub fn commit_generation(&mut self) -> u64 {
        if self.staging {
            std::mem::swap(&mut self.cells, &mut self.next);
            self.staging = false;
            self.generation += 1;
        }
        self.generation
    }

    /// Split borrow of (current, next) for a whole-lattice update.
    pub(crate) fn buffers_mut(&mut self) -> (&[u8], &mut [u8]) {
        if !self.staging {
            self.begin_generation();
        }
        (&self.cells, &mut self.next)
    }

    /// Center of a cell in host space, for cubes of edge `sub_cell_size`.
    pub fn world_position(&self, coord: Coord, sub_cell_size: f32) -> Vec3 {
        Vec3::new(coord.x as f32, coord.y as f32, coord.z as f32) * sub_cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize() {
        let lattice = Lattice::filled(8, false).unwrap();
        assert_eq!(lattice.side(), 8);
        assert_eq!(lattice.len(), 512);
        assert_eq!(lattice.generation(), 0);
        assert!(lattice.cells().iter().all(|&c| c == DEAD));
    }

    #[test]
    fn test_initialize_rejects_bad_side() {
        assert!(matches!(
            Lattice::filled(0, true),
            Err(AutomatonError::Configuration(_))
        ));
        assert!(matches!(
            Lattice::filled(-3, true),
            Err(AutomatonError::Configuration(_))
        ));
        assert!(matches!(
            Lattice::filled(MAX_SIDE + 1, true),
            Err(AutomatonError::Configuration(_))
        ));
    }

    #[test]
    fn test_initialize_uses_predicate() {
        let lattice = Lattice::initialize(4, |c| c.x == c.y && c.y == c.z).unwrap();
        assert_eq!(lattice.alive_count(), 4);
        assert!(lattice.get(2, 2, 2).unwrap());
        assert!(!lattice.get(2, 1, 2).unwrap());
    }

    #[test]
    fn test_index_of() {
        // First cell
        assert_eq!(index_of(4, Coord::new(0, 0, 0)), 0);
        // Last cell
        assert_eq!(index_of(4, Coord::new(3, 3, 3)), 63);
        assert_eq!(index_of(4, Coord::new(1, 0, 0)), 1);
        assert_eq!(index_of(4, Coord::new(0, 1, 0)), 4);
        assert_eq!(index_of(4, Coord::new(0, 0, 1)), 16);

        for idx in 0..64 {
            assert_eq!(index_of(4, coord_of(4, idx)), idx);
        }
    }

    #[test]
    fn test_in_bounds() {
        assert!(in_bounds(4, 0, 0, 0));
        assert!(in_bounds(4, 3, 3, 3));

        assert!(!in_bounds(4, -1, 0, 0));
        assert!(!in_bounds(4, 4, 0, 0));
        assert!(!in_bounds(4, 0, -1, 0));
        assert!(!in_bounds(4, 0, 4, 0));
        assert!(!in_bounds(4, 0, 0, -1));
        assert!(!in_bounds(4, 0, 0, 4));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let lattice = Lattice::filled(4, true).unwrap();
        assert!(matches!(
            lattice.get(4, 0, 0),
            Err(AutomatonError::OutOfBounds { x: 4, side: 4, .. })
        ));
        assert!(lattice.get(0, -1, 0).is_err());
    }

    #[test]
    fn test_staged_value_hidden_until_commit() {
        let mut lattice = Lattice::filled(4, false).unwrap();
        lattice.begin_generation();
        lattice.stage_next(1, 2, 3, true).unwrap();

        assert!(!lattice.get(1, 2, 3).unwrap());
        assert_eq!(lattice.generation(), 0);

        assert_eq!(lattice.commit_generation(), 1);
        assert!(lattice.get(1, 2, 3).unwrap());
    }

    #[test]
    fn test_unstaged_cells_carry_over() {
        let mut lattice = Lattice::initialize(3, |c| c.x == 0).unwrap();
        let before = lattice.cells().to_vec();

        lattice.begin_generation();
        lattice.stage_next(2, 2, 2, true).unwrap();
        lattice.commit_generation();

        for (idx, &prev) in before.iter().enumerate() {
            if lattice.coord_of(idx) == Coord::new(2, 2, 2) {
                assert_eq!(lattice.cells()[idx], ALIVE);
            } else {
                assert_eq!(lattice.cells()[idx], prev);
            }
        }
    }

    #[test]
    fn test_stale_buffer_does_not_leak() {
        // A generation staged after a swap must start from the new current
        // state, not from whatever the old buffer held.
        let mut lattice = Lattice::filled(2, false).unwrap();
        lattice.stage_next(0, 0, 0, true).unwrap();
        lattice.commit_generation();

        lattice.begin_generation();
        lattice.stage_next(1, 1, 1, true).unwrap();
        lattice.commit_generation();

        assert!(lattice.get(0, 0, 0).unwrap());
        assert!(lattice.get(1, 1, 1).unwrap());
        assert_eq!(lattice.alive_count(), 2);
        assert_eq!(lattice.generation(), 2);
    }

    #[test]
    fn test_commit_without_begin_is_noop() {
        let mut lattice = Lattice::filled(2, true).unwrap();
        assert_eq!(lattice.commit_generation(), 0);
        assert_eq!(lattice.alive_count(), 8);
    }

    #[test]
    fn test_stage_out_of_bounds() {
        let mut lattice = Lattice::filled(2, true).unwrap();
        assert!(lattice.stage_next(2, 0, 0, false).is_err());
        assert!(!lattice.is_staging());
    }

    #[test]
    fn test_world_position() {
        let lattice = Lattice::filled(4, true).unwrap();
        let pos = lattice.world_position(Coord::new(1, 2, 3), 2.0);
        assert_eq!(pos, Vec3::new(2.0, 4.0, 6.0));
    }
}

//! Neighbor offsets and bounded neighbor enumeration.
//!
//! The Moore offsets are built once at compile time in z,y,x loop order
//! (the same order the lattice is laid out in) and never change.

use super::lattice::{coord_of, in_bounds, index_of, Coord};

/// Relative position of a neighbor: `[dx, dy, dz]`.
pub type Offset = [i16; 3];

const fn build_moore_offsets() -> [Offset; 26] {
    let mut out = [[0i16; 3]; 26];
    let mut i = 0;
    let mut dz = -1;
    while dz <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dx = -1;
            while dx <= 1 {
                // Skip the center cell
                if !(dx == 0 && dy == 0 && dz == 0) {
                    out[i] = [dx, dy, dz];
                    i += 1;
                }
                dx += 1;
            }
            dy += 1;
        }
        dz += 1;
    }
    out
}

/// Moore neighborhood: every cell sharing a face, edge or corner.
pub static MOORE_OFFSETS: [Offset; 26] = build_moore_offsets();

/// Face adjacency: ±1 along a single axis.
pub static FACE_OFFSETS: [Offset; 6] = [
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
];

pub fn full_neighbor_offsets() -> &'static [Offset] {
    &MOORE_OFFSETS
}

pub fn face_neighbor_offsets() -> &'static [Offset] {
    &FACE_OFFSETS
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Neighborhood {
    /// 26 neighbors.
    Moore,
    /// 6 neighbors.
    Face,
}

impl Neighborhood {
    pub fn offsets(self) -> &'static [Offset] {
        match self {
            Neighborhood::Moore => full_neighbor_offsets(),
            Neighborhood::Face => face_neighbor_offsets(),
        }
    }
}

/// In-bounds neighbors of one cell. Cheap to copy; every call to
/// [`ValidNeighbors::iter`] replays the same sequence.
#[derive(Clone, Copy, Debug)]
pub struct ValidNeighbors {
    center: Coord,
    side: i16,
    offsets: &'static [Offset],
}

impl ValidNeighbors {
    pub fn iter(&self) -> NeighborIter {
        NeighborIter {
            center: self.center,
            side: self.side,
            offsets: self.offsets.iter(),
        }
    }
}

impl IntoIterator for ValidNeighbors {
    type Item = Coord;
    type IntoIter = NeighborIter;

    fn into_iter(self) -> NeighborIter {
        self.iter()
    }
}

impl IntoIterator for &ValidNeighbors {
    type Item = Coord;
    type IntoIter = NeighborIter;

    fn into_iter(self) -> NeighborIter {
        self.iter()
    }
}

#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord,
    side: i16,
    offsets: std::slice::Iter<'static, Offset>,
}

impl Iterator for NeighborIter {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        for &offset in self.offsets.by_ref() {
            if let Some(c) = self.center.translate(offset) {
                if in_bounds(self.side, c.x, c.y, c.z) {
                    return Some(c);
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.offsets.len()))
    }
}

/// Neighbors of `coord` under `neighborhood`, filtered to `[0, side)³`.
pub fn valid_neighbors_of(coord: Coord, side: i16, neighborhood: Neighborhood) -> ValidNeighbors {
    ValidNeighbors {
        center: coord,
        side,
        offsets: neighborhood.offsets(),
    }
}

/// Per-cell lists of in-bounds neighbor indices, stored flat.
///
/// Neighbors of cell `i` live in `indices[starts[i]..starts[i + 1]]`.
/// Bounds are resolved once at build time, so stepping never checks them.
pub struct NeighborCache {
    side: i16,
    neighborhood: Neighborhood,
    starts: Vec<usize>,
    indices: Vec<u32>,
}

impl NeighborCache {
    pub fn build(side: i16, neighborhood: Neighborhood) -> Self {
        let n = side.max(0) as usize;
        let len = n * n * n;
        let mut starts = Vec::with_capacity(len + 1);
        let mut indices = Vec::with_capacity(len * neighborhood.offsets().len());

        starts.push(0);
        for idx in 0..len {
            let center = coord_of(side, idx);
            for nb in valid_neighbors_of(center, side, neighborhood) {
                indices.push(index_of(side, nb) as u32);
            }
            starts.push(indices.len());
        }

        log::debug!(
            "built {:?} neighbor cache: {} cells, {} links",
            neighborhood,
            len,
            indices.len()
        );

        NeighborCache {
            side,
            neighborhood,
            starts,
            indices,
        }
    }

    pub fn side(&self) -> i16 {
        self.side
    }

    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.starts.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn neighbors(&self, index: usize) -> &[u32] {
        &self.indices[self.starts[index]..self.starts[index + 1]]
    }

    /// Live neighbors of cell `index` in a 0/1 cell buffer.
    #[inline]
    pub fn count_live(&self, cells: &[u8], index: usize) -> u8 {
        self.neighbors(index)
            .iter()
            .map(|&nb| cells[nb as usize])
            .sum()
    }
}

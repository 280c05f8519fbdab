//! Survival/birth rules over live-neighbor counts.
//!
//! A rule is written `S/B`: survival counts, a slash, birth counts. Each side
//! is a comma-separated list of counts or inclusive ranges, e.g.
//! `13-26/13-14,17-19`. Either side may be empty.

use std::fmt;
use std::str::FromStr;

use super::lattice::{Coord, Lattice};
use super::topology::{valid_neighbors_of, Neighborhood};
use crate::error::{AutomatonError, Result};

/// Upper bound on any live-neighbor count (full Moore neighborhood).
pub const MAX_NEIGHBORS: u8 = 26;

/// Set of neighbor counts in `0..=26`, one bit per count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NeighborCounts(u32);

impl NeighborCounts {
    pub const EMPTY: NeighborCounts = NeighborCounts(0);

    pub fn from_counts<I>(counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut set = NeighborCounts::EMPTY;
        for count in counts {
            set.insert(count)?;
        }
        Ok(set)
    }

    fn insert(&mut self, count: u8) -> Result<()> {
        if count > MAX_NEIGHBORS {
            return Err(AutomatonError::config(format!(
                "neighbor count {count} exceeds {MAX_NEIGHBORS}"
            )));
        }
        self.0 |= 1 << count;
        Ok(())
    }

    #[inline]
    pub fn contains(self, count: u8) -> bool {
        count <= MAX_NEIGHBORS && self.0 & (1 << count) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..=MAX_NEIGHBORS).filter(move |&c| self.contains(c))
    }

    fn parse(text: &str) -> Result<Self> {
        let mut set = NeighborCounts::EMPTY;
        for item in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match item.split_once('-') {
                Some((lo, hi)) => {
                    let lo = parse_count(lo)?;
                    let hi = parse_count(hi)?;
                    if lo > hi {
                        return Err(AutomatonError::config(format!(
                            "descending range {item:?} in rule"
                        )));
                    }
                    for count in lo..=hi {
                        set.insert(count)?;
                    }
                }
                None => set.insert(parse_count(item)?)?,
            }
        }
        Ok(set)
    }
}

fn parse_count(text: &str) -> Result<u8> {
    text.trim()
        .parse::<u8>()
        .map_err(|e| AutomatonError::config(format!("bad neighbor count {text:?}: {e}")))
}

impl fmt::Display for NeighborCounts {
    /// Collapses consecutive counts into `a-b` ranges.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: Vec<u8> = self.iter().collect();
        let mut first = true;
        let mut i = 0;
        while i < counts.len() {
            let start = counts[i];
            let mut end = start;
            while i + 1 < counts.len() && counts[i + 1] == end + 1 {
                end += 1;
                i += 1;
            }
            if !first {
                f.write_str(",")?;
            }
            first = false;
            if start == end {
                write!(f, "{start}")?;
            } else {
                write!(f, "{start}-{end}")?;
            }
            i += 1;
        }
        Ok(())
    }
}

/// A survival set and a birth set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RuleSet {
    pub survival: NeighborCounts,
    pub birth: NeighborCounts,
}

impl RuleSet {
    /// Build a rule. A rule with no survival and no birth counts would kill
    /// every cell in one generation and is rejected.
    pub fn new(survival: NeighborCounts, birth: NeighborCounts) -> Result<Self> {
        if survival.is_empty() && birth.is_empty() {
            return Err(AutomatonError::config(
                "survival and birth sets are both empty",
            ));
        }
        Ok(RuleSet { survival, birth })
    }

    pub fn from_lists(survival: &[u8], birth: &[u8]) -> Result<Self> {
        Self::new(
            NeighborCounts::from_counts(survival.iter().copied())?,
            NeighborCounts::from_counts(birth.iter().copied())?,
        )
    }

    /// 13-26/13-14,17-19: dense solids that erode into cave systems.
    pub fn cavern() -> Self {
        RuleSet {
            survival: NeighborCounts((13..=26).fold(0, |bits, c| bits | 1 << c)),
            birth: NeighborCounts([13, 14, 17, 18, 19].iter().fold(0, |bits, c| bits | 1 << c)),
        }
    }

    #[inline]
    pub fn next_state(&self, alive: bool, live_neighbors: u8) -> bool {
        next_state(alive, live_neighbors, self.survival, self.birth)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::cavern()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.survival, self.birth)
    }
}

impl FromStr for RuleSet {
    type Err = AutomatonError;

    fn from_str(s: &str) -> Result<Self> {
        let (survival, birth) = s
            .split_once('/')
            .ok_or_else(|| AutomatonError::config(format!("rule {s:?} is missing '/'")))?;
        Self::new(NeighborCounts::parse(survival)?, NeighborCounts::parse(birth)?)
    }
}

/// Next state of one cell.
///
/// - Alive: survives iff `live_neighbors` is in `survival`.
/// - Dead: is born iff `live_neighbors` is in `birth`.
#[inline]
pub fn next_state(
    alive: bool,
    live_neighbors: u8,
    survival: NeighborCounts,
    birth: NeighborCounts,
) -> bool {
    if alive {
        survival.contains(live_neighbors)
    } else {
        birth.contains(live_neighbors)
    }
}

/// Count alive neighbors of `coord`, skipping positions outside the lattice.
pub fn count_live_neighbors(lattice: &Lattice, coord: Coord, neighborhood: Neighborhood) -> u8 {
    valid_neighbors_of(coord, lattice.side(), neighborhood)
        .iter()
        .filter(|&nb| lattice.alive_at(lattice.index_of(nb)))
        .count() as u8
}

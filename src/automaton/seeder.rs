//! Dead-zone seeding: random spheres carved out of a solid lattice.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::lattice::{Coord, Lattice};
use crate::error::{AutomatonError, Result};

/// Inclusive range for the number of dead zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub fn validate(&self) -> Result<()> {
        if self.min > self.max {
            return Err(AutomatonError::config(format!(
                "dead zone count range {}..={} is empty",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Inclusive range for dead-zone radii, in cells.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadiusRange {
    pub min: f32,
    pub max: f32,
}

impl RadiusRange {
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min < 0.0 {
            return Err(AutomatonError::config(format!(
                "dead zone radius range {}..={} must be finite and non-negative",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(AutomatonError::config(format!(
                "dead zone radius range {}..={} is empty",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// A sphere whose cells start dead. Only lives through seeding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeadZoneSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl DeadZoneSphere {
    /// Inclusive: a cell exactly `radius` away is inside.
    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        let p = Vec3::new(coord.x as f32, coord.y as f32, coord.z as f32);
        p.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Draw a random batch of dead zones.
///
/// Count is uniform in `count`, each center uniform in `[0, side)³`, each
/// radius uniform in `radius`.
pub fn generate_dead_zones<R>(
    side: i16,
    count: CountRange,
    radius: RadiusRange,
    rng: &mut R,
) -> Result<Vec<DeadZoneSphere>>
where
    R: Rng + ?Sized,
{
    if side <= 0 {
        return Err(AutomatonError::config(format!(
            "side length must be positive, got {side}"
        )));
    }
    count.validate()?;
    radius.validate()?;

    let extent = side as f32;
    let n = rng.gen_range(count.min..=count.max);
    let spheres = (0..n)
        .map(|_| DeadZoneSphere {
            center: Vec3::new(
                rng.gen_range(0.0..extent),
                rng.gen_range(0.0..extent),
                rng.gen_range(0.0..extent),
            ),
            radius: rng.gen_range(radius.min..=radius.max),
        })
        .collect();

    Ok(spheres)
}

/// Seeded state of one cell: dead inside any sphere, alive otherwise.
#[inline]
pub fn derive_initial_state(coord: Coord, spheres: &[DeadZoneSphere]) -> bool {
    !spheres.iter().any(|s| s.contains(coord))
}

/// Build the initial lattice from a batch of spheres.
pub fn seed_lattice(side: i16, spheres: &[DeadZoneSphere]) -> Result<Lattice> {
    Lattice::initialize(side, |c| derive_initial_state(c, spheres))
}

//! Simulation configuration, loaded from TOML.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::automaton::lattice::MAX_SIDE;
use crate::automaton::rules::RuleSet;
use crate::automaton::seeder::{CountRange, RadiusRange};
use crate::error::{AutomatonError, Result};

/// Bounded runs stop after a fixed number of generations and then classify
/// the lattice; unbounded runs tick until told to stop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RunMode {
    Bounded { generations: u32 },
    Unbounded,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    #[serde(default = "default_side_length")]
    pub side_length: i16,
    /// Edge length of one cell in host units. Only used for placement.
    #[serde(default = "default_sub_cell_size")]
    pub sub_cell_size: f32,
    #[serde(default = "default_survival")]
    pub survival: Vec<u8>,
    #[serde(default = "default_birth")]
    pub birth: Vec<u8>,
    #[serde(default)]
    pub tick_interval_ms: u64,
    #[serde(default = "default_reward_count")]
    pub reward_count: usize,
    /// Fixed RNG seed for reproducible runs; fresh entropy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Worker threads for the per-generation loop (0 means 1).
    #[serde(default = "default_threads")]
    pub threads: u8,
    // Tables last so the struct serializes as valid TOML.
    #[serde(default = "default_run")]
    pub run: RunMode,
    #[serde(default = "default_dead_zone_count")]
    pub dead_zone_count: CountRange,
    #[serde(default = "default_dead_zone_radius")]
    pub dead_zone_radius: RadiusRange,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            side_length: default_side_length(),
            sub_cell_size: default_sub_cell_size(),
            survival: default_survival(),
            birth: default_birth(),
            tick_interval_ms: 0,
            run: default_run(),
            dead_zone_count: default_dead_zone_count(),
            dead_zone_radius: default_dead_zone_radius(),
            reward_count: default_reward_count(),
            seed: None,
            threads: default_threads(),
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Check every field. Returns the parsed rule set on success.
    pub fn validate(&self) -> Result<RuleSet> {
        if self.side_length <= 0 || self.side_length > MAX_SIDE {
            return Err(AutomatonError::config(format!(
                "side_length must be in 1..={MAX_SIDE}, got {}",
                self.side_length
            )));
        }
        if !self.sub_cell_size.is_finite() || self.sub_cell_size <= 0.0 {
            return Err(AutomatonError::config(
                "sub_cell_size must be finite and greater than zero",
            ));
        }
        self.dead_zone_count.validate()?;
        self.dead_zone_radius.validate()?;
        self.rules()
    }

    pub fn rules(&self) -> Result<RuleSet> {
        RuleSet::from_lists(&self.survival, &self.birth)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn worker_threads(&self) -> usize {
        self.threads.max(1) as usize
    }
}

fn default_side_length() -> i16 {
    70
}

fn default_sub_cell_size() -> f32 {
    1.0
}

fn default_survival() -> Vec<u8> {
    (13..=26).collect()
}

fn default_birth() -> Vec<u8> {
    vec![13, 14, 17, 18, 19]
}

fn default_run() -> RunMode {
    RunMode::Bounded { generations: 15 }
}

fn default_dead_zone_count() -> CountRange {
    CountRange { min: 4, max: 8 }
}

fn default_dead_zone_radius() -> RadiusRange {
    RadiusRange { min: 3.0, max: 8.0 }
}

fn default_reward_count() -> usize {
    10
}

fn default_threads() -> u8 {
    1
}

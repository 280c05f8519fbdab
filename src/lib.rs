//! Cube Automata - 3D Cellular Automaton Library
//!
//! A cube of N³ cells evolves under a survival/birth rule over the 26-cell
//! Moore neighborhood. A bounded run then reports which cells a host should
//! draw and places rewards in the dead space. The `ffi` module exposes the
//! same operations over a C ABI.

pub mod automaton;
pub mod config;
pub mod error;
pub mod ffi;

pub use automaton::{Coord, Lattice, RuleSet, SchedulerState, Simulation};
pub use config::{RunMode, SimulationConfig};
pub use error::{AutomatonError, Result};

#[cfg(test)]
mod tests;

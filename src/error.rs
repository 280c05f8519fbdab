//! Error type shared by every automaton operation.

use thiserror::Error;

use crate::automaton::lattice::Coord;
use crate::automaton::scheduler::SchedulerState;

#[derive(Debug, Error)]
pub enum AutomatonError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("coordinate ({x}, {y}, {z}) outside lattice of side {side}")]
    OutOfBounds { x: i16, y: i16, z: i16, side: i16 },

    /// Fewer dead cells than requested rewards. `placed` holds every reward
    /// that did fit, so callers can carry on with the shorter list.
    #[error("requested {requested} rewards but only {} dead cells were available", placed.len())]
    InsufficientCapacity { requested: usize, placed: Vec<Coord> },

    #[error("cannot {action} while scheduler is {from:?}")]
    InvalidTransition {
        from: SchedulerState,
        action: &'static str,
    },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AutomatonError>;

impl AutomatonError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        AutomatonError::Configuration(msg.into())
    }
}

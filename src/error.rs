//! Error types for the simulator

use thiserror::Error;

use crate::mac::{NodeId, NodeState};

#[derive(Error, Debug)]
pub enum SimError {
    /// A node was asked to start transmitting while not idle. Always a caller bug.
    #[error("Invalid state transition: node {node} cannot begin transmission while {state:?}")]
    InvalidStateTransition { node: NodeId, state: NodeState },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

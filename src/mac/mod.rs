pub mod event;
pub mod node;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use event::SimEvent;
pub use node::{Node, ProtocolParams};

pub type NodeId = usize;

/// Protocol state of a single station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeState {
    Idle,         // Nothing to send
    Transmitting, // Frame on the medium
    BackingOff,   // Waiting to retry
    Colliding,    // Collision detected, jamming
}

impl NodeState {
    pub fn label(self) -> &'static str {
        match self {
            NodeState::Idle => "IDLE",
            NodeState::Transmitting => "TX",
            NodeState::BackingOff => "BACKOFF",
            NodeState::Colliding => "COLLISION",
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

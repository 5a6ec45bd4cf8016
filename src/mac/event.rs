use std::fmt;

use serde::Serialize;

use super::NodeId;

/// Transition notifications emitted by the core, one per state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    TransmissionStarted { node: NodeId },
    CollisionDetected { node: NodeId, backoff: u32 },
    BackoffStarted { node: NodeId, backoff: u32 },
    TransmissionSucceeded { node: NodeId },
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::TransmissionStarted { node } => {
                write!(f, "Node {} starts transmission.", node)
            }
            SimEvent::CollisionDetected { node, backoff } => write!(
                f,
                "Collision detected for node {}. Backing off with time {}.",
                node, backoff
            ),
            SimEvent::BackoffStarted { node, backoff } => {
                write!(f, "Node {} starts backoff with time {}.", node, backoff)
            }
            SimEvent::TransmissionSucceeded { node } => {
                write!(f, "Node {} transmitted successfully.", node)
            }
        }
    }
}

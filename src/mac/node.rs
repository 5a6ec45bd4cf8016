use tracing::{debug, trace};

use super::{NodeId, NodeState, SimEvent};
use crate::error::{Result, SimError};
use crate::utils::random::RandomSource;

/// Per-node protocol constants, shared by every station of a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtocolParams {
    pub collision_probability: f64,
    /// Exclusive upper bound of every backoff draw
    pub max_backoff: u32,
}

/// One station on the shared medium.
///
/// `state` and `backoff_counter` only change through [`Node::begin_transmission`]
/// and [`Node::update`]. The counter is only read in `BackingOff` and `Colliding`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    state: NodeState,
    backoff_counter: u32,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            state: NodeState::Idle,
            backoff_counter: 0,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn backoff_counter(&self) -> u32 {
        self.backoff_counter
    }

    pub fn is_idle(&self) -> bool {
        self.state == NodeState::Idle
    }

    /// Idle -> Transmitting. Any other state is rejected untouched.
    pub fn begin_transmission(&mut self) -> Result<SimEvent> {
        if self.state != NodeState::Idle {
            return Err(SimError::InvalidStateTransition {
                node: self.id,
                state: self.state,
            });
        }
        self.state = NodeState::Transmitting;
        debug!("Node {} -> Transmitting", self.id);
        Ok(SimEvent::TransmissionStarted { node: self.id })
    }

    /// Advance this node by one tick.
    ///
    /// Returns the event of the transition that fired, or `None` when the node
    /// stayed put (idle, or a counter was decremented).
    pub fn update<R: RandomSource + ?Sized>(
        &mut self,
        params: &ProtocolParams,
        rng: &mut R,
    ) -> Option<SimEvent> {
        match self.state {
            NodeState::Idle => None,
            NodeState::Transmitting => {
                let r = rng.unit();
                if r < params.collision_probability {
                    self.state = NodeState::Colliding;
                    self.backoff_counter = rng.below(params.max_backoff);
                    debug!(
                        "Node {} -> Colliding (r = {:.3}, backoff {})",
                        self.id, r, self.backoff_counter
                    );
                    Some(SimEvent::CollisionDetected {
                        node: self.id,
                        backoff: self.backoff_counter,
                    })
                } else {
                    self.state = NodeState::Idle;
                    debug!("Node {} -> Idle (r = {:.3})", self.id, r);
                    Some(SimEvent::TransmissionSucceeded { node: self.id })
                }
            }
            NodeState::BackingOff => {
                if self.backoff_counter == 0 {
                    self.state = NodeState::Transmitting;
                    debug!("Node {} -> Transmitting (backoff expired)", self.id);
                    Some(SimEvent::TransmissionStarted { node: self.id })
                } else {
                    self.backoff_counter -= 1;
                    trace!("Node {} backoff counter: {}", self.id, self.backoff_counter);
                    None
                }
            }
            NodeState::Colliding => {
                if self.backoff_counter == 0 {
                    // Second draw for the same collision; the jam countdown and
                    // the retry wait are independent.
                    self.state = NodeState::BackingOff;
                    self.backoff_counter = rng.below(params.max_backoff);
                    debug!(
                        "Node {} -> BackingOff (backoff {})",
                        self.id, self.backoff_counter
                    );
                    Some(SimEvent::BackoffStarted {
                        node: self.id,
                        backoff: self.backoff_counter,
                    })
                } else {
                    self.backoff_counter -= 1;
                    trace!("Node {} collision counter: {}", self.id, self.backoff_counter);
                    None
                }
            }
        }
    }
}

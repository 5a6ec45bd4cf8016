//! Tick-driven simulation of CSMA/CD stations sharing one medium.
//!
//! Collisions are a local random event per transmitting node; simultaneous
//! transmissions of different nodes do not interfere with each other.

pub mod error;
pub mod mac;
pub mod sim;
pub mod ui;
pub mod utils;

pub use error::{Result, SimError};
pub use mac::{Node, NodeId, NodeState, SimEvent};
pub use sim::{NodeSnapshot, SimConfig, SimStats, Simulation};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SimError};
use crate::mac::ProtocolParams;
use crate::utils::consts::{COLLISION_PROBABILITY, MAX_BACKOFF, NUM_NODES};

/// Experiment parameters, fixed for the lifetime of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub num_nodes: usize,
    pub collision_probability: f64,
    /// Exclusive upper bound of a backoff draw
    pub max_backoff: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_nodes: NUM_NODES,
            collision_probability: COLLISION_PROBABILITY,
            max_backoff: MAX_BACKOFF,
        }
    }
}

impl SimConfig {
    /// Load from a JSON file; missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: SimConfig = serde_json::from_str(&text)?;
        info!("Loaded config from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_nodes == 0 {
            return Err(SimError::InvalidConfig(
                "num_nodes must be at least 1".to_string(),
            ));
        }
        // Idle-node selection draws an index as u32
        if u32::try_from(self.num_nodes).is_err() {
            return Err(SimError::InvalidConfig(format!(
                "num_nodes must be at most {}, got {}",
                u32::MAX,
                self.num_nodes
            )));
        }
        if !(0.0..=1.0).contains(&self.collision_probability) {
            return Err(SimError::InvalidConfig(format!(
                "collision_probability must be within [0, 1], got {}",
                self.collision_probability
            )));
        }
        if self.max_backoff == 0 {
            return Err(SimError::InvalidConfig(
                "max_backoff must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn protocol_params(&self) -> ProtocolParams {
        ProtocolParams {
            collision_probability: self.collision_probability,
            max_backoff: self.max_backoff,
        }
    }
}

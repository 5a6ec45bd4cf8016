/// Number of stations on the shared medium
pub const NUM_NODES: usize = 5;

/// Chance that a transmitting node detects a collision on a tick
pub const COLLISION_PROBABILITY: f64 = 0.2;

/// Exclusive upper bound of a backoff draw (counter ∈ 0..MAX_BACKOFF)
pub const MAX_BACKOFF: u32 = 10;

/// Tick cadence of the scheduler (ms)
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Log level (overridden by RUST_LOG)
pub const LOG_LEVEL: &str = "info";

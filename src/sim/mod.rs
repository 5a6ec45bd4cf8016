pub mod config;
pub mod runner;
pub mod sink;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, trace};

pub use config::SimConfig;
pub use runner::{Command, Runner, spawn_ticker};
pub use sink::{EventSink, JsonLinesSink, TracingSink};

use crate::error::Result;
use crate::mac::{Node, NodeId, NodeState, ProtocolParams, SimEvent};
use crate::utils::random::RandomSource;

/// Read-only view of one node handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub state: NodeState,
}

/// Counters accumulated over the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    pub ticks: u64,
    pub transmissions_started: u64,
    pub successes: u64,
    pub collisions: u64,
    pub backoffs: u64,
    pub injections: u64,
    /// Send requests that found no idle node
    pub injections_dropped: u64,
}

impl SimStats {
    fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::TransmissionStarted { .. } => self.transmissions_started += 1,
            SimEvent::CollisionDetected { .. } => self.collisions += 1,
            SimEvent::BackoffStarted { .. } => self.backoffs += 1,
            SimEvent::TransmissionSucceeded { .. } => self.successes += 1,
        }
    }
}

/// Owns the node population and advances it in lockstep.
///
/// Nodes are created once, ids `0..num_nodes` in order, and never added or
/// removed. Every draw comes from the injected `rng`, so a seeded source makes
/// a run reproducible.
pub struct Simulation<R: RandomSource = StdRng> {
    nodes: Vec<Node>,
    params: ProtocolParams,
    rng: R,
    sinks: Vec<Box<dyn EventSink + Send>>,
    stats: SimStats,
}

impl Simulation<StdRng> {
    pub fn with_seed(config: SimConfig, seed: u64) -> Result<Self> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: SimConfig) -> Result<Self> {
        Self::new(config, StdRng::from_os_rng())
    }
}

impl<R: RandomSource> Simulation<R> {
    pub fn new(config: SimConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let nodes = (0..config.num_nodes).map(Node::new).collect();
        info!(
            "Simulation with {} nodes (collision probability {}, max backoff {})",
            config.num_nodes, config.collision_probability, config.max_backoff
        );
        Ok(Self {
            nodes,
            params: config.protocol_params(),
            rng,
            sinks: Vec::new(),
            stats: SimStats::default(),
        })
    }

    /// Register an observer; it sees every event fired from now on.
    pub fn subscribe<S: EventSink + Send + 'static>(&mut self, sink: S) {
        self.sinks.push(Box::new(sink));
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn ticks(&self) -> u64 {
        self.stats.ticks
    }

    pub fn stats(&self) -> SimStats {
        self.stats
    }

    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        self.nodes
            .iter()
            .map(|node| NodeSnapshot {
                id: node.id(),
                state: node.state(),
            })
            .collect()
    }

    /// Advance every node once, in ascending id order.
    pub fn tick(&mut self) {
        self.stats.ticks += 1;
        trace!("Tick {}", self.stats.ticks);
        for i in 0..self.nodes.len() {
            if let Some(event) = self.nodes[i].update(&self.params, &mut self.rng) {
                self.emit(event);
            }
        }
    }

    /// Start a transmission on a node picked uniformly from the idle ones.
    ///
    /// Returns the chosen node, or `None` when every node is busy.
    pub fn inject_transmission(&mut self) -> Result<Option<NodeId>> {
        self.stats.injections += 1;
        let idle: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_idle())
            .map(|(i, _)| i)
            .collect();

        if idle.is_empty() {
            self.stats.injections_dropped += 1;
            debug!("No idle node, send request dropped");
            return Ok(None);
        }

        // len <= num_nodes <= u32::MAX, checked by SimConfig::validate
        let pick = idle[self.rng.below(idle.len() as u32) as usize];
        let event = self.nodes[pick].begin_transmission()?;
        self.emit(event);
        Ok(Some(self.nodes[pick].id()))
    }

    fn emit(&mut self, event: SimEvent) {
        self.stats.record(&event);
        for sink in self.sinks.iter_mut() {
            sink.on_event(&event);
        }
    }
}

//! Command loop that serializes ticks and send requests onto one owner.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use rand::rngs::StdRng;
use tracing::{debug, warn};

use super::Simulation;
use crate::error::Result;
use crate::utils::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Tick,       // Advance one time step
    SendPacket, // "Send Packet" pressed
    Shutdown,
}

/// Single consumer of [`Command`]s; the only code touching the simulation
/// while it runs.
pub struct Runner<R: RandomSource = StdRng> {
    sim: Simulation<R>,
    commands: Receiver<Command>,
    send_every: Option<u64>,
    max_ticks: Option<u64>,
}

impl<R: RandomSource> Runner<R> {
    pub fn new(sim: Simulation<R>, commands: Receiver<Command>) -> Self {
        Self {
            sim,
            commands,
            send_every: None,
            max_ticks: None,
        }
    }

    /// Inject a send request after every `n`th tick. `0` disables it.
    pub fn send_every(mut self, n: u64) -> Self {
        self.send_every = (n > 0).then_some(n);
        self
    }

    /// Stop after `n` ticks. `0` runs until shutdown.
    pub fn max_ticks(mut self, n: u64) -> Self {
        self.max_ticks = (n > 0).then_some(n);
        self
    }

    /// Drain commands until `Shutdown`, a closed channel, or the tick limit.
    ///
    /// `on_frame` sees the settled simulation after every tick and after every
    /// injection, including the automatic ones of `send_every`.
    pub fn run<F>(mut self, mut on_frame: F) -> Result<Simulation<R>>
    where
        F: FnMut(&Simulation<R>),
    {
        debug!("Runner started");
        while let Ok(command) = self.commands.recv() {
            match command {
                Command::Tick => {
                    self.sim.tick();
                    on_frame(&self.sim);
                    let ticks = self.sim.ticks();
                    if self.send_every.is_some_and(|n| ticks % n == 0) {
                        self.sim.inject_transmission()?;
                        on_frame(&self.sim);
                    }
                    if self.max_ticks.is_some_and(|max| ticks >= max) {
                        debug!("Tick limit {} reached", ticks);
                        break;
                    }
                }
                Command::SendPacket => {
                    if self.sim.inject_transmission()?.is_none() {
                        warn!("All nodes busy, nothing to send");
                    }
                    on_frame(&self.sim);
                }
                Command::Shutdown => {
                    debug!("Shutdown requested");
                    break;
                }
            }
        }
        debug!("Runner stopped after {} ticks", self.sim.ticks());
        Ok(self.sim)
    }
}

/// Emit `Command::Tick` every `interval` until `running` clears or the
/// receiver goes away.
pub fn spawn_ticker(
    tx: Sender<Command>,
    interval: Duration,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::SeqCst) {
            thread::sleep(interval);
            if !running.load(Ordering::SeqCst) {
                break;
            }
            if tx.send(Command::Tick).is_err() {
                break;
            }
        }
        debug!("Ticker stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mac::NodeState;
    use crate::sim::SimConfig;

    #[test]
    fn test_commands_applied_in_order() {
        let sim = Simulation::with_seed(SimConfig::default(), 11).unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(Command::SendPacket).unwrap();
        tx.send(Command::SendPacket).unwrap();
        tx.send(Command::Shutdown).unwrap();
        tx.send(Command::Tick).unwrap(); // never reached

        let mut frames = 0;
        let sim = Runner::new(sim, rx).run(|_| frames += 1).unwrap();

        assert_eq!(frames, 2);
        assert_eq!(sim.ticks(), 0);
        let busy = sim
            .nodes()
            .iter()
            .filter(|n| n.state() == NodeState::Transmitting)
            .count();
        assert_eq!(busy, 2);
    }

    #[test]
    fn test_closed_channel_stops_runner() {
        let sim = Simulation::with_seed(SimConfig::default(), 3).unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(Command::Tick).unwrap();
        drop(tx);

        let sim = Runner::new(sim, rx).run(|_| {}).unwrap();
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn test_send_every_and_tick_limit() {
        let sim = Simulation::with_seed(SimConfig::default(), 5).unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        let running = Arc::new(AtomicBool::new(true));
        let ticker = spawn_ticker(tx, Duration::from_millis(1), running.clone());

        let sim = Runner::new(sim, rx)
            .send_every(2)
            .max_ticks(6)
            .run(|_| {})
            .unwrap();
        running.store(false, Ordering::SeqCst);
        ticker.join().unwrap();

        assert_eq!(sim.ticks(), 6);
        assert_eq!(sim.stats().injections, 3);
    }

    #[test]
    fn test_frame_after_tick_and_after_automatic_send() {
        let sim = Simulation::with_seed(SimConfig::default(), 8).unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        for _ in 0..3 {
            tx.send(Command::Tick).unwrap();
        }
        drop(tx);

        // (ticks, injections) seen by each frame
        let mut frames = Vec::new();
        let sim = Runner::new(sim, rx)
            .send_every(1)
            .run(|sim| frames.push((sim.ticks(), sim.stats().injections)))
            .unwrap();

        let stats = sim.stats();
        assert_eq!(frames.len() as u64, stats.ticks + stats.injections);
        assert_eq!(
            frames,
            vec![(1, 0), (1, 1), (2, 1), (2, 2), (3, 2), (3, 3)]
        );
    }
}

use std::io::Write;
use std::sync::{Arc, Mutex};

use crossbeam_channel::Sender;
use tracing::{error, info, warn};

use crate::mac::SimEvent;

/// Observer for transition events fired by the simulation.
pub trait EventSink {
    fn on_event(&mut self, event: &SimEvent);
}

/// Collects events in firing order; keep a clone of the `Arc` to read them.
impl EventSink for Arc<Mutex<Vec<SimEvent>>> {
    fn on_event(&mut self, event: &SimEvent) {
        match self.lock() {
            Ok(mut events) => events.push(*event),
            Err(err) => error!("Event log lock error: {}", err),
        }
    }
}

/// Forwards events to another thread. A closed receiver is logged, not fatal.
impl EventSink for Sender<SimEvent> {
    fn on_event(&mut self, event: &SimEvent) {
        if let Err(err) = self.send(*event) {
            warn!("Event receiver gone: {}", err);
        }
    }
}

/// Writes each event as a human-readable log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&mut self, event: &SimEvent) {
        info!("{}", event);
    }
}

/// Writes one JSON object per event and line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn on_event(&mut self, event: &SimEvent) {
        let written = serde_json::to_writer(&mut self.writer, event)
            .map_err(|e| e.to_string())
            .and_then(|_| writeln!(self.writer).map_err(|e| e.to_string()));
        if let Err(err) = written {
            error!("Failed to write event: {}", err);
        }
    }
}

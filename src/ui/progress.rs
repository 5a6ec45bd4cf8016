use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct ProgressManager {
    mp: MultiProgress,
    bars: Arc<Mutex<HashMap<String, ProgressBar>>>,
}

impl ProgressManager {
    pub fn new() -> Self {
        Self {
            mp: MultiProgress::new(),
            bars: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a bar
    /// - `id`: unique bar key
    /// - `total`: length
    /// - `template`: indicatif template
    /// - `message`: initial message
    pub fn create_bar(
        &self,
        id: &str,
        total: u64,
        template: &str,
        message: &str,
    ) -> Result<(), String> {
        let mut bars = self.bars.lock().map_err(|e| format!("Lock error: {}", e))?;

        if bars.contains_key(id) {
            return Err(format!("Progress bar '{}' already exists", id));
        }

        let style = ProgressStyle::default_bar()
            .template(template)
            .map_err(|e| format!("Bad template: {}", e))?
            .progress_chars("█▉▊▋▌▍▎▏ ");
        let pb = self.mp.add(ProgressBar::new(total));
        pb.set_style(style);
        pb.set_message(message.to_string());

        bars.insert(id.to_string(), pb);
        Ok(())
    }

    pub fn set_position(&self, id: &str, pos: u64) -> Result<(), String> {
        self.with_bar(id, |pb| pb.set_position(pos))
    }

    pub fn set_message(&self, id: &str, message: &str) -> Result<(), String> {
        self.with_bar(id, |pb| pb.set_message(message.to_string()))
    }

    pub fn exists(&self, id: &str) -> bool {
        if let Ok(bars) = self.bars.lock() {
            bars.contains_key(id)
        } else {
            false
        }
    }

    /// Hide the bars while `f` writes to the terminal, then redraw them.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.mp.suspend(f)
    }

    /// Finish every bar, keeping it on screen
    pub fn finish_all(&self) {
        if let Ok(mut bars) = self.bars.lock() {
            for (_, pb) in bars.drain() {
                pb.finish();
            }
        }
    }

    fn with_bar<F: FnOnce(&ProgressBar)>(&self, id: &str, f: F) -> Result<(), String> {
        let bars = self.bars.lock().map_err(|e| format!("Lock error: {}", e))?;
        if let Some(pb) = bars.get(id) {
            f(pb);
            Ok(())
        } else {
            Err(format!("Progress bar '{}' not found", id))
        }
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

pub mod templates {
    pub const TICKS: &str =
        "SIM  [{bar:30.cyan}] {percent}% ({pos}/{len} ticks) {msg}";
}

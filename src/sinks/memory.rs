//! In-memory sink

use crate::core::{Result, Severity, Sink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects rendered lines in memory
///
/// Clones share the same buffer, so one clone can be handed to a handle and
/// another kept for inspection.
///
/// # Example
///
/// ```
/// use slot_logger::prelude::*;
///
/// let sink = MemorySink::new();
/// let handle = Handle::builder()
///     .catalog(Catalog::new(["hello %1"]))
///     .sink(sink.clone())
///     .build()
///     .unwrap();
///
/// log_record!(handle, Severity::Notice, 0, "world");
/// handle.drain();
/// assert_eq!(sink.lines(), vec!["hello world"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<(Severity, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&mut self, severity: Severity, line: &str) -> Result<()> {
        self.entries.lock().push((severity, line.to_string()));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

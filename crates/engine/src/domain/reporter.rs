// crates/engine/src/domain/reporter.rs

//! Reporting capability handed to the pipeline instead of global logger state.

use std::sync::Mutex;

use tracing::Level;

use super::types::Country;

pub trait Reporter {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn debug(&self, _message: &str) {}
}

/// Forwards to `tracing`, tagging every event with the country being fetched.
#[derive(Debug, Clone, Copy)]
pub struct TracingReporter {
    country: Country,
}

impl TracingReporter {
    pub fn new(country: Country) -> Self {
        Self { country }
    }
}

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        tracing::info!(country = %self.country, "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(country = %self.country, "{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!(country = %self.country, "{message}");
    }
}

/// Keeps every message in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.lock().clone()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages_at(Level::WARN)
    }

    fn record(&self, level: Level, message: &str) {
        self.lock().push((level, message.to_string()));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Level, String)>> {
        // A poisoned log is still a usable log.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Reporter for MemoryReporter {
    fn info(&self, message: &str) {
        self.record(Level::INFO, message);
    }

    fn warn(&self, message: &str) {
        self.record(Level::WARN, message);
    }

    fn debug(&self, message: &str) {
        self.record(Level::DEBUG, message);
    }
}

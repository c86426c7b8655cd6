//! Diagnostic sink and tracing setup.
//!
//! The library never installs a global subscriber. A run reports through a
//! `DiagnosticSink` handed to it at construction; the default forwards to
//! `tracing`, and the `mrate` binary installs the subscriber via `init_tracing`.

use std::sync::{Mutex, PoisonError};

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Leveled, observational messages emitted during a rating run.
///
/// Called concurrently from scoring workers, so implementations must be
/// `Send + Sync`. Nothing a sink does may influence the run.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.emit(Level::INFO, message);
    }

    fn warn(&self, message: &str) {
        self.emit(Level::WARN, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::ERROR, message);
    }
}

/// Forwards every message to the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "mortgage_rating", "{message}"),
            Level::WARN => tracing::warn!(target: "mortgage_rating", "{message}"),
            Level::INFO => tracing::info!(target: "mortgage_rating", "{message}"),
            Level::DEBUG => tracing::debug!(target: "mortgage_rating", "{message}"),
            _ => tracing::trace!(target: "mortgage_rating", "{message}"),
        }
    }
}

/// Keeps every message in memory. Used by tests and callers that want to
/// inspect quality signals after a run.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, level: Level, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

/// Install the global `tracing` subscriber for the binary.
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init_tracing(default_filter: &str) -> Result<(), AppError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter).map_err(|e| {
            AppError::new(2, format!("Invalid log level/filter '{default_filter}': {e}"))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| AppError::new(4, format!("Failed to install tracing subscriber: {e}")))
}

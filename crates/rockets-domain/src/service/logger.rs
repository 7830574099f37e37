//! Logger - The sink the miner reports through
//!
//! Passed into the miner rather than reached as a process-wide global,
//! so a caller can capture or silence what the engine says.

/// Logger interface for dependency injection
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to the `tracing` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "rockets::miner", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "rockets::miner", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "rockets::miner", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "rockets::miner", "{}", message);
    }
}

/// No-op logger for testing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

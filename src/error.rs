//! Error types for the cycle core
//!
//! The sequence model and cycle controller report failures with the typed
//! [`CycleError`]. Application code (config loading, history log, CLI) wraps
//! these in `anyhow` with context.

use thiserror::Error;

/// Errors raised by the sequence model, the cycle controller and the session driver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    /// An index outside `[1, count]` was used for a lookup or a selection
    #[error("index {index} is out of range (valid: 1..={count})")]
    IndexOutOfRange {
        /// The rejected index
        index: usize,
        /// Number of panels in the sequence
        count: usize,
    },

    /// Options rejected at initialization time
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The session was torn down; no further commands are accepted
    #[error("session has been stopped")]
    SessionClosed,
}

impl CycleError {
    /// Shorthand for an [`CycleError::InvalidConfiguration`] with a message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

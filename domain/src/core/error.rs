//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown database: {0}")]
    UnknownDatabase(String),

    #[error("Invalid tool specification: {0}")]
    InvalidToolSpec(String),

    #[error("Invalid chain depth: depth {depth} exceeds total depth {total_depth}")]
    InvalidDepth { depth: usize, total_depth: usize },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

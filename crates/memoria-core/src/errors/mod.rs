//! Error taxonomy for the Memoria engine (see spec §7).
//!
//! Kinds, not type names: validation/not-found errors are surfaced to the
//! tool caller verbatim; conflicts are retried internally and only
//! propagate when unrecoverable; provider errors are absorbed by callers
//! via a fallback path and never reach this enum; store errors and
//! dimension mismatches propagate as-is.

use thiserror::Error;

pub type MemoriaResult<T> = Result<T, MemoriaError>;

#[derive(Debug, Error)]
pub enum MemoriaError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("memory not found: {id}")]
    NotFound { id: String },

    #[error("optimistic lock conflict on {id} after {attempts} attempts")]
    Conflict { id: String, attempts: u32 },

    #[error("embedding provider error: {0}")]
    Provider(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("record {id} has no embedding")]
    NoEmbedding { id: String },

    #[error("record already exists: {id}")]
    AlreadyExists { id: String },
}

impl MemoriaError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Whether this error kind should be reported to the external caller
    /// without mutating any state (per §7's propagation policy).
    pub fn is_precondition_failure(&self) -> bool {
        matches!(
            self,
            MemoriaError::Validation(_) | MemoriaError::NotFound { .. } | MemoriaError::DimensionMismatch { .. }
        )
    }
}

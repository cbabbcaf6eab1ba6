//! Error types for the regina-core crate.

use thiserror::Error;

/// Main error type for regina-core operations.
#[derive(Debug, Error)]
#[allow(missing_docs)] // Error variant fields are self-documenting via #[error] attribute
pub enum CoreError {
    /// Dimensions, signs, or other preconditions of a constructor were violated.
    #[error("precondition violated: {reason}")]
    PreconditionViolation { reason: String },

    /// A chain-coordinate vector was expected to lie in ker(M) but does not.
    #[error("vector is not a cycle: {reason}")]
    NotACycle { reason: String },

    /// A chain-coordinate vector was expected to lie in im(N) but does not.
    #[error("vector is not a boundary: {reason}")]
    NotABoundary { reason: String },

    /// A signature string failed to parse into a concrete object.
    #[error("invalid signature input: {reason}")]
    InvalidInput { reason: String },

    /// An index argument (e.g. into free/torsion generators) was out of range.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A caller-supplied progress tracker requested cancellation.
    #[error("operation cancelled")]
    Cancelled,

    /// A retriangulator worker thread panicked, poisoning the shared search state.
    #[error("worker thread panicked, search state poisoned: {reason}")]
    WorkerPanicked { reason: String },
}

/// Result type alias for regina-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// === Validation Helpers ===

/// Check that a boolean precondition holds, failing with [`CoreError::PreconditionViolation`].
///
/// # Arguments
/// * `condition` - the invariant that must hold
/// * `reason` - human-readable explanation used in the error if it does not
#[inline]
pub fn ensure_precondition(condition: bool, reason: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(CoreError::PreconditionViolation {
            reason: reason.into(),
        })
    }
}

/// Check that an index lies in `[0, len)`.
#[inline]
pub fn check_index_bounds(index: usize, len: usize, name: &str) -> Result<()> {
    if index >= len {
        return Err(CoreError::InvalidArgument {
            reason: format!("{name} {index} out of bounds (len {len})"),
        });
    }
    Ok(())
}

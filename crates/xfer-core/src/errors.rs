//! Cross-cutting error types for xfer.
//!
//! Storage errors (`DatabaseError`, `TransitionError`) live in `xfer-db`;
//! configuration errors live in `xfer-config`.

use thiserror::Error;

/// Errors that can be raised by any xfer crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A status string or value cannot be used where it was given.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::CoreError;
    use crate::enums::RequestStatus;

    #[test]
    fn unknown_status_surfaces_as_invalid_status() {
        let err = "shipped".parse::<RequestStatus>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatus(ref s) if s == "shipped"));
        assert_eq!(err.to_string(), "Invalid status: shipped");
    }

    #[test]
    fn other_wraps_anyhow_transparently() {
        let err = CoreError::from(anyhow::anyhow!("disk full"));
        assert_eq!(err.to_string(), "disk full");
    }
}

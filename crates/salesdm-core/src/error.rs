//! Error types for the reply engine

use thiserror::Error;

/// Failures the reply engine can report to its caller.
///
/// Unclassifiable messages and blank persona fields are not errors; they are
/// resolved through the fallback intent and default phrases.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The platform value is outside the supported channel set
    #[error("unsupported channel: {0}")]
    UnsupportedChannel(String),

    /// A composed response broke one of the output guarantees
    #[error("response invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnsupportedChannel("telegram".to_string());
        assert_eq!(err.to_string(), "unsupported channel: telegram");

        let err = CoreError::InvariantViolation("empty reply".to_string());
        assert!(err.to_string().contains("empty reply"));
    }
}

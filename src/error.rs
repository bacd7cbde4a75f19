use thiserror::Error;

/// Failures surfaced by the perft engine and the board adapters.
///
/// None of these are retryable: perft exists to expose inconsistencies in a
/// move generator, so every error aborts the top-level call that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PerftError {
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("invalid depth {depth}: must be at least {min}")]
    InvalidDepth { depth: i32, min: i32 },

    #[error("oracle contract violation: {0}")]
    OracleContractViolation(String),

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("could not set up position from {input:?}: {reason}")]
    Setup { input: String, reason: String },

    #[error("suite {source_name}: {reason}")]
    Suite { source_name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, PerftError>;

//! Error types for KyroRule.
//!
//! Inference itself is total: adding facts, swapping rule bases and running
//! the engine cannot fail. The only failures are malformed inputs, which are
//! rejected when a `Fact`, `Rule` or `RuleId` is constructed, never during a
//! run.

use thiserror::Error;

/// Validation errors that occur during input construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Fact identifier cannot be empty")]
    EmptyFact,

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Unknown domain '{name}' (expected one of: {expected})")]
    UnknownDomain {
        name: String,
        expected: String,
    },

    #[error("Rule ids are 1-based positions, got {position}")]
    InvalidRuleId {
        position: usize,
    },
}

/// Top-level error type for KyroRule.
#[derive(Debug, Error)]
pub enum KyroError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KyroError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a serialization error.
    #[must_use]
    pub const fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }
}

/// Result type alias for KyroRule operations.
pub type KyroResult<T> = Result<T, KyroError>;

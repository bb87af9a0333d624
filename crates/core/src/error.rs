//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is recoverable: a failed operation leaves the inventory
/// exactly as it was. List-carrying variants hold every problem found, not
/// just the first one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (unknown generation, malformed key, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A stock quantity was not a positive integer (or would overflow).
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// One or more selected parts have no stock left.
    #[error("out of stock: {}", .0.join("; "))]
    OutOfStock(Vec<String>),

    /// One or more compatibility rules rejected the selection.
    #[error("incompatible selection: {}", .0.join("; "))]
    IncompatibleSelection(Vec<String>),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Human-readable reasons carried by this error.
    pub fn reasons(&self) -> Vec<String> {
        match self {
            Self::OutOfStock(r) | Self::IncompatibleSelection(r) => r.clone(),
            other => vec![other.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_variants_join_reasons_in_display() {
        let err = DomainError::OutOfStock(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "out of stock: a; b");
        assert_eq!(err.reasons(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn scalar_variants_report_their_display_as_single_reason() {
        let err = DomainError::InvalidQuantity(0);
        assert_eq!(err.reasons(), vec!["invalid quantity: 0".to_string()]);
    }
}

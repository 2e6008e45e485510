//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, missing items, range checks). Host and IO concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested item was not found (in the catalog or the selection).
    #[error("not found")]
    NotFound,

    /// A numeric input fell outside its permitted range.
    ///
    /// Only produced by strict operations; the default quantity path clamps instead.
    #[error("value {requested} out of range [{min}, {max}]")]
    OutOfRange { requested: i64, min: i64, max: i64 },

    /// A conflict occurred (e.g. duplicate catalog entry).
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Fieldless discriminant of [`DomainError`], for callers that branch on the
/// class of failure without caring about its payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    InvariantViolation,
    InvalidId,
    NotFound,
    OutOfRange,
    Conflict,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn out_of_range(requested: i64, min: i64, max: i64) -> Self {
        Self::OutOfRange { requested, min, max }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::InvariantViolation(_) => ErrorKind::InvariantViolation,
            DomainError::InvalidId(_) => ErrorKind::InvalidId,
            DomainError::NotFound => ErrorKind::NotFound,
            DomainError::OutOfRange { .. } => ErrorKind::OutOfRange,
            DomainError::Conflict(_) => ErrorKind::Conflict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reports_bounds() {
        let err = DomainError::out_of_range(12, 1, 10);
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(err.to_string(), "value 12 out of range [1, 10]");
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(DomainError::not_found().kind(), ErrorKind::NotFound);
        assert_eq!(DomainError::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(DomainError::conflict("x").kind(), ErrorKind::Conflict);
    }
}

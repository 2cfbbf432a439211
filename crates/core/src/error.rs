//! Errors raised while turning raw input into domain values.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// A raw value could not be turned into a domain value.
///
/// Carries the offending input so callers can log it; rule violations on a
/// whole employee are reported separately as message lists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("not a calendar date: {input:?}")]
    InvalidDate { input: String },

    #[error("not an employee id (expected 24 hex characters): {input:?}")]
    InvalidId { input: String },
}

impl DomainError {
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDate { input: input.into() }
    }

    pub fn invalid_id(input: impl Into<String>) -> Self {
        Self::InvalidId { input: input.into() }
    }
}

//! Error types for `roadreg-core`.
//!
//! Every registry operation fails with exactly one [`Error`] kind, so callers
//! (and tests) can tell a malformed field from a rejected update or a broken
//! store.

use thiserror::Error;

/// A field failed its format or range check. Never mutates the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("invalid identifier: {0:?}")]
  Identifier(String),

  #[error("invalid address: {0:?}")]
  Address(String),

  #[error("invalid birth date: {0:?}")]
  BirthDate(String),

  #[error("invalid offense date: {0:?}")]
  OffenseDate(String),

  #[error("demerit points must be between 1 and 6, got {0}")]
  Points(i64),
}

/// An update broke one of the constrained-update rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleViolation {
  #[error("address cannot change while under 18 (age {age})")]
  MinorAddressChange { age: i32 },

  #[error("a birth date change must leave every other field unchanged")]
  BirthDateNotIsolated,

  #[error("identifier starting with an even digit cannot change")]
  IdentifierLocked,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(#[from] ValidationError),

  #[error("person not found: {0}")]
  NotFound(String),

  #[error("update rejected: {0}")]
  RuleViolation(#[from] RuleViolation),

  #[error("identifier already registered: {0}")]
  AlreadyRegistered(String),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn is_validation(&self) -> bool { matches!(self, Self::Validation(_)) }

  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }

  pub fn is_rule_violation(&self) -> bool {
    matches!(self, Self::RuleViolation(_))
  }

  pub fn is_storage(&self) -> bool { matches!(self, Self::Storage(_)) }

  /// A stable, machine-readable name for the error kind.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Validation(_) => "validation",
      Self::NotFound(_) => "not_found",
      Self::RuleViolation(_) => "rule_violation",
      Self::AlreadyRegistered(_) => "already_registered",
      Self::Storage(_) => "storage",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

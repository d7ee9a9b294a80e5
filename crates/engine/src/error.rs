//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`Forbidden`] thrown when an item exists but belongs to another user.
//! - [`InvalidAmount`] and [`InvalidInput`] thrown on malformed values.
//! - [`ExistingKey`] and [`Conflict`] thrown when a mutation clashes with the
//!   current state (duplicate budget, last wallet, default category).
//! - [`DependencyFailure`] thrown when a ledger delta could not be applied;
//!   the surrounding database transaction is rolled back.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Conflict`]: EngineError::Conflict
//!  [`DependencyFailure`]: EngineError::DependencyFailure
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Dependency failure: {0}")]
    DependencyFailure(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::DependencyFailure(a), Self::DependencyFailure(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

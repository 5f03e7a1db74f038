//! The module contains the error the engine can throw.
//!
//! Validation failures (`UnknownDrink`, `NoContributors`, `InvalidAmount`,
//! `OutOfStock`) are local to the operation that raised them. `Database`
//! wraps persistence failures and is always surfaced to the caller, never
//! swallowed.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown drink: {0}")]
    UnknownDrink(String),
    #[error("Restocking needs at least one contributor")]
    NoContributors,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Out of stock: {0}")]
    OutOfStock(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnknownDrink(a), Self::UnknownDrink(b)) => a == b,
            (Self::NoContributors, Self::NoContributors) => true,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::OutOfStock(a), Self::OutOfStock(b)) => a == b,
            (Self::InvalidRole(a), Self::InvalidRole(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

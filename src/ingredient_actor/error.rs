//! Error types for the Ingredient actor.

use crate::model::IngredientId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ingredient operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IngredientError {
    /// The requested ingredient was not found.
    #[error("Ingredient not found: {0}")]
    NotFound(String),

    /// Taking the requested quantity would leave negative stock.
    #[error("Insufficient stock of {ingredient}: required {required}, available {available}")]
    InsufficientStock {
        ingredient: IngredientId,
        required: Decimal,
        available: Decimal,
    },

    /// The quantity supplied is zero or has the wrong sign.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// The ingredient data provided is invalid.
    #[error("Ingredient validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for IngredientError {
    fn from(msg: String) -> Self {
        IngredientError::ActorCommunicationError(msg)
    }
}

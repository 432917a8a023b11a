//! Error types for the Customer actor.

use crate::model::CustomerId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    #[error("Customer not found: {0}")]
    NotFound(String),

    /// Tried to redeem more points than the customer holds.
    #[error("Customer {customer} has {available} points, {requested} requested")]
    InsufficientPoints {
        customer: CustomerId,
        requested: u32,
        available: u32,
    },

    #[error("Customer validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CustomerError {
    fn from(msg: String) -> Self {
        CustomerError::ActorCommunicationError(msg)
    }
}

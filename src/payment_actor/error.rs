//! Error types for the Payment actor.

use crate::model::{PaymentId, PaymentStatus};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("Payment not found: {0}")]
    NotFound(String),

    /// Completed and Failed payments are immutable.
    #[error("Payment {payment} is already {status}")]
    AlreadyTerminal {
        payment: PaymentId,
        status: PaymentStatus,
    },

    #[error("Payment validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for PaymentError {
    fn from(msg: String) -> Self {
        PaymentError::ActorCommunicationError(msg)
    }
}

//! Error types for the Order actor.

use crate::menu_actor::MenuError;
use crate::model::{OrderId, OrderStatus};
use crate::stock::StockError;
use thiserror::Error;

/// Errors that can occur during order operations.
///
/// The `#[from]` variants carry failures from the stores the order consults while
/// it is being created.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// The requested status change is not allowed from the current status.
    #[error("Order {order} cannot {action} while {from}")]
    InvalidTransition {
        order: OrderId,
        from: OrderStatus,
        action: &'static str,
    },

    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Menu(#[from] MenuError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}

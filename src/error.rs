//! Crate-level error type.
//!
//! Every store has its own error enum. [`PosError`] folds them into the categories a
//! caller of the point-of-sale system acts on.

use crate::customer_actor::CustomerError;
use crate::ingredient_actor::IngredientError;
use crate::menu_actor::MenuError;
use crate::model::{CustomerId, OrderId, PaymentId, PaymentStatus};
use crate::order_actor::OrderError;
use crate::payment_actor::PaymentError;
use crate::stock::{Shortage, StockError};
use crate::table_actor::TableError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PosError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Insufficient stock: {}", describe(.0))]
    InsufficientStock(Vec<Shortage>),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Payment {payment} is already {status}")]
    PaymentAlreadyTerminal {
        payment: PaymentId,
        status: PaymentStatus,
    },

    #[error("Customer {customer} has {available} points, {requested} requested")]
    InsufficientPoints {
        customer: CustomerId,
        requested: u32,
        available: u32,
    },

    /// Another unit of work holds the order.
    #[error("Order {0} is busy")]
    ConcurrencyConflict(OrderId),

    /// An actor stopped answering.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

fn describe(shortages: &[Shortage]) -> String {
    shortages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl PosError {
    /// Rejections caused by the state of stock or points rather than by the caller.
    pub fn is_business_rejection(&self) -> bool {
        matches!(
            self,
            PosError::InsufficientStock(_) | PosError::InsufficientPoints { .. }
        )
    }
}

impl From<IngredientError> for PosError {
    fn from(e: IngredientError) -> Self {
        match e {
            IngredientError::NotFound(id) => PosError::NotFound {
                entity: "Ingredient",
                id,
            },
            IngredientError::InsufficientStock {
                ingredient,
                required,
                available,
            } => PosError::InsufficientStock(vec![Shortage {
                ingredient_name: ingredient.to_string(),
                ingredient_id: ingredient,
                unit: String::new(),
                menu_items: Vec::new(),
                required,
                available,
            }]),
            IngredientError::InvalidQuantity(msg) | IngredientError::ValidationError(msg) => {
                PosError::InvalidArgument(msg)
            }
            IngredientError::ActorCommunicationError(msg) => PosError::Unavailable(msg),
        }
    }
}

impl From<MenuError> for PosError {
    fn from(e: MenuError) -> Self {
        match e {
            MenuError::NotFound(id) => PosError::NotFound {
                entity: "MenuItem",
                id,
            },
            MenuError::Unavailable(_) | MenuError::ValidationError(_) => {
                PosError::InvalidArgument(e.to_string())
            }
            MenuError::ActorCommunicationError(msg) => PosError::Unavailable(msg),
        }
    }
}

impl From<StockError> for PosError {
    fn from(e: StockError) -> Self {
        match e {
            StockError::InsufficientStock(shortages) => PosError::InsufficientStock(shortages),
            StockError::InvalidLine(msg) => PosError::InvalidArgument(msg),
            StockError::Ingredient(e) => e.into(),
            StockError::Menu(e) => e.into(),
        }
    }
}

impl From<OrderError> for PosError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(id) => PosError::NotFound { entity: "Order", id },
            OrderError::ValidationError(msg) => PosError::InvalidArgument(msg),
            OrderError::InvalidTransition { .. } => PosError::InvalidTransition(e.to_string()),
            OrderError::Stock(e) => e.into(),
            OrderError::Menu(e) => e.into(),
            OrderError::ActorCommunicationError(msg) => PosError::Unavailable(msg),
        }
    }
}

impl From<PaymentError> for PosError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::NotFound(id) => PosError::NotFound {
                entity: "Payment",
                id,
            },
            PaymentError::AlreadyTerminal { payment, status } => {
                PosError::PaymentAlreadyTerminal { payment, status }
            }
            PaymentError::ValidationError(msg) => PosError::InvalidArgument(msg),
            PaymentError::ActorCommunicationError(msg) => PosError::Unavailable(msg),
        }
    }
}

impl From<CustomerError> for PosError {
    fn from(e: CustomerError) -> Self {
        match e {
            CustomerError::NotFound(id) => PosError::NotFound {
                entity: "Customer",
                id,
            },
            CustomerError::InsufficientPoints {
                customer,
                requested,
                available,
            } => PosError::InsufficientPoints {
                customer,
                requested,
                available,
            },
            CustomerError::ValidationError(msg) => PosError::InvalidArgument(msg),
            CustomerError::ActorCommunicationError(msg) => PosError::Unavailable(msg),
        }
    }
}

impl From<TableError> for PosError {
    fn from(e: TableError) -> Self {
        match e {
            TableError::NotFound(id) => PosError::NotFound { entity: "Table", id },
            TableError::ValidationError(msg) => PosError::InvalidArgument(msg),
            TableError::ActorCommunicationError(msg) => PosError::Unavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IngredientId, OrderStatus};
    use rust_decimal::Decimal;

    #[test]
    fn test_nested_stock_error_is_flattened() {
        let shortage = Shortage {
            ingredient_id: IngredientId(1),
            ingredient_name: "Milk".to_string(),
            unit: "ml".to_string(),
            menu_items: Vec::new(),
            required: Decimal::from(120),
            available: Decimal::from(100),
        };
        let nested = OrderError::Stock(StockError::InsufficientStock(vec![shortage.clone()]));
        assert_eq!(PosError::from(nested), PosError::InsufficientStock(vec![shortage]));
    }

    #[test]
    fn test_transition_keeps_its_message() {
        let e = OrderError::InvalidTransition {
            order: OrderId(2),
            from: OrderStatus::Cancelled,
            action: "cancel",
        };
        assert_eq!(
            PosError::from(e),
            PosError::InvalidTransition("Order order_2 cannot cancel while Cancelled".to_string())
        );
    }

    #[test]
    fn test_channel_failures_are_unavailable() {
        let e = PaymentError::ActorCommunicationError("Actor closed".to_string());
        assert!(matches!(PosError::from(e), PosError::Unavailable(_)));
    }
}

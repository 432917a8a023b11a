//! Customer orders and the order status machine.
//!
//! # Status machine
//!
//! ```text
//!        advance        advance
//!  New ──────────▶ Processing ──────────▶ Ready
//!   │  ╲               │  ╲                 │
//!   │   ╲ await        │   ╲ await          │ await
//!   │    ▼ payment     │    ▼ payment       ▼ payment
//!   │   AwaitingPayment ◀──────────────────┘
//!   │        │  └── payment failed ──▶ (back to the status it came from)
//!   │        ▼ payment completed
//!   └──▶ Completed ──cancel (restock)──▶ Cancelled
//! ```
//!
//! `New`, `Processing` and `Ready` may also be completed directly by a Cash payment
//! or cancelled without any stock effect. Every legal move is listed in
//! [`ORDER_TRANSITIONS`]; anything else is rejected.
use crate::model::{IngredientId, MenuItemId, PaymentId, StockMovement, TableId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

entity_id!(
    /// Type-safe identifier for Orders.
    OrderId,
    "order"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    New,
    Processing,
    Ready,
    AwaitingPayment,
    Completed,
    Cancelled,
}

use OrderStatus::*;

/// Allowed `(from, to)` moves.
pub const ORDER_TRANSITIONS: &[(OrderStatus, OrderStatus)] = &[
    (New, Processing),
    (Processing, Ready),
    (New, AwaitingPayment),
    (Processing, AwaitingPayment),
    (Ready, AwaitingPayment),
    (AwaitingPayment, New),
    (AwaitingPayment, Processing),
    (AwaitingPayment, Ready),
    (New, Completed),
    (Processing, Completed),
    (Ready, Completed),
    (AwaitingPayment, Completed),
    (New, Cancelled),
    (Processing, Cancelled),
    (Ready, Cancelled),
    (Completed, Cancelled),
];

impl OrderStatus {
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        ORDER_TRANSITIONS.contains(&(self, next))
    }

    /// Kitchen workflow successor, if any.
    pub fn next_in_workflow(self) -> Option<OrderStatus> {
        match self {
            New => Some(Processing),
            Processing => Some(Ready),
            _ => None,
        }
    }

    /// The order still occupies its table.
    pub fn is_active(self) -> bool {
        matches!(self, New | Processing | Ready | AwaitingPayment)
    }

    /// A payment may be started from this status.
    pub fn is_payable(self) -> bool {
        matches!(self, New | Processing | Ready)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Completed | Cancelled)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            New => "New",
            Processing => "Processing",
            Ready => "Ready",
            AwaitingPayment => "AwaitingPayment",
            Completed => "Completed",
            Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

/// A priced line on an order. Name and unit price are copied from the menu at
/// creation so later menu edits do not change the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderLine {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Requested line: which menu item and how many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRequest {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
}

impl LineRequest {
    pub fn new(menu_item_id: MenuItemId, quantity: u32) -> Self {
        Self {
            menu_item_id,
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub table_id: TableId,
    pub customer_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
    /// Status to return to if an in-flight Mobile payment fails.
    pub resume_status: Option<OrderStatus>,
    pub payment_id: Option<PaymentId>,
    /// What was taken out of stock when the order completed.
    pub deducted: Option<Vec<StockMovement>>,
    pub restocked: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Quantity of `ingredient` charged to this order, zero if none.
    pub fn deducted_quantity(&self, ingredient: &IngredientId) -> Decimal {
        self.deducted
            .iter()
            .flatten()
            .filter(|movement| &movement.ingredient_id == ingredient)
            .map(|movement| movement.quantity)
            .sum()
    }
}

/// Payload for creating a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_id: TableId,
    pub customer_name: Option<String>,
    pub lines: Vec<LineRequest>,
}

/// Lines are fixed once the order exists; only descriptive fields can change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub customer_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states_have_no_forward_moves() {
        for to in [New, Processing, Ready, AwaitingPayment, Completed] {
            assert!(!Cancelled.can_transition_to(to));
            assert!(!Completed.can_transition_to(to));
        }
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn test_workflow_never_moves_backward() {
        assert!(!Ready.can_transition_to(Processing));
        assert!(!Processing.can_transition_to(New));
        assert_eq!(Ready.next_in_workflow(), None);
        assert_eq!(New.next_in_workflow(), Some(Processing));
    }

    #[test]
    fn test_awaiting_payment_cannot_be_cancelled() {
        assert!(!AwaitingPayment.can_transition_to(Cancelled));
        assert!(AwaitingPayment.can_transition_to(Completed));
    }
}

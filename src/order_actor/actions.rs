//! Status actions for the Order actor.
//!
//! Each action is one edge (or a small family of edges) of the order status machine.
//! The entity refuses any action whose edge is missing from
//! [`ORDER_TRANSITIONS`](crate::model::order::ORDER_TRANSITIONS).

use crate::model::{OrderStatus, PaymentId, StockMovement};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Kitchen workflow: `New -> Processing -> Ready`, one step.
    Advance,
    /// A Mobile payment was started; remembers the current status.
    AwaitPayment,
    /// The Mobile payment failed; go back to the remembered status.
    ResumeAfterFailedPayment,
    /// Payment succeeded. Records the payment and what was taken out of stock.
    Complete {
        payment_id: PaymentId,
        deducted: Vec<StockMovement>,
    },
    /// Cancels the order. If it had been completed, hands back the stock to restock.
    Cancel,
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    /// New status.
    Advance(OrderStatus),
    /// Status the order was in before.
    AwaitPayment(OrderStatus),
    /// Status the order returned to.
    ResumeAfterFailedPayment(OrderStatus),
    Complete(()),
    /// Movements to put back into stock, if the order had consumed any.
    Cancel(Option<Vec<StockMovement>>),
}

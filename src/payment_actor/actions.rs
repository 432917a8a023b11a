//! Settlement actions for the Payment actor.

use crate::model::Payment;

#[derive(Debug, Clone)]
pub enum PaymentAction {
    /// Money received. Records the points the customer earned with it.
    Complete { points_earned: u32 },
    /// The payment did not go through.
    Fail { reason: String },
}

/// Results from PaymentActions; each carries the settled payment.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentActionResult {
    Complete(Payment),
    Fail(Payment),
}

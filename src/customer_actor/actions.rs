//! Loyalty actions for the Customer actor.
//!
//! Every forward action has an inverse (`Accrue`/`RevokeAccrual`,
//! `Consume`/`RefundPoints`) so a payment that is rolled back can undo exactly what
//! it did to the customer.

use crate::model::{MembershipTier, PaymentId};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub enum CustomerAction {
    /// Credits a completed purchase: points, spend and one more order.
    Accrue {
        points: u32,
        spend: Decimal,
        payment: PaymentId,
    },
    RevokeAccrual {
        points: u32,
        spend: Decimal,
        payment: PaymentId,
    },
    /// Redeems points against a payment and records the redemption.
    Consume {
        points: u32,
        discount: Decimal,
        payment: PaymentId,
    },
    RefundPoints { points: u32, payment: PaymentId },
    /// Recomputes the tier from cumulative spend.
    RecomputeTier,
}

/// Results from CustomerActions - variants match 1:1 with CustomerAction
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerActionResult {
    /// Point balance afterwards.
    Accrue(u32),
    RevokeAccrual(u32),
    Consume(u32),
    RefundPoints(u32),
    /// Tier afterwards.
    RecomputeTier(MembershipTier),
}

//! Payments and the payment status machine.
//!
//! Cash payments start in `Processing` and settle within the same call. Mobile
//! payments start in `PendingMobile` and wait for a confirmation signal. Both end in
//! `Completed` or `Failed`, after which the record never changes again.
use crate::model::{CustomerId, OrderId, OrderLine};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

entity_id!(
    /// Type-safe identifier for Payments.
    PaymentId,
    "payment"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Mobile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Processing,
    PendingMobile,
    Completed,
    Failed,
}

pub const PAYMENT_TRANSITIONS: &[(PaymentStatus, PaymentStatus)] = &[
    (PaymentStatus::Processing, PaymentStatus::Completed),
    (PaymentStatus::Processing, PaymentStatus::Failed),
    (PaymentStatus::PendingMobile, PaymentStatus::Completed),
    (PaymentStatus::PendingMobile, PaymentStatus::Failed),
];

impl PaymentStatus {
    pub fn initial_for(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => PaymentStatus::Processing,
            PaymentMethod::Mobile => PaymentStatus::PendingMobile,
        }
    }

    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        PAYMENT_TRANSITIONS.contains(&(self, next))
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Failed)
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PaymentStatus::Processing => "Processing",
            PaymentStatus::PendingMobile => "PendingMobile",
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Failed => "Failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    /// Amount charged, after any points discount.
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Order lines as they were when the payment was started.
    pub lines: Vec<OrderLine>,
    pub customer_id: Option<CustomerId>,
    pub customer_info: Option<String>,
    pub points_used: u32,
    pub discount: Decimal,
    pub points_earned: u32,
    /// External reference for Mobile payments.
    pub transaction_ref: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub order_id: OrderId,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub lines: Vec<OrderLine>,
    pub customer_id: Option<CustomerId>,
    pub customer_info: Option<String>,
    pub points_used: u32,
    pub discount: Decimal,
}

//! # Payment Actor
//!
//! Stores payment records. A payment moves from `Processing` or `PendingMobile` to
//! `Completed` or `Failed` exactly once; see
//! [`PAYMENT_TRANSITIONS`](crate::model::payment::PAYMENT_TRANSITIONS).

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::PaymentClient;
use crate::framework::ResourceActor;
use crate::model::Payment;

/// Creates a new Payment actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Payment>, PaymentClient) {
    let (actor, client) = ResourceActor::new(buffer_size);
    (actor, PaymentClient::new(client))
}

//! # Customer Actor
//!
//! Stores loyalty customers: point balance, cumulative spend, order count, tier and
//! redemption history. Point arithmetic (how many points an amount is worth, what a
//! point is worth) lives in [`crate::loyalty::LoyaltyLedger`]; this actor only
//! applies the resulting numbers.
//!
//! ```rust,ignore
//! let (customer_actor, customer_client) = customer_actor::new(32);
//! tokio::spawn(customer_actor.run(TierThresholds::default()));
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::CustomerClient;
use crate::framework::ResourceActor;
use crate::model::Customer;

/// Creates a new Customer actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Customer>, CustomerClient) {
    let (actor, client) = ResourceActor::new(buffer_size);
    (actor, CustomerClient::new(client))
}

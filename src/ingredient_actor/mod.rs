//! # Ingredient Actor
//!
//! Owns every ingredient's quantity on hand. Because the actor processes one message at
//! a time, a check-and-deduct inside a single action (or a single batch) cannot
//! interleave with another order's deduction.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Ingredient`]
//! - [`error`] - [`IngredientError`]
//! - [`actions`] - [`IngredientAction`] and [`IngredientActionResult`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! Higher-level stock operations (aggregation across an order, shortages, restock
//! snapshots) live in [`crate::stock::StockLedger`].

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::IngredientClient;
use crate::framework::ResourceActor;
use crate::model::Ingredient;

/// Creates a new Ingredient actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Ingredient>, IngredientClient) {
    let (actor, client) = ResourceActor::new(buffer_size);
    (actor, IngredientClient::new(client))
}

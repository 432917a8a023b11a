//! # Menu Actor
//!
//! Stores menu items with their prices and recipes. The recipe resolver used by the
//! stock ledger reads from this actor; see [`crate::stock::RecipeResolver`].

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::MenuClient;
use crate::framework::ResourceActor;
use crate::model::MenuItem;

/// Creates a new Menu actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<MenuItem>, MenuClient) {
    let (actor, client) = ResourceActor::new(buffer_size);
    (actor, MenuClient::new(client))
}

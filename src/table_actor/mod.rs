//! # Table Actor
//!
//! Stores dining tables. Table records are administered elsewhere; the order flow only
//! ever flips `status` between `Empty` and `Occupied`.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::TableClient;
use crate::framework::ResourceActor;
use crate::model::Table;

/// Creates a new Table actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Table>, TableClient) {
    let (actor, client) = ResourceActor::new(buffer_size);
    (actor, TableClient::new(client))
}

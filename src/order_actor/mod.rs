//! # Order Actor
//!
//! Stores orders and enforces the order status machine.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`]
//! - [`actions`] - [`OrderAction`] and [`OrderActionResult`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Dependencies
//!
//! Creating an order needs the menu (to snapshot names and prices) and the stock ledger
//! (to refuse orders the kitchen cannot make). Both arrive through [`OrderContext`]
//! when the actor is started:
//!
//! ```rust,ignore
//! let (order_actor, order_client) = order_actor::new(32);
//! tokio::spawn(order_actor.run(OrderContext::new(menu_client.clone(), stock.clone())));
//! ```
//!
//! Payment, table and loyalty side effects are not handled here; the
//! [`TransactionCoordinator`](crate::coordinator::TransactionCoordinator) drives them.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::{MenuClient, OrderClient};
use crate::framework::ResourceActor;
use crate::model::Order;
use crate::stock::StockLedger;

/// Collaborators consulted by [`Order::on_create`](crate::framework::ActorEntity::on_create).
#[derive(Clone)]
pub struct OrderContext {
    pub menu: MenuClient,
    pub stock: StockLedger,
}

impl OrderContext {
    pub fn new(menu: MenuClient, stock: StockLedger) -> Self {
        Self { menu, stock }
    }
}

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderClient) {
    let (actor, client) = ResourceActor::new(buffer_size);
    (actor, OrderClient::new(client))
}

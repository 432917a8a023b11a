//! # Typed Clients
//!
//! One client per store. Each wraps a [`ResourceClient`](crate::framework::ResourceClient),
//! implements [`ActorClient`](crate::framework::ActorClient) for the shared operations,
//! and adds domain methods that translate actions and results into plain values.

pub mod customer_client;
pub mod ingredient_client;
pub mod menu_client;
pub mod order_client;
pub mod payment_client;
pub mod table_client;

pub use customer_client::CustomerClient;
pub use ingredient_client::IngredientClient;
pub use menu_client::MenuClient;
pub use order_client::OrderClient;
pub use payment_client::PaymentClient;
pub use table_client::TableClient;

use crate::framework::FrameworkError;

/// Maps a framework error back to the store's own error type.
///
/// `NotFound` becomes the store's not-found variant, a boxed entity error of the right
/// type is unwrapped, and anything else is reported as a communication failure.
pub(crate) fn recover<E>(e: FrameworkError, not_found: fn(String) -> E) -> E
where
    E: std::error::Error + From<String> + 'static,
{
    match e {
        FrameworkError::NotFound(id) => not_found(id),
        other => other
            .downcast_entity::<E>()
            .unwrap_or_else(|e| E::from(e.to_string())),
    }
}

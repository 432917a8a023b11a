//! The contract a stored type fulfils to live inside a [`ResourceActor`](crate::framework::ResourceActor).
//!
//! Every store in the point-of-sale system (ingredients, menu items, orders, payments,
//! customers, tables) implements [`ActorEntity`]. The associated types tie each store to
//! its own payloads, so an order actor accepts `OrderCreate` and `OrderAction` and
//! nothing else.
//!
//! `on_create` and `on_delete` have no-op defaults; `on_update` and `handle_action`
//! must be written per store.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A record owned by one actor task.
///
/// Hooks are async and receive the actor's `Context`, which is handed over once in
/// `run()`. The order store uses this to consult the menu and stock ledger while an
/// order is being created.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Identifier; the actor mints ids from a `u32` counter starting at 1.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    type Create: Send + Sync + Debug;

    type Update: Send + Sync + Debug;

    /// Store-specific mutations such as `Deduct` or `Complete`.
    type Action: Send + Sync + Debug;

    type ActionResult: Send + Sync + Debug;

    /// Collaborators the hooks need. Stores without any use `()`.
    type Context: Send + Sync;

    /// One enum per store. It crosses the channel boxed inside
    /// [`FrameworkError::EntityError`](crate::framework::FrameworkError::EntityError)
    /// and the typed client gets it back with
    /// [`FrameworkError::downcast_entity`](crate::framework::FrameworkError::downcast_entity).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds the record from its new id and payload; validation that needs no other
    /// store belongs here.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Runs before the new record is stored. Returning an error drops it.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Compared against every other stored record before a create or update is
    /// committed. Returning an error rejects the write, which makes natural keys
    /// (a customer's phone) unique within one message.
    fn check_unique(&self, _other: &Self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Runs before removal. Returning an error keeps the record.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies one [`Action`](Self::Action).
    ///
    /// On error the actor puts back the record as it was before the call, so an
    /// implementation may mutate before it has finished validating.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}

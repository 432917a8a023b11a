//! # Actor Framework
//!
//! The resource-actor runtime every store in the system is built on. It combines a
//! **Resource-Oriented** API (Create / Get / Find / Update / Delete plus custom Actions)
//! with the **Actor Model** (one Tokio task per store, state owned by that task,
//! message passing only).
//!
//! ## Layers
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain state and its business rules
//! 2. **Runtime Layer** ([`ResourceActor`]) - message processing and concurrency
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - type-safe communication
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task and handles one message at a time.
//! - A failed hook never leaves a half-mutated entity behind.
//! - [`ResourceRequest::Batch`] applies several actions as one step, which is how the
//!   ingredient store deducts a whole order's ingredients without partial effects.
//! - Cross-store atomicity is not the framework's job; see
//!   [`crate::coordinator`] for the unit of work built on top of
//!   [`ResourceRequest::Restore`] and inverse actions.
//!
//! ## Context Injection
//!
//! Dependencies are injected at **runtime** via `run(context)`, not at construction time:
//!
//! ```rust,ignore
//! let (menu_actor, menu_client) = menu_actor::new(32);
//! let (order_actor, order_client) = order_actor::new(32);
//!
//! tokio::spawn(menu_actor.run(()));
//! tokio::spawn(order_actor.run(OrderContext { menu: menu_client.clone(), stock }));
//! ```
//!
//! ## Testing
//!
//! See the [`mock`] module for `MockClient`.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Filter, ResourceRequest, Response};

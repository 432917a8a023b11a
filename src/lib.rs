//! # Café POS
//!
//! > **Order, inventory and payment coordination for a café point of sale.**
//!
//! Every store (ingredients, menu, orders, payments, customers, tables) is a
//! resource actor: one Tokio task owning its state, reached through a typed client.
//! Operations that span stores run through the [`TransactionCoordinator`] as units of
//! work that either complete on every store or leave all of them untouched.
//!
//! ## 🏗️ Design
//!
//! ### Stock is never oversold
//! Orders are checked against stock when they are placed and again when they are paid.
//! The deduction itself is a single batch on the ingredient actor, applied
//! all-or-nothing, so two payments racing for the last litre of milk behave as if they
//! had run one after the other.
//!
//! ### Restock gives back what was taken
//! A completed order remembers the exact movements deducted for it. Cancelling it
//! restocks those movements once, even if the recipe has changed in the meantime.
//!
//! ### Errors keep their type across the channel
//! Each actor has its own `thiserror` enum, boxed across the channel and recovered by
//! the typed client. [`PosError`](error::PosError) folds them into the categories
//! callers act on.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic [`ResourceActor`](framework::ResourceActor) and the
//! [`ActorEntity`](framework::ActorEntity) contract every store implements.
//!
//! ### 2. The Stores ([`ingredient_actor`], [`menu_actor`], [`order_actor`],
//! [`payment_actor`], [`customer_actor`], [`table_actor`])
//! Entity rules, actions and error types. Plain data lives in [`model`].
//!
//! ### 3. The Interface ([`clients`])
//! Typed wrappers over `ResourceClient` with domain methods.
//!
//! ### 4. The Services ([`stock`], [`loyalty`], [`coordinator`])
//! Aggregated stock checks and movements, point arithmetic, and the units of work.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! [`PosSystem`](lifecycle::PosSystem) starts and wires everything and shuts it down.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```
//!
//! [`TransactionCoordinator`]: coordinator::TransactionCoordinator

pub mod clients;
pub mod config;
pub mod coordinator;
pub mod customer_actor;
pub mod error;
pub mod framework;
pub mod ingredient_actor;
pub mod lifecycle;
pub mod loyalty;
pub mod menu_actor;
pub mod model;
pub mod order_actor;
pub mod payment_actor;
pub mod stock;
pub mod table_actor;

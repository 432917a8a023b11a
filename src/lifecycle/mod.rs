//! # System Lifecycle
//!
//! Starting, wiring and stopping the store actors.
//!
//! ## Wiring
//!
//! Actors are created without dependencies and receive them through `run(context)`:
//!
//! | Actor | Context |
//! |-------|---------|
//! | Ingredient, Menu, Payment, Table | `()` |
//! | Order | [`OrderContext`](crate::order_actor::OrderContext): menu client + stock ledger |
//! | Customer | [`TierThresholds`](crate::model::TierThresholds) |
//!
//! The dependency graph is acyclic (orders read the menu and ingredients, nothing reads
//! orders from inside an actor), so dropping every client shuts the system down.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - closes the sender side of channels
//! 2. **Actors detect closure** - `receiver.recv()` returns `None`
//! 3. **Actors log their final size and exit**
//! 4. **Await completion** - [`PosSystem::shutdown`] joins every actor task

pub mod pos_system;
pub mod tracing;

pub use pos_system::PosSystem;

//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a `tracing-subscriber` fmt layer filtered by `RUST_LOG`.
//! The output is compact and hides the module path (`with_target(false)`); actor logs
//! carry an `entity_type` field instead.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: startup and shutdown with the final store size
//! - **Store operations**: Create, Get, Find, Update, Delete, Action, Batch, Restore
//! - **Units of work**: one span per coordinator operation; failures, rollbacks and
//!   failed compensations are logged at `warn` / `error`
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run
//!
//! # Full request payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the coordinator
//! RUST_LOG=cafe_pos::coordinator=debug cargo run
//! ```
//!
//! ## Cash Payment Trace
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Created entity_type="Payment" id=payment_1 size=1
//! INFO Batch ok entity_type="Ingredient" count=2
//! INFO pay_cash{order=order_1}:deduct{lines=1}: Stock deducted ingredients=2
//! INFO Action ok entity_type="Order" id=order_1
//! INFO Action ok entity_type="Table" id=table_1
//! INFO pay_cash{order=order_1}: Payment completed payment=payment_1 order=order_1 amount=45000 points_earned=0
//! ```
//!
//! Actors run in their own tasks, so their lines carry no caller span.
//!
//! A shortage found at deduction time shows up as `Batch rolled back` on the
//! ingredient actor followed by `Unit of work failed` and `Unit of work rolled back`
//! from the coordinator.

/// Initialises the global subscriber. Call once, at the start of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

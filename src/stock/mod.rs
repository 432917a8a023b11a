//! # Stock
//!
//! Recipe resolution, availability checking and the stock ledger.
//!
//! - [`RecipeResolver`] - menu item to per-unit ingredient quantities
//! - [`Requirements`] - per-ingredient totals for a list of order lines
//! - [`StockLedger`] - check / deduct / restock / manual adjustments and stock reports

pub mod ledger;
pub mod recipe;
pub mod requirement;

pub use ledger::{Availability, StockLedger};
pub use recipe::RecipeResolver;
pub use requirement::{Requirement, Requirements, Shortage};

use crate::ingredient_actor::IngredientError;
use crate::menu_actor::MenuError;
use thiserror::Error;

/// Errors raised by stock ledger operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StockError {
    #[error("Insufficient stock: {}", describe(.0))]
    InsufficientStock(Vec<Shortage>),

    #[error("Invalid order line: {0}")]
    InvalidLine(String),

    #[error(transparent)]
    Ingredient(#[from] IngredientError),

    #[error(transparent)]
    Menu(#[from] MenuError),
}

fn describe(shortages: &[Shortage]) -> String {
    shortages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

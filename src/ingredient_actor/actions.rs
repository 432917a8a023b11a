//! Stock actions for the Ingredient actor.
//!
//! Every change to an ingredient's quantity is one of these actions. The ledger
//! sends several of them in a single batch when an order spans more than one
//! ingredient, so an order is either charged in full or not at all.

use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub enum IngredientAction {
    /// Reads the quantity on hand.
    CheckStock,
    /// Takes a positive quantity out of stock.
    ///
    /// # Errors
    /// Fails if the quantity on hand is smaller than requested.
    Deduct(Decimal),
    /// Puts a positive quantity back.
    Restock(Decimal),
    /// Signed manual correction (delivery, write-off), optionally replacing the
    /// expiration date.
    Adjust {
        delta: Decimal,
        expiration_date: Option<NaiveDate>,
    },
}

/// Results from IngredientActions - variants match 1:1 with IngredientAction.
/// Each carries the quantity on hand after the action.
#[derive(Debug, Clone, PartialEq)]
pub enum IngredientActionResult {
    CheckStock(Decimal),
    Deduct(Decimal),
    Restock(Decimal),
    Adjust(Decimal),
}

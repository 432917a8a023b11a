//! Raw stock item consumed by recipes.
//!
//! # Actor Framework
//! Managed by a [`ResourceActor`](crate::framework::ResourceActor); see
//! [`crate::ingredient_actor`] for the stock actions. Quantities only change through
//! those actions so that the non-negativity rule is enforced in one place.
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

entity_id!(
    /// Type-safe identifier for Ingredients.
    IngredientId,
    "ingredient"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    /// Unit of measure the quantities are expressed in (kg, L, pcs...).
    pub unit: String,
    pub quantity: Decimal,
    pub minimum_threshold: Decimal,
    pub expiration_date: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum_threshold
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date.is_some_and(|date| date < today)
    }

    /// True when the expiration date falls in `[today, today + days]`.
    pub fn expires_within(&self, today: NaiveDate, days: u32) -> bool {
        let horizon = today + Duration::days(i64::from(days));
        self.expiration_date
            .is_some_and(|date| date >= today && date <= horizon)
    }
}

/// Payload for registering a new ingredient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub minimum_threshold: Decimal,
    pub expiration_date: Option<NaiveDate>,
}

/// Descriptive fields only. Quantity changes go through the stock ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub minimum_threshold: Option<Decimal>,
}

/// One aggregated ingredient quantity moved out of (or back into) stock.
///
/// A completed order keeps the list of movements it was charged so that a later
/// cancellation restocks exactly that, whatever the recipe says by then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub ingredient_id: IngredientId,
    pub quantity: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(expiration_date: Option<NaiveDate>) -> Ingredient {
        Ingredient {
            id: IngredientId(1),
            name: "Milk".to_string(),
            unit: "L".to_string(),
            quantity: Decimal::new(5, 0),
            minimum_threshold: Decimal::new(5, 0),
            expiration_date,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_expiry_windows() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let in_three = ingredient(NaiveDate::from_ymd_opt(2024, 3, 13));
        let yesterday = ingredient(NaiveDate::from_ymd_opt(2024, 3, 9));

        assert!(in_three.expires_within(today, 3));
        assert!(!in_three.expires_within(today, 2));
        assert!(!in_three.is_expired(today));
        assert!(yesterday.is_expired(today));
        assert!(!yesterday.expires_within(today, 30));
        assert!(!ingredient(None).is_expired(today));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(ingredient(None).is_low_stock());
    }
}

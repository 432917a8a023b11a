//! [`ActorEntity`] implementation for [`Ingredient`].
//!
//! Holds the non-negativity rule: no action may leave `quantity` below zero.

use super::actions::{IngredientAction, IngredientActionResult};
use super::error::IngredientError;
use crate::framework::ActorEntity;
use crate::model::{Ingredient, IngredientCreate, IngredientId, IngredientUpdate};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

#[async_trait]
impl ActorEntity for Ingredient {
    type Id = IngredientId;
    type Create = IngredientCreate;
    type Update = IngredientUpdate;
    type Action = IngredientAction;
    type ActionResult = IngredientActionResult;
    type Context = ();
    type Error = IngredientError;

    fn from_create_params(id: IngredientId, params: IngredientCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(IngredientError::ValidationError(
                "name must not be empty".to_string(),
            ));
        }
        if params.quantity < Decimal::ZERO || params.minimum_threshold < Decimal::ZERO {
            return Err(IngredientError::InvalidQuantity(format!(
                "quantity {} and threshold {} must not be negative",
                params.quantity, params.minimum_threshold
            )));
        }
        Ok(Self {
            id,
            name: params.name,
            unit: params.unit,
            quantity: params.quantity,
            minimum_threshold: params.minimum_threshold,
            expiration_date: params.expiration_date,
            updated_at: Utc::now(),
        })
    }

    async fn on_update(&mut self, update: IngredientUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(unit) = update.unit {
            self.unit = unit;
        }
        if let Some(threshold) = update.minimum_threshold {
            if threshold < Decimal::ZERO {
                return Err(IngredientError::InvalidQuantity(format!(
                    "threshold {threshold} must not be negative"
                )));
            }
            self.minimum_threshold = threshold;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: IngredientAction,
        _ctx: &(),
    ) -> Result<IngredientActionResult, Self::Error> {
        match action {
            IngredientAction::CheckStock => Ok(IngredientActionResult::CheckStock(self.quantity)),
            IngredientAction::Deduct(amount) => {
                require_positive(amount)?;
                self.apply_delta(-amount)?;
                Ok(IngredientActionResult::Deduct(self.quantity))
            }
            IngredientAction::Restock(amount) => {
                require_positive(amount)?;
                self.apply_delta(amount)?;
                Ok(IngredientActionResult::Restock(self.quantity))
            }
            IngredientAction::Adjust {
                delta,
                expiration_date,
            } => {
                if delta.is_zero() && expiration_date.is_none() {
                    return Err(IngredientError::InvalidQuantity(
                        "adjustment changes nothing".to_string(),
                    ));
                }
                self.apply_delta(delta)?;
                if expiration_date.is_some() {
                    self.expiration_date = expiration_date;
                }
                Ok(IngredientActionResult::Adjust(self.quantity))
            }
        }
    }
}

impl Ingredient {
    fn apply_delta(&mut self, delta: Decimal) -> Result<(), IngredientError> {
        let next = self.quantity + delta;
        if next < Decimal::ZERO {
            return Err(IngredientError::InsufficientStock {
                ingredient: self.id.clone(),
                required: -delta,
                available: self.quantity,
            });
        }
        self.quantity = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn require_positive(amount: Decimal) -> Result<(), IngredientError> {
    if amount <= Decimal::ZERO {
        return Err(IngredientError::InvalidQuantity(format!(
            "{amount} must be positive"
        )));
    }
    Ok(())
}

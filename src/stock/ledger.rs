//! The stock ledger: every quantity change an order causes goes through here.

use super::recipe::RecipeResolver;
use super::requirement::{Requirements, Shortage};
use super::StockError;
use crate::clients::IngredientClient;
use crate::framework::ActorClient;
use crate::ingredient_actor::{IngredientAction, IngredientError};
use crate::model::{Ingredient, IngredientId, MenuItemId, OrderLine, RecipeLine, StockMovement};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Outcome of an availability check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Availability {
    pub shortages: Vec<Shortage>,
}

impl Availability {
    pub fn is_available(&self) -> bool {
        self.shortages.is_empty()
    }

    pub fn into_result(self) -> Result<(), StockError> {
        if self.shortages.is_empty() {
            Ok(())
        } else {
            Err(StockError::InsufficientStock(self.shortages))
        }
    }
}

/// Check, deduct and restock ingredients on behalf of orders.
///
/// Deduction is a single batch on the ingredient actor, so it either takes every
/// ingredient an order needs or nothing. Restock takes the movements returned by
/// [`StockLedger::deduct`], not a recipe, so it always returns exactly what was taken.
#[derive(Clone)]
pub struct StockLedger {
    ingredients: IngredientClient,
    recipes: Arc<dyn RecipeResolver>,
}

impl StockLedger {
    pub fn new(ingredients: IngredientClient, recipes: Arc<dyn RecipeResolver>) -> Self {
        Self {
            ingredients,
            recipes,
        }
    }

    pub fn ingredients(&self) -> &IngredientClient {
        &self.ingredients
    }

    async fn requirements(&self, lines: &[OrderLine]) -> Result<Requirements, StockError> {
        let mut recipes: HashMap<MenuItemId, Vec<RecipeLine>> = HashMap::new();
        let mut requirements = Requirements::default();
        for line in lines {
            if line.quantity == 0 {
                return Err(StockError::InvalidLine(format!(
                    "{} has zero quantity",
                    line.menu_item_id
                )));
            }
            if !recipes.contains_key(&line.menu_item_id) {
                let recipe = self.recipes.resolve(&line.menu_item_id).await?;
                recipes.insert(line.menu_item_id.clone(), recipe);
            }
            if let Some(recipe) = recipes.get(&line.menu_item_id) {
                requirements.add(&line.menu_item_id, line.quantity, recipe);
            }
        }
        Ok(requirements)
    }

    async fn on_hand(
        &self,
        ids: Vec<IngredientId>,
    ) -> Result<HashMap<IngredientId, Ingredient>, StockError> {
        let found: HashMap<IngredientId, Ingredient> = self
            .ingredients
            .find_by_ids(ids.clone())
            .await?
            .into_iter()
            .map(|ingredient| (ingredient.id.clone(), ingredient))
            .collect();
        if let Some(missing) = ids.iter().find(|id| !found.contains_key(*id)) {
            return Err(IngredientError::NotFound(missing.to_string()).into());
        }
        Ok(found)
    }

    /// Validates a whole line list against current stock, aggregating per ingredient.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn check_availability(&self, lines: &[OrderLine]) -> Result<Availability, StockError> {
        let requirements = self.requirements(lines).await?;
        if requirements.is_empty() {
            return Ok(Availability::default());
        }
        let on_hand = self.on_hand(requirements.ingredient_ids()).await?;
        let shortages = requirements.shortages(&on_hand);
        debug!(shortages = shortages.len(), "Availability checked");
        Ok(Availability { shortages })
    }

    /// Like [`check_availability`](Self::check_availability) but fails on any shortage.
    pub async fn ensure_available(&self, lines: &[OrderLine]) -> Result<(), StockError> {
        self.check_availability(lines).await?.into_result()
    }

    /// Takes every ingredient the lines need out of stock, or nothing at all.
    ///
    /// Returns the movements that were applied; keep them for [`restock`](Self::restock).
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn deduct(&self, lines: &[OrderLine]) -> Result<Vec<StockMovement>, StockError> {
        let requirements = self.requirements(lines).await?;
        let movements = requirements.movements();
        if movements.is_empty() {
            return Ok(movements);
        }

        let actions = movements
            .iter()
            .map(|m| (m.ingredient_id.clone(), IngredientAction::Deduct(m.quantity)))
            .collect();
        match self.ingredients.apply_batch(actions).await {
            Ok(_) => {
                info!(ingredients = movements.len(), "Stock deducted");
                Ok(movements)
            }
            Err(IngredientError::InsufficientStock {
                ingredient,
                required,
                available,
            }) => {
                warn!(%ingredient, %available, "Deduction refused");
                let described = match self.ingredients.get(ingredient.clone()).await {
                    Ok(Some(current)) => requirements.shortage_for(&Ingredient {
                        quantity: available,
                        ..current
                    }),
                    _ => None,
                };
                let shortage = described.unwrap_or_else(|| Shortage {
                    ingredient_id: ingredient.clone(),
                    ingredient_name: ingredient.to_string(),
                    unit: String::new(),
                    menu_items: requirements
                        .get(&ingredient)
                        .map(|r| r.menu_items.clone())
                        .unwrap_or_default(),
                    required,
                    available,
                });
                Err(StockError::InsufficientStock(vec![shortage]))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Puts back exactly the movements returned by an earlier [`deduct`](Self::deduct).
    #[instrument(skip(self, movements), fields(ingredients = movements.len()))]
    pub async fn restock(&self, movements: &[StockMovement]) -> Result<(), StockError> {
        if movements.is_empty() {
            return Ok(());
        }
        let actions = movements
            .iter()
            .map(|m| (m.ingredient_id.clone(), IngredientAction::Restock(m.quantity)))
            .collect();
        self.ingredients.apply_batch(actions).await?;
        info!("Stock restocked");
        Ok(())
    }

    /// Manual correction: deliveries (positive), waste or write-offs (negative).
    ///
    /// Returns the new quantity on hand.
    #[instrument(skip(self))]
    pub async fn add_stock(
        &self,
        ingredient: IngredientId,
        delta: Decimal,
        expiration_date: Option<NaiveDate>,
    ) -> Result<Decimal, StockError> {
        match self
            .ingredients
            .adjust(ingredient.clone(), delta, expiration_date)
            .await
        {
            Ok(quantity) => Ok(quantity),
            Err(IngredientError::InsufficientStock {
                required,
                available,
                ..
            }) => {
                let current = self.ingredients.require(ingredient.clone()).await?;
                Err(StockError::InsufficientStock(vec![Shortage {
                    ingredient_id: ingredient,
                    ingredient_name: current.name,
                    unit: current.unit,
                    menu_items: Vec::new(),
                    required,
                    available,
                }]))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Ingredients at or below their minimum threshold.
    pub async fn low_stock(&self) -> Result<Vec<Ingredient>, StockError> {
        self.list(|ingredient| ingredient.is_low_stock()).await
    }

    /// Ingredients whose expiration date falls within the next `days` days.
    pub async fn expiring_within(&self, days: u32) -> Result<Vec<Ingredient>, StockError> {
        let today = Utc::now().date_naive();
        self.list(move |ingredient| ingredient.expires_within(today, days))
            .await
    }

    /// Ingredients already past their expiration date.
    pub async fn expired(&self) -> Result<Vec<Ingredient>, StockError> {
        let today = Utc::now().date_naive();
        self.list(move |ingredient| ingredient.is_expired(today))
            .await
    }

    async fn list(
        &self,
        predicate: impl Fn(&Ingredient) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<Ingredient>, StockError> {
        let mut found = self.ingredients.find(predicate).await?;
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }
}

//! Aggregation of recipe requirements across an order.
//!
//! Two lines that both use milk must be compared against the milk on hand as one
//! total, never line by line. [`Requirements`] sums every line's recipe per ingredient
//! and remembers which menu items contributed, so a shortage can name them.

use crate::model::{Ingredient, IngredientId, MenuItemId, RecipeLine, StockMovement};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

/// Total quantity of one ingredient needed by an order.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub ingredient_id: IngredientId,
    pub quantity: Decimal,
    pub menu_items: Vec<MenuItemId>,
}

/// One ingredient the order cannot be served from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortage {
    pub ingredient_id: IngredientId,
    pub ingredient_name: String,
    pub unit: String,
    /// Menu items on the order that consume this ingredient.
    pub menu_items: Vec<MenuItemId>,
    pub required: Decimal,
    pub available: Decimal,
}

impl Display for Shortage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) needs {} {}, {} on hand",
            self.ingredient_name, self.ingredient_id, self.required, self.unit, self.available
        )?;
        if !self.menu_items.is_empty() {
            let items: Vec<String> = self.menu_items.iter().map(ToString::to_string).collect();
            write!(f, " for {}", items.join(", "))?;
        }
        Ok(())
    }
}

/// Per-ingredient totals, ordered by ingredient id.
#[derive(Debug, Clone, Default)]
pub struct Requirements {
    by_ingredient: BTreeMap<IngredientId, Requirement>,
}

impl Requirements {
    /// Adds `units` portions of `menu_item`'s recipe.
    pub fn add(&mut self, menu_item: &MenuItemId, units: u32, recipe: &[RecipeLine]) {
        for line in recipe {
            let entry = self
                .by_ingredient
                .entry(line.ingredient_id.clone())
                .or_insert_with(|| Requirement {
                    ingredient_id: line.ingredient_id.clone(),
                    quantity: Decimal::ZERO,
                    menu_items: Vec::new(),
                });
            entry.quantity += line.quantity * Decimal::from(units);
            if !entry.menu_items.contains(menu_item) {
                entry.menu_items.push(menu_item.clone());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_ingredient.is_empty()
    }

    pub fn get(&self, ingredient: &IngredientId) -> Option<&Requirement> {
        self.by_ingredient.get(ingredient)
    }

    pub fn ingredient_ids(&self) -> Vec<IngredientId> {
        self.by_ingredient.keys().cloned().collect()
    }

    /// Compares every total against `on_hand`. Ingredients missing from `on_hand`
    /// are the caller's problem and are skipped here.
    pub fn shortages(&self, on_hand: &HashMap<IngredientId, Ingredient>) -> Vec<Shortage> {
        self.by_ingredient
            .values()
            .filter_map(|requirement| {
                let ingredient = on_hand.get(&requirement.ingredient_id)?;
                (ingredient.quantity < requirement.quantity)
                    .then(|| self.shortage(requirement, ingredient))
            })
            .collect()
    }

    /// Describes `ingredient` as a shortage against this order's requirement for it.
    pub fn shortage_for(&self, ingredient: &Ingredient) -> Option<Shortage> {
        self.get(&ingredient.id)
            .map(|requirement| self.shortage(requirement, ingredient))
    }

    fn shortage(&self, requirement: &Requirement, ingredient: &Ingredient) -> Shortage {
        Shortage {
            ingredient_id: requirement.ingredient_id.clone(),
            ingredient_name: ingredient.name.clone(),
            unit: ingredient.unit.clone(),
            menu_items: requirement.menu_items.clone(),
            required: requirement.quantity,
            available: ingredient.quantity,
        }
    }

    /// The deduction this order amounts to, one movement per ingredient.
    pub fn movements(&self) -> Vec<StockMovement> {
        self.by_ingredient
            .values()
            .map(|requirement| StockMovement {
                ingredient_id: requirement.ingredient_id.clone(),
                quantity: requirement.quantity,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stock(id: u32, name: &str, quantity: Decimal) -> Ingredient {
        Ingredient {
            id: IngredientId(id),
            name: name.to_string(),
            unit: "ml".to_string(),
            quantity,
            minimum_threshold: Decimal::ZERO,
            expiration_date: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_lines_sharing_an_ingredient_are_summed() {
        let milk = IngredientId(1);
        let recipe = vec![RecipeLine::new(milk.clone(), Decimal::from(60))];

        let mut requirements = Requirements::default();
        requirements.add(&MenuItemId(1), 1, &recipe);
        requirements.add(&MenuItemId(2), 1, &recipe);

        let on_hand = HashMap::from([(milk.clone(), stock(1, "Milk", Decimal::from(100)))]);
        let shortages = requirements.shortages(&on_hand);

        assert_eq!(shortages.len(), 1);
        assert_eq!(shortages[0].required, Decimal::from(120));
        assert_eq!(shortages[0].available, Decimal::from(100));
        assert_eq!(shortages[0].menu_items, vec![MenuItemId(1), MenuItemId(2)]);
    }

    #[test]
    fn test_units_multiply_recipe_quantities() {
        let beans = IngredientId(1);
        let milk = IngredientId(2);
        let cappuccino = vec![
            RecipeLine::new(beans.clone(), Decimal::new(2, 2)),
            RecipeLine::new(milk.clone(), Decimal::new(1, 1)),
        ];

        let mut requirements = Requirements::default();
        requirements.add(&MenuItemId(1), 2, &cappuccino);

        assert_eq!(
            requirements.movements(),
            vec![
                StockMovement {
                    ingredient_id: beans,
                    quantity: Decimal::new(4, 2)
                },
                StockMovement {
                    ingredient_id: milk,
                    quantity: Decimal::new(2, 1)
                },
            ]
        );
    }

    #[test]
    fn test_exact_stock_is_enough() {
        let milk = IngredientId(1);
        let mut requirements = Requirements::default();
        requirements.add(
            &MenuItemId(1),
            2,
            &[RecipeLine::new(milk.clone(), Decimal::from(50))],
        );
        let on_hand = HashMap::from([(milk, stock(1, "Milk", Decimal::from(100)))]);
        assert!(requirements.shortages(&on_hand).is_empty());
    }

    #[test]
    fn test_items_without_recipe_need_nothing() {
        let mut requirements = Requirements::default();
        requirements.add(&MenuItemId(9), 3, &[]);
        assert!(requirements.is_empty());
        assert!(requirements.movements().is_empty());
    }
}

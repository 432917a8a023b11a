//! Sellable menu item and the recipe it consumes.
use crate::model::IngredientId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

entity_id!(
    /// Type-safe identifier for Menu Items.
    MenuItemId,
    "menu_item"
);

/// Quantity of one ingredient consumed per unit of a menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeLine {
    pub ingredient_id: IngredientId,
    pub quantity: Decimal,
}

impl RecipeLine {
    pub fn new(ingredient_id: IngredientId, quantity: Decimal) -> Self {
        Self {
            ingredient_id,
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub available: bool,
    /// Empty for items that consume no tracked stock.
    pub recipe: Vec<RecipeLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub available: bool,
    pub recipe: Vec<RecipeLine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub available: Option<bool>,
    pub recipe: Option<Vec<RecipeLine>>,
}

//! [`ActorEntity`] implementation for [`MenuItem`].
//!
//! Validation here keeps the recipe well formed: positive quantities and each
//! ingredient at most once per item.

use super::actions::{MenuItemAction, MenuItemActionResult};
use super::error::MenuError;
use crate::framework::ActorEntity;
use crate::model::{MenuItem, MenuItemCreate, MenuItemId, MenuItemUpdate, RecipeLine};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashSet;

#[async_trait]
impl ActorEntity for MenuItem {
    type Id = MenuItemId;
    type Create = MenuItemCreate;
    type Update = MenuItemUpdate;
    type Action = MenuItemAction;
    type ActionResult = MenuItemActionResult;
    type Context = ();
    type Error = MenuError;

    fn from_create_params(id: MenuItemId, params: MenuItemCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(MenuError::ValidationError("name must not be empty".into()));
        }
        validate_price(params.price)?;
        validate_recipe(&params.recipe)?;
        Ok(Self {
            id,
            name: params.name,
            category: params.category,
            price: params.price,
            available: params.available,
            recipe: params.recipe,
        })
    }

    async fn on_update(&mut self, update: MenuItemUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(price) = update.price {
            validate_price(price)?;
            self.price = price;
        }
        if let Some(available) = update.available {
            self.available = available;
        }
        if let Some(recipe) = update.recipe {
            validate_recipe(&recipe)?;
            self.recipe = recipe;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: MenuItemAction,
        _ctx: &(),
    ) -> Result<MenuItemActionResult, Self::Error> {
        match action {
            MenuItemAction::SetAvailability(available) => {
                let previous = std::mem::replace(&mut self.available, available);
                Ok(MenuItemActionResult::SetAvailability(previous))
            }
        }
    }
}

fn validate_price(price: Decimal) -> Result<(), MenuError> {
    if price <= Decimal::ZERO {
        return Err(MenuError::ValidationError(format!(
            "price {price} must be positive"
        )));
    }
    Ok(())
}

fn validate_recipe(recipe: &[RecipeLine]) -> Result<(), MenuError> {
    let mut seen = HashSet::new();
    for line in recipe {
        if line.quantity <= Decimal::ZERO {
            return Err(MenuError::ValidationError(format!(
                "recipe quantity for {} must be positive",
                line.ingredient_id
            )));
        }
        if !seen.insert(&line.ingredient_id) {
            return Err(MenuError::ValidationError(format!(
                "{} appears more than once in the recipe",
                line.ingredient_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IngredientId;

    fn latte(recipe: Vec<RecipeLine>) -> MenuItemCreate {
        MenuItemCreate {
            name: "Latte".to_string(),
            category: "Coffee".to_string(),
            price: Decimal::from(45_000),
            available: true,
            recipe,
        }
    }

    #[test]
    fn test_duplicate_ingredient_rejected() {
        let recipe = vec![
            RecipeLine::new(IngredientId(1), Decimal::new(2, 2)),
            RecipeLine::new(IngredientId(1), Decimal::new(1, 2)),
        ];
        assert!(matches!(
            MenuItem::from_create_params(MenuItemId(1), latte(recipe)),
            Err(MenuError::ValidationError(_))
        ));
    }

    #[test]
    fn test_empty_recipe_is_valid() {
        let item = MenuItem::from_create_params(MenuItemId(1), latte(vec![])).unwrap();
        assert!(item.recipe.is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_price_update_rejected() {
        let mut item = MenuItem::from_create_params(MenuItemId(1), latte(vec![])).unwrap();
        let update = MenuItemUpdate {
            price: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(item.on_update(update, &()).await.is_err());
    }
}

//! Recipe resolution seam between the menu store and the stock ledger.

use crate::clients::MenuClient;
use crate::menu_actor::MenuError;
use crate::model::{MenuItemId, RecipeLine};
use async_trait::async_trait;

/// Maps a menu item to the ingredients one unit of it consumes.
///
/// An empty recipe is valid and means the item never runs out.
#[async_trait]
pub trait RecipeResolver: Send + Sync {
    async fn resolve(&self, menu_item: &MenuItemId) -> Result<Vec<RecipeLine>, MenuError>;
}

#[async_trait]
impl RecipeResolver for MenuClient {
    async fn resolve(&self, menu_item: &MenuItemId) -> Result<Vec<RecipeLine>, MenuError> {
        Ok(self.require(menu_item.clone()).await?.recipe)
    }
}

//! # Menu Client
use crate::clients::recover;
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::menu_actor::{MenuError, MenuItemAction, MenuItemActionResult};
use crate::model::{MenuItem, MenuItemCreate, MenuItemId, MenuItemUpdate};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Menu actor.
#[derive(Clone)]
pub struct MenuClient {
    inner: ResourceClient<MenuItem>,
}

impl MenuClient {
    pub fn new(inner: ResourceClient<MenuItem>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<MenuItem> for MenuClient {
    type Error = MenuError;

    fn inner(&self) -> &ResourceClient<MenuItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        recover(e, MenuError::NotFound)
    }
}

impl MenuClient {
    #[instrument(skip(self))]
    pub async fn create_menu_item(&self, params: MenuItemCreate) -> Result<MenuItemId, MenuError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn require(&self, id: MenuItemId) -> Result<MenuItem, MenuError> {
        self.get(id.clone())
            .await?
            .ok_or_else(|| MenuError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_menu_item(
        &self,
        id: MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, MenuError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Returns the previous availability.
    #[instrument(skip(self))]
    pub async fn set_availability(&self, id: MenuItemId, available: bool) -> Result<bool, MenuError> {
        match self
            .inner
            .perform_action(id, MenuItemAction::SetAvailability(available))
            .await
            .map_err(Self::map_error)?
        {
            MenuItemActionResult::SetAvailability(previous) => Ok(previous),
        }
    }

    /// Items currently offered, ordered by id.
    #[instrument(skip(self))]
    pub async fn available_items(&self) -> Result<Vec<MenuItem>, MenuError> {
        let mut items = self
            .inner
            .find(|item: &MenuItem| item.available)
            .await
            .map_err(Self::map_error)?;
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }
}

//! # Ingredient Client
//!
//! High-level API for the Ingredient actor. Most callers go through
//! [`StockLedger`](crate::stock::StockLedger) instead of using this directly.
use crate::clients::recover;
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::ingredient_actor::{IngredientAction, IngredientActionResult, IngredientError};
use crate::model::{Ingredient, IngredientCreate, IngredientId, IngredientUpdate};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

/// Client for interacting with the Ingredient actor.
#[derive(Clone)]
pub struct IngredientClient {
    inner: ResourceClient<Ingredient>,
}

impl IngredientClient {
    pub fn new(inner: ResourceClient<Ingredient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Ingredient> for IngredientClient {
    type Error = IngredientError;

    fn inner(&self) -> &ResourceClient<Ingredient> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        recover(e, IngredientError::NotFound)
    }
}

fn unexpected(result: IngredientActionResult) -> IngredientError {
    IngredientError::ActorCommunicationError(format!("unexpected action result {result:?}"))
}

impl IngredientClient {
    #[instrument(skip(self))]
    pub async fn create_ingredient(
        &self,
        params: IngredientCreate,
    ) -> Result<IngredientId, IngredientError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Like `get`, but a missing ingredient is an error.
    #[instrument(skip(self))]
    pub async fn require(&self, id: IngredientId) -> Result<Ingredient, IngredientError> {
        self.get(id.clone())
            .await?
            .ok_or_else(|| IngredientError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_ingredient(
        &self,
        id: IngredientId,
        update: IngredientUpdate,
    ) -> Result<Ingredient, IngredientError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Fetches the listed ingredients in one round trip. Unknown ids are simply absent.
    #[instrument(skip(self))]
    pub async fn find_by_ids(
        &self,
        ids: Vec<IngredientId>,
    ) -> Result<Vec<Ingredient>, IngredientError> {
        self.find(move |ingredient| ids.contains(&ingredient.id))
            .await
    }

    pub async fn find(
        &self,
        predicate: impl Fn(&Ingredient) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<Ingredient>, IngredientError> {
        self.inner.find(predicate).await.map_err(Self::map_error)
    }

    /// Current quantity on hand.
    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: IngredientId) -> Result<Decimal, IngredientError> {
        debug!(%id, "Checking stock");
        match self
            .inner
            .perform_action(id, IngredientAction::CheckStock)
            .await
            .map_err(Self::map_error)?
        {
            IngredientActionResult::CheckStock(quantity) => Ok(quantity),
            other => Err(unexpected(other)),
        }
    }

    /// Signed adjustment; returns the new quantity.
    #[instrument(skip(self))]
    pub async fn adjust(
        &self,
        id: IngredientId,
        delta: Decimal,
        expiration_date: Option<NaiveDate>,
    ) -> Result<Decimal, IngredientError> {
        let action = IngredientAction::Adjust {
            delta,
            expiration_date,
        };
        match self
            .inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)?
        {
            IngredientActionResult::Adjust(quantity) => Ok(quantity),
            other => Err(unexpected(other)),
        }
    }

    /// Applies all actions atomically on the ingredient actor.
    #[instrument(skip(self, actions), fields(count = actions.len()))]
    pub async fn apply_batch(
        &self,
        actions: Vec<(IngredientId, IngredientAction)>,
    ) -> Result<Vec<IngredientActionResult>, IngredientError> {
        debug!("Sending batch");
        self.inner
            .perform_batch(actions)
            .await
            .map_err(Self::map_error)
    }
}

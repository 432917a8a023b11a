//! Common interface for the typed store clients (`OrderClient`, `IngredientClient`, ...),
//! adding default `get`, `delete` and `restore` methods built on top of a generic
//! `ResourceClient`.
use super::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit standard operations.
///
/// Implementors only provide access to the inner client and a mapping from
/// [`FrameworkError`] to their own error type.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    type Error: From<String> + Send + Sync;

    fn inner(&self) -> &ResourceClient<T>;

    /// Turns plumbing failures into the store's own error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// `None` when the id is unknown.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }

    /// Put a previously captured entity state back in place.
    #[tracing::instrument(skip(self, snapshot))]
    async fn restore(&self, id: T::Id, snapshot: T) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().restore(id, snapshot).await.map_err(Self::map_error)
    }
}

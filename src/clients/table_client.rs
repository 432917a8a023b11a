//! # Table Client
use crate::clients::recover;
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{Table, TableCreate, TableId, TableStatus, TableUpdate};
use crate::table_actor::{TableAction, TableActionResult, TableError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Table actor.
#[derive(Clone)]
pub struct TableClient {
    inner: ResourceClient<Table>,
}

impl TableClient {
    pub fn new(inner: ResourceClient<Table>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Table> for TableClient {
    type Error = TableError;

    fn inner(&self) -> &ResourceClient<Table> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        recover(e, TableError::NotFound)
    }
}

impl TableClient {
    #[instrument(skip(self))]
    pub async fn create_table(&self, params: TableCreate) -> Result<TableId, TableError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn require(&self, id: TableId) -> Result<Table, TableError> {
        self.get(id.clone())
            .await?
            .ok_or_else(|| TableError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_table(&self, id: TableId, update: TableUpdate) -> Result<Table, TableError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Returns the status the table had before.
    #[instrument(skip(self))]
    pub async fn occupy(&self, id: TableId) -> Result<TableStatus, TableError> {
        match self
            .inner
            .perform_action(id, TableAction::Occupy)
            .await
            .map_err(Self::map_error)?
        {
            TableActionResult::Occupy(previous) => Ok(previous),
            other => Err(TableError::ActorCommunicationError(format!(
                "unexpected action result {other:?}"
            ))),
        }
    }

    /// Returns the status the table had before.
    #[instrument(skip(self))]
    pub async fn release(&self, id: TableId) -> Result<TableStatus, TableError> {
        match self
            .inner
            .perform_action(id, TableAction::Release)
            .await
            .map_err(Self::map_error)?
        {
            TableActionResult::Release(previous) => Ok(previous),
            other => Err(TableError::ActorCommunicationError(format!(
                "unexpected action result {other:?}"
            ))),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_status(&self, id: TableId, status: TableStatus) -> Result<TableStatus, TableError> {
        match self
            .inner
            .perform_action(id, TableAction::SetStatus(status))
            .await
            .map_err(Self::map_error)?
        {
            TableActionResult::SetStatus(previous) => Ok(previous),
            other => Err(TableError::ActorCommunicationError(format!(
                "unexpected action result {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;

    #[tokio::test]
    async fn test_release_reports_previous_status() {
        let mut mock = MockClient::<Table>::new();
        mock.expect_action(TableId(4))
            .return_ok(TableActionResult::Release(TableStatus::Occupied));
        mock.expect_get(TableId(9)).return_ok(None);

        let tables = TableClient::new(mock.client());
        assert_eq!(tables.release(TableId(4)).await.unwrap(), TableStatus::Occupied);
        assert_eq!(
            tables.require(TableId(9)).await.unwrap_err(),
            TableError::NotFound("table_9".to_string())
        );
        mock.verify();
    }
}

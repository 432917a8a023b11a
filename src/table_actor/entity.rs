//! [`ActorEntity`] implementation for [`Table`].

use super::actions::{TableAction, TableActionResult};
use super::error::TableError;
use crate::framework::ActorEntity;
use crate::model::{Table, TableCreate, TableId, TableStatus, TableUpdate};
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Table {
    type Id = TableId;
    type Create = TableCreate;
    type Update = TableUpdate;
    type Action = TableAction;
    type ActionResult = TableActionResult;
    type Context = ();
    type Error = TableError;

    fn from_create_params(id: TableId, params: TableCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(TableError::ValidationError("name must not be empty".into()));
        }
        Ok(Self {
            id,
            name: params.name,
            area: params.area,
            status: TableStatus::Empty,
        })
    }

    async fn on_update(&mut self, update: TableUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(TableError::ValidationError("name must not be empty".into()));
            }
            self.name = name;
        }
        if let Some(area) = update.area {
            self.area = area;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: TableAction,
        _ctx: &(),
    ) -> Result<TableActionResult, Self::Error> {
        Ok(match action {
            TableAction::Occupy => {
                TableActionResult::Occupy(std::mem::replace(&mut self.status, TableStatus::Occupied))
            }
            TableAction::Release => {
                TableActionResult::Release(std::mem::replace(&mut self.status, TableStatus::Empty))
            }
            TableAction::SetStatus(status) => {
                TableActionResult::SetStatus(std::mem::replace(&mut self.status, status))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_occupy_then_release() {
        let mut table = Table::from_create_params(
            TableId(1),
            TableCreate {
                name: "T1".to_string(),
                area: "Terrace".to_string(),
            },
        )
        .unwrap();
        assert_eq!(table.status, TableStatus::Empty);

        let previous = table.handle_action(TableAction::Occupy, &()).await.unwrap();
        assert_eq!(previous, TableActionResult::Occupy(TableStatus::Empty));
        table.handle_action(TableAction::Release, &()).await.unwrap();
        assert_eq!(table.status, TableStatus::Empty);
    }
}

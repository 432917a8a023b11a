//! Order placement, kitchen progress and cancellation.

use super::unit::{Compensation, UnitOfWork};
use super::TransactionCoordinator;
use crate::error::PosError;
use crate::model::{Order, OrderCreate, OrderId, OrderStatus};
use tracing::{info, instrument};

impl TransactionCoordinator {
    /// Places an order and marks its table occupied.
    ///
    /// The order actor prices the lines and refuses the order if the menu items are
    /// unavailable or stock cannot cover them.
    #[instrument(skip(self, params), fields(table = %params.table_id, lines = params.lines.len()))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<Order, PosError> {
        self.tables.require(params.table_id.clone()).await?;

        let _table = self.table_locks.lock(&params.table_id).await;
        let mut unit = UnitOfWork::new("create_order");
        let result = self.create_order_in(params, &mut unit).await;
        self.settle(unit, result).await
    }

    async fn create_order_in(
        &self,
        params: OrderCreate,
        unit: &mut UnitOfWork,
    ) -> Result<Order, PosError> {
        let table = params.table_id.clone();
        let id = self.orders.create_order(params).await?;
        unit.record(Compensation::DeleteOrder(id.clone()));

        self.occupy_table(&table, unit).await?;
        let order = self.orders.require(id).await?;
        unit.commit();

        info!(order = %order.id, total = %order.total, "Order placed");
        Ok(order)
    }

    /// One kitchen step: `New -> Processing -> Ready`.
    #[instrument(skip(self))]
    pub async fn advance_order(&self, id: OrderId) -> Result<OrderStatus, PosError> {
        let this = self;
        let id = &id;
        self.retry
            .run(move || async move {
                let _guard = this.locks.try_acquire(id)?;
                let status = this.orders.advance(id.clone()).await?;
                info!(order = %id, %status, "Order advanced");
                Ok(status)
            })
            .await
    }

    /// Cancels an order.
    ///
    /// A completed order is reversed: exactly the stock it consumed goes back, once.
    /// The table is released when no other active order sits on it.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order, PosError> {
        let this = self;
        let id = &id;
        self.retry
            .run(move || async move {
                let _guard = this.locks.try_acquire(id)?;
                let mut unit = UnitOfWork::new("cancel_order");
                let result = this.cancel_order_in(id, &mut unit).await;
                this.settle(unit, result).await
            })
            .await
    }

    async fn cancel_order_in(&self, id: &OrderId, unit: &mut UnitOfWork) -> Result<Order, PosError> {
        let before = self.orders.require(id.clone()).await?;
        let restock = self.orders.cancel(id.clone()).await?;
        let table = before.table_id.clone();
        unit.record(Compensation::RestoreOrder(before));

        self.release_table_if_idle(&table, unit).await?;

        if let Some(movements) = restock {
            self.stock.restock(&movements).await?;
            info!(order = %id, ingredients = movements.len(), "Completed order reversed");
        }
        let order = self.orders.require(id.clone()).await?;
        unit.commit();

        info!(order = %id, "Order cancelled");
        Ok(order)
    }
}

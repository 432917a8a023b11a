//! # Transaction Coordinator
//!
//! Drives every operation that touches more than one store: placing and cancelling
//! orders, Cash payments, and the two phases of a Mobile payment.
//!
//! Each operation is one unit of work:
//!
//! 1. take the order's guard ([`OrderLocks`]), retrying briefly if it is busy
//!    ([`RetryPolicy`]); table occupancy changes also hold the table's guard
//!    ([`TableLocks`]);
//! 2. run the steps, recording a [`Compensation`] after each one that changed a store;
//! 3. on any error, run the recorded compensations newest first and return the error.
//!
//! A payment unit marks the payment `Completed` as its very last step, so a payment
//! that reads `Completed` always has its stock, order, table and loyalty effects in
//! place.

mod locks;
mod orders;
mod payments;
mod retry;
mod unit;

pub use locks::{KeyGuard, KeyedLocks, OrderGuard, OrderLocks, TableGuard, TableLocks};
pub use payments::PaymentRequest;
pub use retry::RetryPolicy;
pub use unit::{Compensation, UnitOfWork};

use crate::clients::{OrderClient, PaymentClient, TableClient};
use crate::error::PosError;
use crate::framework::ActorClient;
use crate::loyalty::LoyaltyLedger;
use crate::model::{TableId, TableStatus};
use crate::stock::StockLedger;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct TransactionCoordinator {
    orders: OrderClient,
    payments: PaymentClient,
    tables: TableClient,
    stock: StockLedger,
    loyalty: LoyaltyLedger,
    locks: OrderLocks,
    table_locks: TableLocks,
    retry: RetryPolicy,
}

impl TransactionCoordinator {
    pub fn new(
        orders: OrderClient,
        payments: PaymentClient,
        tables: TableClient,
        stock: StockLedger,
        loyalty: LoyaltyLedger,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            orders,
            payments,
            tables,
            stock,
            loyalty,
            locks: OrderLocks::new(),
            table_locks: TableLocks::new(),
            retry,
        }
    }

    pub fn locks(&self) -> &OrderLocks {
        &self.locks
    }

    pub fn table_locks(&self) -> &TableLocks {
        &self.table_locks
    }

    /// Returns `result` unchanged, rolling `unit` back first if it is an error.
    async fn settle<T>(&self, unit: UnitOfWork, result: Result<T, PosError>) -> Result<T, PosError> {
        if let Err(e) = &result {
            warn!(operation = unit.operation(), error = %e, steps = unit.len(), "Unit of work failed");
            self.rollback(unit).await;
        }
        result
    }

    /// Runs every recorded compensation, newest first.
    ///
    /// A compensation that fails is logged and skipped; the remaining ones still run.
    pub async fn rollback(&self, unit: UnitOfWork) {
        if unit.is_empty() {
            return;
        }
        let operation = unit.operation();
        for step in unit.into_rollback() {
            let kind = step.kind();
            if let Err(e) = self.compensate(step).await {
                error!(operation, compensation = kind, error = %e, "Compensation failed");
            }
        }
        info!(operation, "Unit of work rolled back");
    }

    async fn compensate(&self, step: Compensation) -> Result<(), PosError> {
        match step {
            Compensation::DeleteOrder(id) => self.orders.delete(id).await?,
            Compensation::DeletePayment(id) => self.payments.delete(id).await?,
            Compensation::RestoreOrder(order) => self.orders.restore(order.id.clone(), order).await?,
            Compensation::RestorePayment(payment) => {
                self.payments.restore(payment.id.clone(), payment).await?
            }
            Compensation::RestoreTable(table) => self.tables.restore(table.id.clone(), table).await?,
            Compensation::Restock(movements) => self.stock.restock(&movements).await?,
            Compensation::RevokeAccrual {
                customer,
                points,
                spend,
                payment,
            } => {
                self.loyalty
                    .revoke_accrual(customer.clone(), points, spend, payment)
                    .await?;
                self.loyalty.recompute_tier(customer).await?;
            }
            Compensation::RefundPoints {
                customer,
                points,
                payment,
            } => {
                self.loyalty.refund_points(customer, points, payment).await?;
            }
        }
        Ok(())
    }

    /// Marks the table occupied, remembering how it was. The caller holds the table's
    /// guard.
    async fn occupy_table(&self, table: &TableId, unit: &mut UnitOfWork) -> Result<(), PosError> {
        let before = self.tables.require(table.clone()).await?;
        if before.status != TableStatus::Occupied {
            self.tables.occupy(table.clone()).await?;
            unit.record(Compensation::RestoreTable(before));
        }
        Ok(())
    }

    /// Frees the table unless another active order still sits on it.
    ///
    /// Holds the table's guard from the check to the release, so an order placed on
    /// the table meanwhile is either seen as active or occupies the table afterwards.
    async fn release_table_if_idle(
        &self,
        table: &TableId,
        unit: &mut UnitOfWork,
    ) -> Result<(), PosError> {
        let _table = self.table_locks.lock(table).await;
        let active = self.orders.active_on_table(table.clone()).await?;
        if !active.is_empty() {
            info!(%table, active = active.len(), "Table still in use");
            return Ok(());
        }
        let before = self.tables.require(table.clone()).await?;
        if before.status == TableStatus::Occupied {
            self.tables.release(table.clone()).await?;
            unit.record(Compensation::RestoreTable(before));
        }
        Ok(())
    }
}

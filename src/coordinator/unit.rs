//! Units of work and their compensations.
//!
//! Each step of a multi-store operation that changes something records how to undo
//! it. If a later step fails, the recorded compensations run newest first, so every
//! participating store ends up as it was before the unit started.

use crate::model::{CustomerId, Order, OrderId, Payment, PaymentId, StockMovement, Table};
use rust_decimal::Decimal;

/// How to undo one completed step.
#[derive(Debug, Clone)]
pub enum Compensation {
    DeleteOrder(OrderId),
    DeletePayment(PaymentId),
    /// Put the order back as it was captured before the step.
    RestoreOrder(Order),
    RestorePayment(Payment),
    RestoreTable(Table),
    /// Return a deduction to stock.
    Restock(Vec<StockMovement>),
    RevokeAccrual {
        customer: CustomerId,
        points: u32,
        spend: Decimal,
        payment: PaymentId,
    },
    RefundPoints {
        customer: CustomerId,
        points: u32,
        payment: PaymentId,
    },
}

impl Compensation {
    pub fn kind(&self) -> &'static str {
        match self {
            Compensation::DeleteOrder(_) => "delete_order",
            Compensation::DeletePayment(_) => "delete_payment",
            Compensation::RestoreOrder(_) => "restore_order",
            Compensation::RestorePayment(_) => "restore_payment",
            Compensation::RestoreTable(_) => "restore_table",
            Compensation::Restock(_) => "restock",
            Compensation::RevokeAccrual { .. } => "revoke_accrual",
            Compensation::RefundPoints { .. } => "refund_points",
        }
    }
}

/// The compensations recorded so far by one coordinator operation.
#[derive(Debug)]
pub struct UnitOfWork {
    operation: &'static str,
    steps: Vec<Compensation>,
}

impl UnitOfWork {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            steps: Vec::new(),
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn record(&mut self, step: Compensation) {
        self.steps.push(step);
    }

    /// Every step has succeeded; nothing recorded so far may be undone.
    pub fn commit(&mut self) {
        self.steps.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Consumes the unit, yielding compensations newest first.
    pub fn into_rollback(self) -> impl Iterator<Item = Compensation> {
        self.steps.into_iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_runs_newest_first() {
        let mut unit = UnitOfWork::new("pay_cash");
        unit.record(Compensation::DeletePayment(PaymentId(1)));
        unit.record(Compensation::Restock(Vec::new()));
        unit.record(Compensation::DeleteOrder(OrderId(1)));

        let kinds: Vec<_> = unit.into_rollback().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec!["delete_order", "restock", "delete_payment"]);
    }

    #[test]
    fn test_committed_unit_has_nothing_to_undo() {
        let mut unit = UnitOfWork::new("cancel_order");
        unit.record(Compensation::DeleteOrder(OrderId(1)));
        unit.commit();
        assert!(unit.is_empty());
        assert_eq!(unit.into_rollback().count(), 0);
    }
}

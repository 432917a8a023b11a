//! [`ActorEntity`] implementation for [`Order`].
//!
//! `on_create` resolves every line against the menu, snapshots name and unit price,
//! computes the total and refuses the order if stock cannot cover it. Nothing is
//! deducted at this point.

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use super::OrderContext;
use crate::framework::ActorEntity;
use crate::menu_actor::MenuError;
use crate::model::{Order, OrderCreate, OrderId, OrderLine, OrderStatus, OrderUpdate};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = OrderContext;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        if params.lines.is_empty() {
            return Err(OrderError::ValidationError(
                "an order needs at least one line".to_string(),
            ));
        }
        if let Some(line) = params.lines.iter().find(|line| line.quantity == 0) {
            return Err(OrderError::ValidationError(format!(
                "quantity for {} must be positive",
                line.menu_item_id
            )));
        }

        let lines = params
            .lines
            .into_iter()
            .map(|line| OrderLine {
                menu_item_id: line.menu_item_id,
                name: String::new(),
                quantity: line.quantity,
                unit_price: Decimal::ZERO,
            })
            .collect();

        Ok(Self {
            id,
            table_id: params.table_id,
            customer_name: params.customer_name,
            created_at: Utc::now(),
            status: OrderStatus::New,
            lines,
            total: Decimal::ZERO,
            resume_status: None,
            payment_id: None,
            deducted: None,
            restocked: false,
            completed_at: None,
        })
    }

    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), Self::Error> {
        for line in self.lines.iter_mut() {
            let item = ctx.menu.require(line.menu_item_id.clone()).await?;
            if !item.available {
                return Err(MenuError::Unavailable(item.id).into());
            }
            line.name = item.name;
            line.unit_price = item.price;
        }
        self.total = self.lines.iter().map(OrderLine::subtotal).sum();
        debug!(order = %self.id, total = %self.total, "Lines priced");

        ctx.stock.ensure_available(&self.lines).await?;
        Ok(())
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &OrderContext) -> Result<(), Self::Error> {
        if let Some(name) = update.customer_name {
            self.customer_name = Some(name);
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &OrderContext,
    ) -> Result<OrderActionResult, Self::Error> {
        self.apply(action)
    }
}

impl Order {
    /// Applies a status action to the entity.
    pub(crate) fn apply(&mut self, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::Advance => {
                let next = self
                    .status
                    .next_in_workflow()
                    .ok_or_else(|| self.refuse("advance"))?;
                self.transition(next, "advance")?;
                Ok(OrderActionResult::Advance(next))
            }
            OrderAction::AwaitPayment => {
                let previous = self.transition(OrderStatus::AwaitingPayment, "await payment")?;
                self.resume_status = Some(previous);
                Ok(OrderActionResult::AwaitPayment(previous))
            }
            OrderAction::ResumeAfterFailedPayment => {
                if self.status != OrderStatus::AwaitingPayment {
                    return Err(self.refuse("resume after a failed payment"));
                }
                let resume = self.resume_status.take().unwrap_or(OrderStatus::New);
                self.transition(resume, "resume after a failed payment")?;
                Ok(OrderActionResult::ResumeAfterFailedPayment(resume))
            }
            OrderAction::Complete {
                payment_id,
                deducted,
            } => {
                self.transition(OrderStatus::Completed, "complete")?;
                self.payment_id = Some(payment_id);
                self.deducted = Some(deducted);
                self.resume_status = None;
                self.completed_at = Some(Utc::now());
                Ok(OrderActionResult::Complete(()))
            }
            OrderAction::Cancel => {
                if self.status == OrderStatus::Completed {
                    if self.restocked || self.deducted.is_none() {
                        return Err(self.refuse("cancel"));
                    }
                    self.transition(OrderStatus::Cancelled, "cancel")?;
                    self.restocked = true;
                    return Ok(OrderActionResult::Cancel(self.deducted.clone()));
                }
                self.transition(OrderStatus::Cancelled, "cancel")?;
                Ok(OrderActionResult::Cancel(None))
            }
        }
    }

    /// Moves to `next` if the status machine allows it; returns the previous status.
    fn transition(
        &mut self,
        next: OrderStatus,
        action: &'static str,
    ) -> Result<OrderStatus, OrderError> {
        if !self.status.can_transition_to(next) {
            return Err(self.refuse(action));
        }
        Ok(std::mem::replace(&mut self.status, next))
    }

    fn refuse(&self, action: &'static str) -> OrderError {
        OrderError::InvalidTransition {
            order: self.id.clone(),
            from: self.status,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IngredientId, LineRequest, MenuItemId, PaymentId, StockMovement, TableId};

    fn order() -> Order {
        Order::from_create_params(
            OrderId(1),
            OrderCreate {
                table_id: TableId(1),
                customer_name: None,
                lines: vec![LineRequest::new(MenuItemId(1), 2)],
            },
        )
        .unwrap()
    }

    fn apply(order: &mut Order, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        order.apply(action)
    }

    #[test]
    fn test_empty_order_rejected() {
        let result = Order::from_create_params(
            OrderId(1),
            OrderCreate {
                table_id: TableId(1),
                customer_name: None,
                lines: vec![],
            },
        );
        assert!(matches!(result, Err(OrderError::ValidationError(_))));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let result = Order::from_create_params(
            OrderId(1),
            OrderCreate {
                table_id: TableId(1),
                customer_name: None,
                lines: vec![LineRequest::new(MenuItemId(1), 0)],
            },
        );
        assert!(matches!(result, Err(OrderError::ValidationError(_))));
    }

    #[test]
    fn test_advance_stops_at_ready() {
        let mut order = order();
        assert_eq!(
            apply(&mut order, OrderAction::Advance).unwrap(),
            OrderActionResult::Advance(OrderStatus::Processing)
        );
        apply(&mut order, OrderAction::Advance).unwrap();
        assert!(matches!(
            apply(&mut order, OrderAction::Advance),
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Ready,
                ..
            })
        ));
    }

    #[test]
    fn test_failed_mobile_payment_returns_to_previous_status() {
        let mut order = order();
        apply(&mut order, OrderAction::Advance).unwrap();
        apply(&mut order, OrderAction::AwaitPayment).unwrap();
        assert_eq!(order.status, OrderStatus::AwaitingPayment);
        assert_eq!(
            apply(&mut order, OrderAction::ResumeAfterFailedPayment).unwrap(),
            OrderActionResult::ResumeAfterFailedPayment(OrderStatus::Processing)
        );
    }

    #[test]
    fn test_completed_order_restocks_once() {
        let mut order = order();
        let deducted = vec![StockMovement {
            ingredient_id: IngredientId(1),
            quantity: Decimal::new(4, 2),
        }];
        apply(
            &mut order,
            OrderAction::Complete {
                payment_id: PaymentId(1),
                deducted: deducted.clone(),
            },
        )
        .unwrap();

        assert_eq!(
            apply(&mut order, OrderAction::Cancel).unwrap(),
            OrderActionResult::Cancel(Some(deducted))
        );
        assert!(order.restocked);
        assert!(matches!(
            apply(&mut order, OrderAction::Cancel),
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Cancelled,
                ..
            })
        ));
    }

    #[test]
    fn test_new_order_cancels_without_restock() {
        let mut order = order();
        assert_eq!(
            apply(&mut order, OrderAction::Cancel).unwrap(),
            OrderActionResult::Cancel(None)
        );
    }

    #[test]
    fn test_awaiting_payment_cannot_be_cancelled() {
        let mut order = order();
        apply(&mut order, OrderAction::AwaitPayment).unwrap();
        assert!(matches!(
            apply(&mut order, OrderAction::Cancel),
            Err(OrderError::InvalidTransition { .. })
        ));
    }
}

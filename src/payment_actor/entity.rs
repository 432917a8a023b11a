//! [`ActorEntity`] implementation for [`Payment`].

use super::actions::{PaymentAction, PaymentActionResult};
use super::error::PaymentError;
use crate::framework::ActorEntity;
use crate::model::{Payment, PaymentCreate, PaymentId, PaymentMethod, PaymentStatus};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

#[async_trait]
impl ActorEntity for Payment {
    type Id = PaymentId;
    type Create = PaymentCreate;
    type Update = ();
    type Action = PaymentAction;
    type ActionResult = PaymentActionResult;
    type Context = ();
    type Error = PaymentError;

    fn from_create_params(id: PaymentId, params: PaymentCreate) -> Result<Self, Self::Error> {
        if params.amount < Decimal::ZERO {
            return Err(PaymentError::ValidationError(format!(
                "amount {} must not be negative",
                params.amount
            )));
        }
        if params.discount < Decimal::ZERO {
            return Err(PaymentError::ValidationError(format!(
                "discount {} must not be negative",
                params.discount
            )));
        }
        if params.lines.is_empty() {
            return Err(PaymentError::ValidationError(
                "a payment must cover at least one order line".into(),
            ));
        }

        let transaction_ref = match params.method {
            PaymentMethod::Mobile => Some(Uuid::new_v4().to_string()),
            PaymentMethod::Cash => None,
        };

        Ok(Self {
            id,
            order_id: params.order_id,
            amount: params.amount,
            method: params.method,
            status: PaymentStatus::initial_for(params.method),
            lines: params.lines,
            customer_id: params.customer_id,
            customer_info: params.customer_info,
            points_used: params.points_used,
            discount: params.discount,
            points_earned: 0,
            transaction_ref,
            failure_reason: None,
            created_at: Utc::now(),
            confirmed_at: None,
        })
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Err(PaymentError::ValidationError(
            "payments are changed through actions only".into(),
        ))
    }

    async fn handle_action(
        &mut self,
        action: PaymentAction,
        _ctx: &(),
    ) -> Result<PaymentActionResult, Self::Error> {
        match action {
            PaymentAction::Complete { points_earned } => {
                self.settle(PaymentStatus::Completed)?;
                self.points_earned = points_earned;
                Ok(PaymentActionResult::Complete(self.clone()))
            }
            PaymentAction::Fail { reason } => {
                self.settle(PaymentStatus::Failed)?;
                self.failure_reason = Some(reason);
                Ok(PaymentActionResult::Fail(self.clone()))
            }
        }
    }
}

impl Payment {
    fn settle(&mut self, next: PaymentStatus) -> Result<(), PaymentError> {
        if !self.status.can_transition_to(next) {
            return Err(PaymentError::AlreadyTerminal {
                payment: self.id.clone(),
                status: self.status,
            });
        }
        debug!(payment = %self.id, from = ?self.status, to = ?next, "Settling");
        self.confirmed_at = Some(Utc::now());
        self.status = next;
        Ok(())
    }
}

//! Cash payments and the two phases of a Mobile payment.

use super::unit::{Compensation, UnitOfWork};
use super::TransactionCoordinator;
use crate::error::PosError;
use crate::model::{
    CustomerId, Order, OrderId, Payment, PaymentCreate, PaymentId, PaymentMethod, PaymentStatus,
};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

/// What the caller supplies when starting a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    /// Loyalty customer to credit, if any.
    pub customer_id: Option<CustomerId>,
    /// Points to redeem against this payment. Requires `customer_id`.
    pub points_to_redeem: u32,
    /// Free-text note, e.g. a walk-in customer's name.
    pub customer_info: Option<String>,
}

impl PaymentRequest {
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            customer_id: None,
            points_to_redeem: 0,
            customer_info: None,
        }
    }

    pub fn customer(mut self, customer: CustomerId) -> Self {
        self.customer_id = Some(customer);
        self
    }

    pub fn redeem(mut self, points: u32) -> Self {
        self.points_to_redeem = points;
        self
    }

    pub fn note(mut self, info: impl Into<String>) -> Self {
        self.customer_info = Some(info.into());
        self
    }
}

impl TransactionCoordinator {
    /// Takes a Cash payment and completes the order in one unit of work.
    ///
    /// Stock is checked before anything is written, so a shortage leaves every store
    /// untouched.
    #[instrument(skip(self, request), fields(order = %request.order_id))]
    pub async fn pay_cash(&self, request: PaymentRequest) -> Result<Payment, PosError> {
        let this = self;
        let request = &request;
        self.retry
            .run(move || async move {
                let _guard = this.locks.try_acquire(&request.order_id)?;
                let mut unit = UnitOfWork::new("pay_cash");
                let result = this.pay_cash_in(request, &mut unit).await;
                this.settle(unit, result).await
            })
            .await
    }

    async fn pay_cash_in(
        &self,
        request: &PaymentRequest,
        unit: &mut UnitOfWork,
    ) -> Result<Payment, PosError> {
        let order = self.orders.require(request.order_id.clone()).await?;
        let create = self.prepare_payment(&order, request, PaymentMethod::Cash).await?;
        self.stock.ensure_available(&order.lines).await?;

        let payment_id = self.payments.create_payment(create).await?;
        unit.record(Compensation::DeletePayment(payment_id.clone()));
        let payment = self.payments.require(payment_id).await?;

        self.complete_in(&order, &payment, unit).await
    }

    /// Starts a Mobile payment. The order waits in `AwaitingPayment` until
    /// [`confirm_mobile`](Self::confirm_mobile) is called; nothing leaves stock yet.
    #[instrument(skip(self, request), fields(order = %request.order_id))]
    pub async fn initiate_mobile(&self, request: PaymentRequest) -> Result<Payment, PosError> {
        let this = self;
        let request = &request;
        self.retry
            .run(move || async move {
                let _guard = this.locks.try_acquire(&request.order_id)?;
                let mut unit = UnitOfWork::new("initiate_mobile");
                let result = this.initiate_mobile_in(request, &mut unit).await;
                this.settle(unit, result).await
            })
            .await
    }

    async fn initiate_mobile_in(
        &self,
        request: &PaymentRequest,
        unit: &mut UnitOfWork,
    ) -> Result<Payment, PosError> {
        let order = self.orders.require(request.order_id.clone()).await?;
        let create = self.prepare_payment(&order, request, PaymentMethod::Mobile).await?;

        let payment_id = self.payments.create_payment(create).await?;
        unit.record(Compensation::DeletePayment(payment_id.clone()));

        let payment = self.payments.require(payment_id).await?;
        self.orders.await_payment(order.id.clone()).await?;
        unit.commit();

        info!(
            payment = %payment.id,
            transaction_ref = payment.transaction_ref.as_deref().unwrap_or_default(),
            amount = %payment.amount,
            "Mobile payment pending"
        );
        Ok(payment)
    }

    /// Applies the provider's answer to a pending Mobile payment.
    ///
    /// On `success` the payment's line snapshot is checked against stock again and,
    /// if it still fits, the order is completed exactly as for Cash. A failure signal,
    /// a shortage or a points shortfall fails the payment and returns the order to
    /// the status it had before the payment started.
    #[instrument(skip(self))]
    pub async fn confirm_mobile(&self, id: PaymentId, success: bool) -> Result<Payment, PosError> {
        let payment = self.payments.require(id.clone()).await?;
        ensure_pending(&payment)?;
        if payment.method != PaymentMethod::Mobile {
            return Err(PosError::InvalidArgument(format!(
                "{} is not a Mobile payment",
                payment.id
            )));
        }

        let this = self;
        let order_id = &payment.order_id;
        let id = &id;
        self.retry
            .run(move || async move {
                let _guard = this.locks.try_acquire(order_id)?;
                // Re-read under the guard: a concurrent confirmation may have won.
                let payment = this.payments.require(id.clone()).await?;
                ensure_pending(&payment)?;
                this.confirm_mobile_locked(payment, success).await
            })
            .await
    }

    async fn confirm_mobile_locked(
        &self,
        payment: Payment,
        success: bool,
    ) -> Result<Payment, PosError> {
        if !success {
            return self.fail_mobile(&payment, "declined by payment provider").await;
        }

        let availability = self.stock.check_availability(&payment.lines).await?;
        if !availability.is_available() {
            self.fail_mobile(&payment, "insufficient stock").await?;
            return Err(PosError::InsufficientStock(availability.shortages));
        }

        let order = self.orders.require(payment.order_id.clone()).await?;
        let mut unit = UnitOfWork::new("confirm_mobile");
        match self.complete_in(&order, &payment, &mut unit).await {
            Ok(completed) => Ok(completed),
            Err(e) => {
                warn!(payment = %payment.id, error = %e, "Mobile completion failed");
                self.rollback(unit).await;
                if e.is_business_rejection() {
                    self.fail_mobile(&payment, &e.to_string()).await?;
                }
                Err(e)
            }
        }
    }

    /// Fails the payment and puts the order back to where it was before the payment.
    async fn fail_mobile(&self, payment: &Payment, reason: &str) -> Result<Payment, PosError> {
        let mut unit = UnitOfWork::new("fail_mobile");
        let result = self.fail_mobile_in(payment, reason, &mut unit).await;
        self.settle(unit, result).await
    }

    async fn fail_mobile_in(
        &self,
        payment: &Payment,
        reason: &str,
        unit: &mut UnitOfWork,
    ) -> Result<Payment, PosError> {
        let failed = self.payments.fail(payment.id.clone(), reason).await?;
        unit.record(Compensation::RestorePayment(payment.clone()));

        let status = self
            .orders
            .resume_after_failed_payment(payment.order_id.clone())
            .await?;
        unit.commit();
        warn!(payment = %payment.id, order = %payment.order_id, %status, reason, "Mobile payment failed");
        Ok(failed)
    }

    /// Checks that `order` can be paid and builds the payment record.
    async fn prepare_payment(
        &self,
        order: &Order,
        request: &PaymentRequest,
        method: PaymentMethod,
    ) -> Result<PaymentCreate, PosError> {
        if !order.status.is_payable() {
            return Err(PosError::InvalidTransition(format!(
                "order {} cannot be paid while {}",
                order.id, order.status
            )));
        }
        let existing = self.payments.for_order(order.id.clone()).await?;
        if let Some(live) = existing.iter().find(|p| p.status != PaymentStatus::Failed) {
            return Err(PosError::InvalidTransition(format!(
                "order {} already has payment {} ({})",
                order.id, live.id, live.status
            )));
        }

        let mut discount = Decimal::ZERO;
        match &request.customer_id {
            Some(customer_id) => {
                let customer = self.loyalty.require_customer(customer_id.clone()).await?;
                if request.points_to_redeem > customer.points {
                    return Err(PosError::InsufficientPoints {
                        customer: customer.id,
                        requested: request.points_to_redeem,
                        available: customer.points,
                    });
                }
                discount = self.loyalty.discount_for(request.points_to_redeem);
            }
            None if request.points_to_redeem > 0 => {
                return Err(PosError::InvalidArgument(
                    "points can only be redeemed by a registered customer".into(),
                ));
            }
            None => {}
        }
        if discount > order.total {
            return Err(PosError::InvalidArgument(format!(
                "discount {discount} exceeds order total {}",
                order.total
            )));
        }

        Ok(PaymentCreate {
            order_id: order.id.clone(),
            method,
            amount: order.total - discount,
            lines: order.lines.clone(),
            customer_id: request.customer_id.clone(),
            customer_info: request.customer_info.clone(),
            points_used: request.points_to_redeem,
            discount,
        })
    }

    /// The completion sequence shared by Cash and confirmed Mobile payments.
    ///
    /// Marking the payment `Completed` is the last step; nothing after it can fail the
    /// unit.
    async fn complete_in(
        &self,
        order: &Order,
        payment: &Payment,
        unit: &mut UnitOfWork,
    ) -> Result<Payment, PosError> {
        let customer = payment.customer_id.clone();

        if payment.points_used > 0 {
            let customer = customer.as_ref().ok_or_else(|| {
                PosError::InvalidArgument(format!("{} redeems points without a customer", payment.id))
            })?;
            self.loyalty
                .consume(customer.clone(), payment.points_used, payment.id.clone())
                .await?;
            unit.record(Compensation::RefundPoints {
                customer: customer.clone(),
                points: payment.points_used,
                payment: payment.id.clone(),
            });
        }

        let deducted = self.stock.deduct(&payment.lines).await?;
        unit.record(Compensation::Restock(deducted.clone()));

        self.orders
            .complete(order.id.clone(), payment.id.clone(), deducted)
            .await?;
        unit.record(Compensation::RestoreOrder(order.clone()));

        self.release_table_if_idle(&order.table_id, unit).await?;

        let mut points_earned = 0;
        if let Some(customer) = &customer {
            points_earned = self.loyalty.points_from_amount(payment.amount);
            self.loyalty
                .accrue(customer.clone(), points_earned, payment.amount, payment.id.clone())
                .await?;
            unit.record(Compensation::RevokeAccrual {
                customer: customer.clone(),
                points: points_earned,
                spend: payment.amount,
                payment: payment.id.clone(),
            });
            self.loyalty.recompute_tier(customer.clone()).await?;
        }

        let completed = self
            .payments
            .complete(payment.id.clone(), points_earned)
            .await?;
        unit.commit();
        info!(
            payment = %completed.id,
            order = %order.id,
            amount = %completed.amount,
            points_earned,
            "Payment completed"
        );
        Ok(completed)
    }
}

fn ensure_pending(payment: &Payment) -> Result<(), PosError> {
    if payment.status.is_terminal() {
        return Err(PosError::PaymentAlreadyTerminal {
            payment: payment.id.clone(),
            status: payment.status,
        });
    }
    Ok(())
}

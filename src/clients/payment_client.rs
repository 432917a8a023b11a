//! # Payment Client
use crate::clients::recover;
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{CustomerId, OrderId, Payment, PaymentCreate, PaymentId, PaymentStatus};
use crate::payment_actor::{PaymentAction, PaymentActionResult, PaymentError};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Payment actor.
#[derive(Clone)]
pub struct PaymentClient {
    inner: ResourceClient<Payment>,
}

impl PaymentClient {
    pub fn new(inner: ResourceClient<Payment>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Payment> for PaymentClient {
    type Error = PaymentError;

    fn inner(&self) -> &ResourceClient<Payment> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        recover(e, PaymentError::NotFound)
    }
}

impl PaymentClient {
    #[instrument(skip(self, params), fields(order = %params.order_id, method = ?params.method))]
    pub async fn create_payment(&self, params: PaymentCreate) -> Result<PaymentId, PaymentError> {
        info!(amount = %params.amount, "Sending create_payment to actor");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn require(&self, id: PaymentId) -> Result<Payment, PaymentError> {
        self.get(id.clone())
            .await?
            .ok_or_else(|| PaymentError::NotFound(id.to_string()))
    }

    /// Marks the payment Completed; returns the settled payment.
    #[instrument(skip(self))]
    pub async fn complete(
        &self,
        id: PaymentId,
        points_earned: u32,
    ) -> Result<Payment, PaymentError> {
        debug!("Completing payment");
        match self
            .inner
            .perform_action(id, PaymentAction::Complete { points_earned })
            .await
            .map_err(Self::map_error)?
        {
            PaymentActionResult::Complete(payment) => Ok(payment),
            other => Err(PaymentError::ActorCommunicationError(format!(
                "unexpected action result {other:?}"
            ))),
        }
    }

    /// Marks the payment Failed; returns the settled payment.
    #[instrument(skip(self, reason))]
    pub async fn fail(
        &self,
        id: PaymentId,
        reason: impl Into<String>,
    ) -> Result<Payment, PaymentError> {
        let reason = reason.into();
        debug!(%reason, "Failing payment");
        match self
            .inner
            .perform_action(id, PaymentAction::Fail { reason })
            .await
            .map_err(Self::map_error)?
        {
            PaymentActionResult::Fail(payment) => Ok(payment),
            other => Err(PaymentError::ActorCommunicationError(format!(
                "unexpected action result {other:?}"
            ))),
        }
    }

    async fn list(
        &self,
        predicate: impl Fn(&Payment) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<Payment>, PaymentError> {
        let mut payments = self.inner.find(predicate).await.map_err(Self::map_error)?;
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(payments)
    }

    /// Every payment attempt for `order`, newest first.
    pub async fn for_order(&self, order: OrderId) -> Result<Vec<Payment>, PaymentError> {
        self.list(move |payment| payment.order_id == order).await
    }

    /// Completed purchases made by `customer`, newest first.
    pub async fn history_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<Payment>, PaymentError> {
        self.list(move |payment| {
            payment.customer_id.as_ref() == Some(&customer)
                && payment.status == PaymentStatus::Completed
        })
        .await
    }

    pub async fn completed(&self) -> Result<Vec<Payment>, PaymentError> {
        self.list(|payment| payment.status == PaymentStatus::Completed)
            .await
    }
}

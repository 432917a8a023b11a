//! # Order Client
//!
//! Typed access to the Order actor. Status changes go through
//! [`TransactionCoordinator`](crate::coordinator::TransactionCoordinator), which holds the
//! per-order guard; the methods here are the individual steps it composes.
use crate::clients::recover;
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{
    Order, OrderCreate, OrderId, OrderStatus, OrderUpdate, PaymentId, StockMovement, TableId,
};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
///
/// Line pricing and the availability check happen in the Order actor's `on_create` hook.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        recover(e, OrderError::NotFound)
    }
}

fn unexpected(result: OrderActionResult) -> OrderError {
    OrderError::ActorCommunicationError(format!("unexpected action result {result:?}"))
}

impl OrderClient {
    #[instrument(skip(self, params), fields(table = %params.table_id, lines = params.lines.len()))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        info!("Sending create_order to actor");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn require(&self, id: OrderId) -> Result<Order, OrderError> {
        self.get(id.clone())
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, OrderError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    async fn act(&self, id: OrderId, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        debug!(%id, ?action, "Sending order action");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    /// One kitchen step; returns the new status.
    #[instrument(skip(self))]
    pub async fn advance(&self, id: OrderId) -> Result<OrderStatus, OrderError> {
        match self.act(id, OrderAction::Advance).await? {
            OrderActionResult::Advance(status) => Ok(status),
            other => Err(unexpected(other)),
        }
    }

    /// Returns the status the order was in before.
    #[instrument(skip(self))]
    pub async fn await_payment(&self, id: OrderId) -> Result<OrderStatus, OrderError> {
        match self.act(id, OrderAction::AwaitPayment).await? {
            OrderActionResult::AwaitPayment(previous) => Ok(previous),
            other => Err(unexpected(other)),
        }
    }

    /// Returns the status the order went back to.
    #[instrument(skip(self))]
    pub async fn resume_after_failed_payment(&self, id: OrderId) -> Result<OrderStatus, OrderError> {
        match self.act(id, OrderAction::ResumeAfterFailedPayment).await? {
            OrderActionResult::ResumeAfterFailedPayment(status) => Ok(status),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self, deducted), fields(ingredients = deducted.len()))]
    pub async fn complete(
        &self,
        id: OrderId,
        payment_id: PaymentId,
        deducted: Vec<StockMovement>,
    ) -> Result<(), OrderError> {
        match self
            .act(
                id,
                OrderAction::Complete {
                    payment_id,
                    deducted,
                },
            )
            .await?
        {
            OrderActionResult::Complete(()) => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Cancels the order. `Some` carries the movements to restock.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<Option<Vec<StockMovement>>, OrderError> {
        match self.act(id, OrderAction::Cancel).await? {
            OrderActionResult::Cancel(restock) => Ok(restock),
            other => Err(unexpected(other)),
        }
    }

    async fn list(
        &self,
        predicate: impl Fn(&Order) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.inner.find(predicate).await.map_err(Self::map_error)?;
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(orders)
    }

    /// Orders the kitchen still has to work on (`New` or `Processing`), oldest first.
    pub async fn pending_orders(&self) -> Result<Vec<Order>, OrderError> {
        self.list(|order| matches!(order.status, OrderStatus::New | OrderStatus::Processing))
            .await
    }

    pub async fn ready_orders(&self) -> Result<Vec<Order>, OrderError> {
        self.list(|order| order.status == OrderStatus::Ready).await
    }

    /// Orders on `table` that still keep it occupied.
    pub async fn active_on_table(&self, table: TableId) -> Result<Vec<Order>, OrderError> {
        self.list(move |order| order.table_id == table && order.status.is_active())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_action};

    #[tokio::test]
    async fn test_invalid_transition_survives_the_channel() {
        let (client, mut receiver) = create_mock_client::<Order>(10);
        let orders = OrderClient::new(client);

        let task = tokio::spawn(async move { orders.cancel(OrderId(3)).await });

        let (id, action, responder) = expect_action(&mut receiver).await.unwrap();
        assert_eq!(id, OrderId(3));
        assert!(matches!(action, OrderAction::Cancel));
        let refusal = OrderError::InvalidTransition {
            order: OrderId(3),
            from: OrderStatus::AwaitingPayment,
            action: "cancel",
        };
        responder
            .send(Err(FrameworkError::EntityError(Box::new(refusal.clone()))))
            .unwrap();

        assert_eq!(task.await.unwrap().unwrap_err(), refusal);
    }

    #[tokio::test]
    async fn test_closed_actor_is_a_communication_error() {
        let (client, receiver) = create_mock_client::<Order>(10);
        drop(receiver);
        let orders = OrderClient::new(client);

        assert!(matches!(
            orders.advance(OrderId(1)).await,
            Err(OrderError::ActorCommunicationError(_))
        ));
    }
}

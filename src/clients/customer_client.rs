//! # Customer Client
//!
//! Raw access to the Customer actor. Point arithmetic is done by
//! [`LoyaltyLedger`](crate::loyalty::LoyaltyLedger), which wraps this client.
use crate::clients::recover;
use crate::customer_actor::{CustomerAction, CustomerActionResult, CustomerError};
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{Customer, CustomerCreate, CustomerId, CustomerUpdate, MembershipTier};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Customer actor.
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<Customer>,
}

impl CustomerClient {
    pub fn new(inner: ResourceClient<Customer>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Customer> for CustomerClient {
    type Error = CustomerError;

    fn inner(&self) -> &ResourceClient<Customer> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        recover(e, CustomerError::NotFound)
    }
}

impl CustomerClient {
    #[instrument(skip(self))]
    pub async fn create_customer(&self, params: CustomerCreate) -> Result<CustomerId, CustomerError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn require(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        self.get(id.clone())
            .await?
            .ok_or_else(|| CustomerError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_customer(
        &self,
        id: CustomerId,
        update: CustomerUpdate,
    ) -> Result<Customer, CustomerError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Sends a loyalty action and returns its result.
    #[instrument(skip(self))]
    pub async fn apply(
        &self,
        id: CustomerId,
        action: CustomerAction,
    ) -> Result<CustomerActionResult, CustomerError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    /// Looks a customer up by phone number.
    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, CustomerError> {
        let phone = phone.to_string();
        let found = self
            .inner
            .find(move |customer: &Customer| customer.phone == phone)
            .await
            .map_err(Self::map_error)?;
        Ok(found.into_iter().next())
    }

    /// Customers whose name or email contains `term` (ignoring case) or whose phone
    /// contains it verbatim, ordered by id.
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<Customer>, CustomerError> {
        let needle = term.trim().to_lowercase();
        let mut found = self
            .inner
            .find(move |customer: &Customer| {
                customer.name.to_lowercase().contains(&needle)
                    || customer.phone.contains(&needle)
                    || customer
                        .email
                        .as_deref()
                        .is_some_and(|email| email.to_lowercase().contains(&needle))
            })
            .await
            .map_err(Self::map_error)?;
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    /// Every customer, ordered by id.
    #[instrument(skip(self))]
    pub async fn all(&self) -> Result<Vec<Customer>, CustomerError> {
        let mut customers = self
            .inner
            .find(|_: &Customer| true)
            .await
            .map_err(Self::map_error)?;
        customers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(customers)
    }

    #[instrument(skip(self))]
    pub async fn by_tier(&self, tier: MembershipTier) -> Result<Vec<Customer>, CustomerError> {
        let mut customers = self
            .inner
            .find(move |customer: &Customer| customer.tier == tier)
            .await
            .map_err(Self::map_error)?;
        customers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(customers)
    }
}

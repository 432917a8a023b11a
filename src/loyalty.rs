//! # Loyalty Ledger
//!
//! Turns money into points and points into discounts, and applies the results to the
//! Customer actor.
//!
//! With the default policy one point is earned per 100 currency units paid and each
//! redeemed point is worth 0.01. Tiers follow cumulative spend; see
//! [`TierThresholds`](crate::model::TierThresholds).

use crate::clients::CustomerClient;
use crate::customer_actor::{CustomerAction, CustomerActionResult, CustomerError};
use crate::model::{Customer, CustomerCreate, CustomerId, MembershipTier, PaymentId};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// Exchange rates between money and points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoyaltyPolicy {
    /// Currency units paid per point earned.
    pub amount_per_point: Decimal,
    /// Discount granted per point redeemed.
    pub point_value: Decimal,
}

impl Default for LoyaltyPolicy {
    fn default() -> Self {
        Self {
            amount_per_point: Decimal::from(100),
            point_value: Decimal::new(1, 2),
        }
    }
}

/// `floor(amount / amount_per_point)`; zero for non-positive amounts.
pub fn points_from_amount(amount: Decimal, amount_per_point: Decimal) -> u32 {
    if amount <= Decimal::ZERO || amount_per_point <= Decimal::ZERO {
        return 0;
    }
    (amount / amount_per_point)
        .floor()
        .to_u32()
        .unwrap_or(u32::MAX)
}

/// Membership totals across every registered customer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MembershipStatistics {
    pub customers: usize,
    pub by_tier: BTreeMap<MembershipTier, usize>,
    /// Points earned and not yet redeemed.
    pub outstanding_points: u64,
    pub total_spent: Decimal,
}

#[derive(Clone)]
pub struct LoyaltyLedger {
    customers: CustomerClient,
    policy: LoyaltyPolicy,
}

impl LoyaltyLedger {
    pub fn new(customers: CustomerClient, policy: LoyaltyPolicy) -> Self {
        Self { customers, policy }
    }

    pub fn customers(&self) -> &CustomerClient {
        &self.customers
    }

    pub fn policy(&self) -> LoyaltyPolicy {
        self.policy
    }

    pub fn points_from_amount(&self, amount: Decimal) -> u32 {
        points_from_amount(amount, self.policy.amount_per_point)
    }

    pub fn discount_for(&self, points: u32) -> Decimal {
        Decimal::from(points) * self.policy.point_value
    }

    /// Registers a new customer. The customer actor rejects a phone number that is
    /// already registered.
    #[instrument(skip(self, params), fields(phone = %params.phone))]
    pub async fn register_customer(
        &self,
        params: CustomerCreate,
    ) -> Result<CustomerId, CustomerError> {
        let id = self.customers.create_customer(params).await?;
        info!(customer = %id, "Customer registered");
        Ok(id)
    }

    pub async fn require_customer(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        self.customers.require(id).await
    }

    /// Credits a purchase. Returns the new point balance.
    #[instrument(skip(self))]
    pub async fn accrue(
        &self,
        customer: CustomerId,
        points: u32,
        spend: Decimal,
        payment: PaymentId,
    ) -> Result<u32, CustomerError> {
        let action = CustomerAction::Accrue {
            points,
            spend,
            payment,
        };
        balance(self.customers.apply(customer, action).await?)
    }

    /// Reverses an earlier [`accrue`](Self::accrue) with the same arguments.
    #[instrument(skip(self))]
    pub async fn revoke_accrual(
        &self,
        customer: CustomerId,
        points: u32,
        spend: Decimal,
        payment: PaymentId,
    ) -> Result<u32, CustomerError> {
        let action = CustomerAction::RevokeAccrual {
            points,
            spend,
            payment,
        };
        balance(self.customers.apply(customer, action).await?)
    }

    /// Redeems `points` against `payment`. Returns the discount they are worth.
    #[instrument(skip(self))]
    pub async fn consume(
        &self,
        customer: CustomerId,
        points: u32,
        payment: PaymentId,
    ) -> Result<Decimal, CustomerError> {
        let discount = self.discount_for(points);
        let action = CustomerAction::Consume {
            points,
            discount,
            payment,
        };
        self.customers.apply(customer, action).await?;
        Ok(discount)
    }

    /// Gives back points redeemed against `payment`.
    #[instrument(skip(self))]
    pub async fn refund_points(
        &self,
        customer: CustomerId,
        points: u32,
        payment: PaymentId,
    ) -> Result<u32, CustomerError> {
        let action = CustomerAction::RefundPoints { points, payment };
        balance(self.customers.apply(customer, action).await?)
    }

    #[instrument(skip(self))]
    pub async fn membership_statistics(&self) -> Result<MembershipStatistics, CustomerError> {
        let customers = self.customers.all().await?;
        let mut stats = MembershipStatistics {
            customers: customers.len(),
            ..MembershipStatistics::default()
        };
        for customer in &customers {
            *stats.by_tier.entry(customer.tier).or_default() += 1;
            stats.outstanding_points += u64::from(customer.points);
            stats.total_spent += customer.total_spent;
        }
        Ok(stats)
    }

    #[instrument(skip(self))]
    pub async fn recompute_tier(&self, customer: CustomerId) -> Result<MembershipTier, CustomerError> {
        match self
            .customers
            .apply(customer, CustomerAction::RecomputeTier)
            .await?
        {
            CustomerActionResult::RecomputeTier(tier) => Ok(tier),
            other => Err(unexpected(other)),
        }
    }
}

fn balance(result: CustomerActionResult) -> Result<u32, CustomerError> {
    match result {
        CustomerActionResult::Accrue(points)
        | CustomerActionResult::RevokeAccrual(points)
        | CustomerActionResult::Consume(points)
        | CustomerActionResult::RefundPoints(points) => Ok(points),
        other => Err(unexpected(other)),
    }
}

fn unexpected(result: CustomerActionResult) -> CustomerError {
    CustomerError::ActorCommunicationError(format!("unexpected action result {result:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;
    use crate::framework::{ActorEntity, FrameworkError};

    fn member(id: u32, tier: MembershipTier, points: u32, spent: i64) -> Customer {
        let mut customer = Customer::from_create_params(
            CustomerId(id),
            CustomerCreate {
                name: format!("Member {id}"),
                phone: format!("09000000{id:02}"),
                email: None,
            },
        )
        .unwrap();
        customer.tier = tier;
        customer.points = points;
        customer.total_spent = Decimal::from(spent);
        customer
    }

    #[test]
    fn test_points_are_floored() {
        let per_point = Decimal::from(100);
        assert_eq!(points_from_amount(Decimal::new(999, 1), per_point), 0);
        assert_eq!(points_from_amount(Decimal::from(100), per_point), 1);
        assert_eq!(points_from_amount(Decimal::new(45_099, 1), per_point), 45);
        assert_eq!(points_from_amount(Decimal::from(-500), per_point), 0);
    }

    #[tokio::test]
    async fn test_consume_reports_discount() {
        let mut mock = MockClient::<Customer>::new();
        mock.expect_action(CustomerId(1))
            .return_ok(CustomerActionResult::Consume(20));

        let ledger = LoyaltyLedger::new(CustomerClient::new(mock.client()), LoyaltyPolicy::default());
        let discount = ledger.consume(CustomerId(1), 30, PaymentId(1)).await.unwrap();
        assert_eq!(discount, Decimal::new(30, 2));
        mock.verify();
    }

    #[tokio::test]
    async fn test_insufficient_points_is_recovered() {
        let mut mock = MockClient::<Customer>::new();
        let refusal = CustomerError::InsufficientPoints {
            customer: CustomerId(1),
            requested: 30,
            available: 5,
        };
        mock.expect_action(CustomerId(1))
            .return_err(FrameworkError::EntityError(Box::new(refusal.clone())));

        let ledger = LoyaltyLedger::new(CustomerClient::new(mock.client()), LoyaltyPolicy::default());
        assert_eq!(
            ledger.consume(CustomerId(1), 30, PaymentId(1)).await.unwrap_err(),
            refusal
        );
    }

    #[tokio::test]
    async fn test_membership_statistics_counts_tiers_and_points() {
        let mut mock = MockClient::<Customer>::new();
        mock.expect_find().return_ok(vec![
            member(1, MembershipTier::Bronze, 120, 12_000),
            member(2, MembershipTier::Gold, 50_000, 5_000_000),
            member(3, MembershipTier::Bronze, 0, 0),
        ]);

        let ledger = LoyaltyLedger::new(CustomerClient::new(mock.client()), LoyaltyPolicy::default());
        let stats = ledger.membership_statistics().await.unwrap();

        assert_eq!(stats.customers, 3);
        assert_eq!(stats.by_tier.get(&MembershipTier::Bronze), Some(&2));
        assert_eq!(stats.by_tier.get(&MembershipTier::Gold), Some(&1));
        assert_eq!(stats.by_tier.get(&MembershipTier::Diamond), None);
        assert_eq!(stats.outstanding_points, 50_120);
        assert_eq!(stats.total_spent, Decimal::from(5_012_000));
        mock.verify();
    }
}

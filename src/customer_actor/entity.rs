//! [`ActorEntity`] implementation for [`Customer`].
//!
//! The actor is started with the shop's [`TierThresholds`] as its context, so tier
//! recomputation never needs to be told where the boundaries are.

use super::actions::{CustomerAction, CustomerActionResult};
use super::error::CustomerError;
use crate::framework::ActorEntity;
use crate::model::{
    Customer, CustomerCreate, CustomerId, CustomerUpdate, MembershipTier, Redemption,
    TierThresholds,
};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

#[async_trait]
impl ActorEntity for Customer {
    type Id = CustomerId;
    type Create = CustomerCreate;
    type Update = CustomerUpdate;
    type Action = CustomerAction;
    type ActionResult = CustomerActionResult;
    type Context = TierThresholds;
    type Error = CustomerError;

    fn from_create_params(id: CustomerId, params: CustomerCreate) -> Result<Self, Self::Error> {
        validate_contact(&params.name, &params.phone)?;
        let now = Utc::now();
        Ok(Self {
            id,
            name: params.name,
            phone: params.phone,
            email: params.email,
            points: 0,
            total_spent: Decimal::ZERO,
            total_orders: 0,
            tier: MembershipTier::Bronze,
            joined_at: now,
            updated_at: now,
            redemptions: Vec::new(),
        })
    }

    async fn on_update(
        &mut self,
        update: CustomerUpdate,
        _ctx: &TierThresholds,
    ) -> Result<(), Self::Error> {
        let name = update.name.unwrap_or_else(|| self.name.clone());
        let phone = update.phone.unwrap_or_else(|| self.phone.clone());
        validate_contact(&name, &phone)?;
        self.name = name;
        self.phone = phone;
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn check_unique(&self, other: &Customer) -> Result<(), Self::Error> {
        if self.phone.trim() == other.phone.trim() {
            return Err(CustomerError::ValidationError(format!(
                "phone {} is already registered to {}",
                self.phone, other.id
            )));
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CustomerAction,
        thresholds: &TierThresholds,
    ) -> Result<CustomerActionResult, Self::Error> {
        let result = match action {
            CustomerAction::Accrue { points, spend, .. } => {
                self.points = self.points.saturating_add(points);
                self.total_spent += spend;
                self.total_orders += 1;
                CustomerActionResult::Accrue(self.points)
            }
            CustomerAction::RevokeAccrual { points, spend, .. } => {
                self.points = self.points.saturating_sub(points);
                self.total_spent = (self.total_spent - spend).max(Decimal::ZERO);
                self.total_orders = self.total_orders.saturating_sub(1);
                CustomerActionResult::RevokeAccrual(self.points)
            }
            CustomerAction::Consume {
                points,
                discount,
                payment,
            } => {
                if points == 0 {
                    return Err(CustomerError::ValidationError(
                        "redeemed points must be positive".into(),
                    ));
                }
                if self.points < points {
                    return Err(CustomerError::InsufficientPoints {
                        customer: self.id.clone(),
                        requested: points,
                        available: self.points,
                    });
                }
                self.points -= points;
                self.redemptions.push(Redemption {
                    payment_id: payment,
                    points,
                    discount,
                    redeemed_at: Utc::now(),
                });
                CustomerActionResult::Consume(self.points)
            }
            CustomerAction::RefundPoints { points, payment } => {
                self.points = self.points.saturating_add(points);
                self.redemptions.retain(|r| r.payment_id != payment);
                CustomerActionResult::RefundPoints(self.points)
            }
            CustomerAction::RecomputeTier => {
                let tier = thresholds.tier_for(self.total_spent);
                if tier != self.tier {
                    debug!(customer = %self.id, from = %self.tier, to = %tier, "Tier changed");
                    self.tier = tier;
                }
                CustomerActionResult::RecomputeTier(tier)
            }
        };
        self.updated_at = Utc::now();
        Ok(result)
    }
}

fn validate_contact(name: &str, phone: &str) -> Result<(), CustomerError> {
    if name.trim().is_empty() {
        return Err(CustomerError::ValidationError("name must not be empty".into()));
    }
    if phone.trim().is_empty() {
        return Err(CustomerError::ValidationError("phone must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PaymentId;

    fn customer() -> Customer {
        Customer::from_create_params(
            CustomerId(1),
            CustomerCreate {
                name: "Linh".to_string(),
                phone: "0900000000".to_string(),
                email: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_phone_must_be_unique() {
        let first = customer();
        let mut second = customer();
        second.id = CustomerId(2);
        second.phone = " 0900000000".to_string();
        assert!(matches!(
            second.check_unique(&first),
            Err(CustomerError::ValidationError(_))
        ));

        second.phone = "0900000001".to_string();
        assert!(second.check_unique(&first).is_ok());
    }

    #[tokio::test]
    async fn test_consume_more_than_balance_fails() {
        let mut customer = customer();
        let thresholds = TierThresholds::default();
        customer
            .handle_action(
                CustomerAction::Accrue {
                    points: 50,
                    spend: Decimal::from(5_000),
                    payment: PaymentId(1),
                },
                &thresholds,
            )
            .await
            .unwrap();

        let result = customer
            .handle_action(
                CustomerAction::Consume {
                    points: 51,
                    discount: Decimal::new(51, 2),
                    payment: PaymentId(2),
                },
                &thresholds,
            )
            .await;
        assert_eq!(
            result,
            Err(CustomerError::InsufficientPoints {
                customer: CustomerId(1),
                requested: 51,
                available: 50
            })
        );
    }

    #[tokio::test]
    async fn test_refund_drops_the_redemption() {
        let mut customer = customer();
        customer.points = 10;
        let thresholds = TierThresholds::default();
        customer
            .handle_action(
                CustomerAction::Consume {
                    points: 10,
                    discount: Decimal::new(10, 2),
                    payment: PaymentId(3),
                },
                &thresholds,
            )
            .await
            .unwrap();
        assert_eq!(customer.points, 0);
        assert_eq!(customer.redemptions.len(), 1);

        customer
            .handle_action(
                CustomerAction::RefundPoints {
                    points: 10,
                    payment: PaymentId(3),
                },
                &thresholds,
            )
            .await
            .unwrap();
        assert_eq!(customer.points, 10);
        assert!(customer.redemptions.is_empty());
    }

    #[tokio::test]
    async fn test_recompute_tier_is_idempotent() {
        let mut customer = customer();
        customer.total_spent = Decimal::from(5_000_000);
        let thresholds = TierThresholds::default();
        for _ in 0..2 {
            let result = customer
                .handle_action(CustomerAction::RecomputeTier, &thresholds)
                .await
                .unwrap();
            assert_eq!(result, CustomerActionResult::RecomputeTier(MembershipTier::Gold));
        }
    }

    #[tokio::test]
    async fn test_revoke_undoes_accrual() {
        let mut customer = customer();
        let thresholds = TierThresholds::default();
        let accrue = CustomerAction::Accrue {
            points: 7,
            spend: Decimal::from(700),
            payment: PaymentId(1),
        };
        let revoke = CustomerAction::RevokeAccrual {
            points: 7,
            spend: Decimal::from(700),
            payment: PaymentId(1),
        };
        customer.handle_action(accrue, &thresholds).await.unwrap();
        customer.handle_action(revoke, &thresholds).await.unwrap();
        assert_eq!(customer.points, 0);
        assert_eq!(customer.total_spent, Decimal::ZERO);
        assert_eq!(customer.total_orders, 0);
    }
}

//! Loyalty customers, membership tiers and point redemptions.
use crate::model::PaymentId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

entity_id!(
    /// Type-safe identifier for Customers.
    CustomerId,
    "customer"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MembershipTier {
    Bronze,
    Silver,
    Gold,
    Diamond,
}

impl Display for MembershipTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MembershipTier::Bronze => "Bronze",
            MembershipTier::Silver => "Silver",
            MembershipTier::Gold => "Gold",
            MembershipTier::Diamond => "Diamond",
        };
        f.write_str(name)
    }
}

/// Minimum cumulative spend for each tier above Bronze.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub silver: Decimal,
    pub gold: Decimal,
    pub diamond: Decimal,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            silver: Decimal::from(1_000_000),
            gold: Decimal::from(5_000_000),
            diamond: Decimal::from(10_000_000),
        }
    }
}

impl TierThresholds {
    pub fn tier_for(&self, total_spent: Decimal) -> MembershipTier {
        if total_spent >= self.diamond {
            MembershipTier::Diamond
        } else if total_spent >= self.gold {
            MembershipTier::Gold
        } else if total_spent >= self.silver {
            MembershipTier::Silver
        } else {
            MembershipTier::Bronze
        }
    }
}

/// Points spent against a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redemption {
    pub payment_id: PaymentId,
    pub points: u32,
    pub discount: Decimal,
    pub redeemed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub points: u32,
    pub total_spent: Decimal,
    pub total_orders: u32,
    pub tier: MembershipTier,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub redemptions: Vec<Redemption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        let thresholds = TierThresholds::default();
        assert_eq!(thresholds.tier_for(Decimal::from(999_999)), MembershipTier::Bronze);
        assert_eq!(thresholds.tier_for(Decimal::from(1_000_000)), MembershipTier::Silver);
        assert_eq!(thresholds.tier_for(Decimal::from(5_000_000)), MembershipTier::Gold);
        assert_eq!(thresholds.tier_for(Decimal::from(10_000_000)), MembershipTier::Diamond);
    }
}

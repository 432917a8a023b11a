//! Runtime configuration.

use crate::loyalty::LoyaltyPolicy;
use crate::model::TierThresholds;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}")]
    Unparsable { key: &'static str, value: String },

    #[error("{key}: {reason}")]
    OutOfRange { key: &'static str, reason: String },
}

/// Point-of-sale configuration.
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | POS_ACTOR_BUFFER | 32 | mpsc buffer of every actor |
/// | POS_COMMIT_ATTEMPTS | 3 | tries for a unit of work that hits a busy order |
/// | POS_RETRY_BACKOFF_MS | 25 | base backoff between those tries |
/// | POS_AMOUNT_PER_POINT | 100 | currency units per loyalty point |
/// | POS_POINT_VALUE | 0.01 | discount per redeemed point |
/// | POS_TIER_SILVER | 1000000 | cumulative spend for Silver |
/// | POS_TIER_GOLD | 5000000 | cumulative spend for Gold |
/// | POS_TIER_DIAMOND | 10000000 | cumulative spend for Diamond |
///
/// ```ignore
/// POS_COMMIT_ATTEMPTS=5 RUST_LOG=debug cargo run
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PosConfig {
    pub actor_buffer: usize,
    pub commit_attempts: u32,
    pub retry_backoff: Duration,
    pub loyalty: LoyaltyPolicy,
    pub tiers: TierThresholds,
}

impl Default for PosConfig {
    fn default() -> Self {
        Self {
            actor_buffer: 32,
            commit_attempts: 3,
            retry_backoff: Duration::from_millis(25),
            loyalty: LoyaltyPolicy::default(),
            tiers: TierThresholds::default(),
        }
    }
}

impl PosConfig {
    /// Defaults overridden by any `POS_*` variable that is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an arbitrary source of values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            actor_buffer: read(&lookup, "POS_ACTOR_BUFFER")?.unwrap_or(defaults.actor_buffer),
            commit_attempts: read(&lookup, "POS_COMMIT_ATTEMPTS")?
                .unwrap_or(defaults.commit_attempts),
            retry_backoff: read(&lookup, "POS_RETRY_BACKOFF_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_backoff),
            loyalty: LoyaltyPolicy {
                amount_per_point: read(&lookup, "POS_AMOUNT_PER_POINT")?
                    .unwrap_or(defaults.loyalty.amount_per_point),
                point_value: read(&lookup, "POS_POINT_VALUE")?
                    .unwrap_or(defaults.loyalty.point_value),
            },
            tiers: TierThresholds {
                silver: read(&lookup, "POS_TIER_SILVER")?.unwrap_or(defaults.tiers.silver),
                gold: read(&lookup, "POS_TIER_GOLD")?.unwrap_or(defaults.tiers.gold),
                diamond: read(&lookup, "POS_TIER_DIAMOND")?.unwrap_or(defaults.tiers.diamond),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.actor_buffer == 0 {
            return Err(out_of_range("POS_ACTOR_BUFFER", "must be at least 1"));
        }
        if self.commit_attempts == 0 {
            return Err(out_of_range("POS_COMMIT_ATTEMPTS", "must be at least 1"));
        }
        if self.loyalty.amount_per_point <= Decimal::ZERO {
            return Err(out_of_range("POS_AMOUNT_PER_POINT", "must be positive"));
        }
        if self.loyalty.point_value < Decimal::ZERO {
            return Err(out_of_range("POS_POINT_VALUE", "must not be negative"));
        }
        let tiers = &self.tiers;
        if !(Decimal::ZERO < tiers.silver && tiers.silver <= tiers.gold && tiers.gold <= tiers.diamond)
        {
            return Err(out_of_range(
                "POS_TIER_SILVER",
                "tier thresholds must be positive and ascending",
            ));
        }
        Ok(())
    }
}

fn read<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Unparsable { key, value }),
    }
}

fn out_of_range(key: &'static str, reason: &str) -> ConfigError {
    ConfigError::OutOfRange {
        key,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        assert_eq!(PosConfig::from_lookup(lookup(&[])).unwrap(), PosConfig::default());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = PosConfig::from_lookup(lookup(&[
            ("POS_COMMIT_ATTEMPTS", "5"),
            ("POS_RETRY_BACKOFF_MS", "10"),
            ("POS_POINT_VALUE", "0.5"),
        ]))
        .unwrap();
        assert_eq!(config.commit_attempts, 5);
        assert_eq!(config.retry_backoff, Duration::from_millis(10));
        assert_eq!(config.loyalty.point_value, Decimal::new(5, 1));
        assert_eq!(config.actor_buffer, 32);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(
            PosConfig::from_lookup(lookup(&[("POS_ACTOR_BUFFER", "many")])),
            Err(ConfigError::Unparsable {
                key: "POS_ACTOR_BUFFER",
                value: "many".to_string()
            })
        );
    }

    #[test]
    fn test_descending_tiers_are_rejected() {
        let result = PosConfig::from_lookup(lookup(&[("POS_TIER_GOLD", "500")]));
        assert!(matches!(result, Err(ConfigError::OutOfRange { .. })));
    }
}

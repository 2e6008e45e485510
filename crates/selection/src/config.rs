//! Pricing configuration overrides.
//!
//! The binary fills [`PricingOverrides`] from flags or `MERCHANTDESK_*` variables;
//! anything left unset keeps the [`PricingPolicy::default`] value.

use thiserror::Error;

use merchantdesk_core::Money;

use crate::pricing::PricingPolicy;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid pricing configuration: {0}")]
    Invalid(String),
}

/// Optional replacements for the default pricing knobs, amounts in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PricingOverrides {
    pub tax_rate_bps: Option<u32>,
    pub free_shipping_threshold: Option<u64>,
    pub flat_shipping_fee: Option<u64>,
}

impl PricingOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl PricingPolicy {
    /// Defaults with every set field of `overrides` applied, then validated.
    pub fn with_overrides(overrides: PricingOverrides) -> Result<Self, ConfigError> {
        let mut policy = PricingPolicy::default();

        if let Some(bps) = overrides.tax_rate_bps {
            policy.tax_rate_bps = bps;
        }
        if let Some(minor) = overrides.free_shipping_threshold {
            policy.free_shipping_threshold = Money::from_minor(minor);
        }
        if let Some(minor) = overrides.flat_shipping_fee {
            policy.flat_shipping_fee = Money::from_minor(minor);
        }

        policy
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_overrides_gives_defaults() {
        let overrides = PricingOverrides::default();
        assert!(overrides.is_empty());

        let policy = PricingPolicy::with_overrides(overrides).unwrap();
        assert_eq!(policy, PricingPolicy::default());
    }

    #[test]
    fn overrides_are_applied() {
        let policy = PricingPolicy::with_overrides(PricingOverrides {
            tax_rate_bps: Some(750),
            free_shipping_threshold: Some(10_000),
            flat_shipping_fee: Some(499),
        })
        .unwrap();
        assert_eq!(policy.tax_rate_bps, 750);
        assert_eq!(policy.free_shipping_threshold, Money::from_minor(10_000));
        assert_eq!(policy.flat_shipping_fee, Money::from_minor(499));
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let policy = PricingPolicy::with_overrides(PricingOverrides {
            flat_shipping_fee: Some(0),
            ..PricingOverrides::default()
        })
        .unwrap();
        let defaults = PricingPolicy::default();
        assert_eq!(policy.tax_rate_bps, defaults.tax_rate_bps);
        assert_eq!(policy.free_shipping_threshold, defaults.free_shipping_threshold);
        assert!(policy.flat_shipping_fee.is_zero());
    }

    #[test]
    fn tax_over_one_hundred_percent_is_invalid() {
        let err = PricingPolicy::with_overrides(PricingOverrides {
            tax_rate_bps: Some(20_000),
            ..PricingOverrides::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}

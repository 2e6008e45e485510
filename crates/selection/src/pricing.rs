//! Derived totals: subtotal, tax, shipping, total.

use serde::{Deserialize, Serialize};

use merchantdesk_core::{BPS_SCALE, DomainError, DomainResult, Money, ValueObject};

/// Tax and shipping parameters used to derive totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Tax rate in basis points (1800 = 18%).
    pub tax_rate_bps: u32,
    /// Subtotals strictly above this ship for free.
    pub free_shipping_threshold: Money,
    pub flat_shipping_fee: Money,
}

impl ValueObject for PricingPolicy {}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate_bps: 1_800,
            free_shipping_threshold: Money::from_major(500),
            flat_shipping_fee: Money::from_major(50),
        }
    }
}

impl PricingPolicy {
    pub fn new(
        tax_rate_bps: u32,
        free_shipping_threshold: Money,
        flat_shipping_fee: Money,
    ) -> DomainResult<Self> {
        let policy = Self {
            tax_rate_bps,
            free_shipping_threshold,
            flat_shipping_fee,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.tax_rate_bps > BPS_SCALE {
            return Err(DomainError::validation("tax rate cannot exceed 100%"));
        }
        Ok(())
    }

    /// Flat fee unless the subtotal is strictly above the threshold.
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal > self.free_shipping_threshold {
            Money::ZERO
        } else {
            self.flat_shipping_fee
        }
    }

    /// Totals for `(unit_price, quantity)` pairs.
    pub fn totals<I>(&self, lines: I) -> DomainResult<DerivedTotals>
    where
        I: IntoIterator<Item = (Money, u32)>,
    {
        let mut subtotal = Money::ZERO;
        for (unit_price, quantity) in lines {
            let line_total = unit_price
                .checked_mul(quantity)
                .ok_or_else(|| DomainError::invariant("line total overflow"))?;
            subtotal = subtotal
                .checked_add(line_total)
                .ok_or_else(|| DomainError::invariant("subtotal overflow"))?;
        }

        let tax = subtotal.apply_rate_bps(self.tax_rate_bps);
        let shipping = self.shipping_for(subtotal);
        let total = subtotal
            .checked_add(tax)
            .and_then(|m| m.checked_add(shipping))
            .ok_or_else(|| DomainError::invariant("total overflow"))?;

        Ok(DerivedTotals {
            subtotal,
            tax,
            shipping,
            total,
        })
    }
}

/// Output of [`PricingPolicy::totals`]. Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

impl ValueObject for DerivedTotals {}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(minor: u64) -> Money {
        Money::from_minor(minor)
    }

    #[test]
    fn three_units_at_one_hundred() {
        let totals = PricingPolicy::default()
            .totals([(Money::from_major(100), 3)])
            .unwrap();
        assert_eq!(totals.subtotal, Money::from_major(300));
        assert_eq!(totals.tax, Money::from_major(54));
        assert_eq!(totals.shipping, Money::from_major(50));
        assert_eq!(totals.total, Money::from_major(404));
    }

    #[test]
    fn threshold_is_strict() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.shipping_for(usd(50_000)), Money::from_major(50));
        assert_eq!(policy.shipping_for(usd(50_001)), Money::ZERO);
    }

    #[test]
    fn empty_lines_still_pay_shipping() {
        let totals = PricingPolicy::default().totals(std::iter::empty()).unwrap();
        assert_eq!(totals.subtotal, Money::ZERO);
        assert_eq!(totals.tax, Money::ZERO);
        assert_eq!(totals.shipping, Money::from_major(50));
        assert_eq!(totals.total, Money::from_major(50));
    }

    #[test]
    fn sums_multiple_lines() {
        let totals = PricingPolicy::default()
            .totals([(usd(1_999), 2), (usd(4_550), 1)])
            .unwrap();
        // 39.98 + 45.50 = 85.48; tax 15.3864 -> 15.39
        assert_eq!(totals.subtotal, usd(8_548));
        assert_eq!(totals.tax, usd(1_539));
        assert_eq!(totals.total, usd(8_548 + 1_539 + 5_000));
    }

    #[test]
    fn overflow_is_reported() {
        let err = PricingPolicy::default()
            .totals([(usd(u64::MAX), 2)])
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn totals_serialize_as_minor_units() {
        let totals = PricingPolicy::default()
            .totals([(Money::from_major(100), 3)])
            .unwrap();
        let json = serde_json::to_value(totals).unwrap();
        assert_eq!(json["subtotal"], 30_000);
        assert_eq!(json["total"], 40_400);
    }

    #[test]
    fn tax_above_one_hundred_percent_is_invalid() {
        assert!(PricingPolicy::new(10_001, Money::ZERO, Money::ZERO).is_err());
        assert!(PricingPolicy::new(0, Money::ZERO, Money::ZERO).is_ok());
    }
}

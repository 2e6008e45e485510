//! Value objects: equality by value, not identity.

use serde::{Deserialize, Serialize};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Basis points in one whole (100%).
pub const BPS_SCALE: u32 = 10_000;

/// Monetary amount in minor currency units (e.g. cents).
///
/// Single-currency: the dashboard prices everything in the store currency, so no
/// currency code is carried. Arithmetic is checked; callers decide what overflow means.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Whole currency units (e.g. dollars). Saturates at `u64::MAX` minor units.
    pub const fn from_major(major: u64) -> Self {
        Self(major.saturating_mul(100))
    }

    pub const fn minor_units(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Line amount: unit price times quantity.
    pub fn checked_mul(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(u64::from(quantity)).map(Money)
    }

    /// Proportional amount at `bps` basis points, rounded half-up to the minor unit.
    pub fn apply_rate_bps(self, bps: u32) -> Money {
        let scaled = (u128::from(self.0) * u128::from(bps) + u128::from(BPS_SCALE / 2))
            / u128::from(BPS_SCALE);
        Money(u64::try_from(scaled).unwrap_or(u64::MAX))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn eighteen_percent_of_three_hundred() {
        let tax = Money::from_major(300).apply_rate_bps(1800);
        assert_eq!(tax, Money::from_major(54));
    }

    #[test]
    fn rate_rounds_half_up() {
        // 0.18 * 0.25 = 0.045 -> 0.05
        assert_eq!(Money::from_minor(25).apply_rate_bps(1800), Money::from_minor(5));
        // 0.18 * 0.02 = 0.0036 -> 0.00
        assert_eq!(Money::from_minor(2).apply_rate_bps(1800), Money::ZERO);
    }

    #[test]
    fn display_pads_cents() {
        assert_eq!(Money::from_minor(40_400).to_string(), "404.00");
        assert_eq!(Money::from_minor(50_001).to_string(), "500.01");
        assert_eq!(Money::from_minor(7).to_string(), "0.07");
    }

    #[test]
    fn major_units_convert_to_cents() {
        assert_eq!(Money::from_major(404).minor_units(), 40_400);
        assert!(Money::ZERO.is_zero());
        assert!(Money::from_major(0).is_zero());
        assert!(!Money::from_minor(1).is_zero());
    }

    #[test]
    fn checked_arithmetic_detects_overflow() {
        assert_eq!(Money::from_minor(u64::MAX).checked_add(Money::from_minor(1)), None);
        assert_eq!(Money::from_minor(u64::MAX).checked_mul(2), None);
        assert_eq!(Money::from_minor(150).checked_mul(3), Some(Money::from_minor(450)));
    }

    #[test]
    fn serializes_as_bare_minor_units() {
        let json = serde_json::to_string(&Money::from_minor(1234)).unwrap();
        assert_eq!(json, "1234");
    }

    proptest! {
        /// Property: a rate never yields more than the base amount when <= 100%.
        #[test]
        fn rate_at_most_whole(amount in 0u64..1_000_000_000_000u64, bps in 0u32..=BPS_SCALE) {
            let base = Money::from_minor(amount);
            prop_assert!(base.apply_rate_bps(bps) <= base);
        }
    }
}

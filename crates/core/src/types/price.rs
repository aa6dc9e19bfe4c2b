//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::status::SubscriptionType;

/// A non-negative amount in US dollars.
///
/// Serialized as a bare JSON number, matching the backend's `BigDecimal`
/// columns and the cart entries kept in the client store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, clamping negative amounts to zero.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(amount.max(Decimal::ZERO))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2))
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price shown for a subscription option, rounded to cents.
    ///
    /// Always computed from the stored base price; the result is never
    /// written back, so repeated rendering cannot compound the discount.
    #[must_use]
    pub fn adjusted_for(self, kind: SubscriptionType) -> Self {
        Self(
            (self.0 * kind.multiplier())
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Accept both `12.5` and `"12.5"`; older cart entries stored strings.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        };
        let amount = text
            .trim()
            .parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(text.trim()))
            .map_err(serde::de::Error::custom)?;
        Ok(Self::new(amount))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(1999).to_string(), "$19.99");
        assert_eq!(Price::from_cents(10000).to_string(), "$100.00");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_adjusted_prices() {
        let base = Price::from_cents(10000);
        assert_eq!(base.adjusted_for(SubscriptionType::OneTime), base);
        assert_eq!(
            base.adjusted_for(SubscriptionType::Weekly),
            Price::from_cents(8500)
        );
        assert_eq!(
            base.adjusted_for(SubscriptionType::Biweekly),
            Price::from_cents(9300)
        );
    }

    #[test]
    fn test_adjusted_rounds_to_cents() {
        // 45.99 * 0.85 = 39.0915
        let adjusted = Price::from_cents(4599).adjusted_for(SubscriptionType::Weekly);
        assert_eq!(adjusted, Price::from_cents(3909));
    }

    #[test]
    fn test_negative_clamped() {
        assert_eq!(Price::new(Decimal::new(-5, 0)), Price::ZERO);
    }

    #[test]
    fn test_serde_number_and_string() {
        let p: Price = serde_json::from_str("45.5").unwrap();
        assert_eq!(p, Price::from_cents(4550));
        let p: Price = serde_json::from_str("\"12.00\"").unwrap();
        assert_eq!(p, Price::from_cents(1200));
        assert_eq!(serde_json::to_string(&Price::from_cents(1250)).unwrap(), "12.5");
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_cents(100), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(350));
    }
}

//! Subscription type and its price multiplier table.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How often a subscribed service is performed.
///
/// Serialized the way the backend stores it (`ONE_TIME`, `WEEKLY`, `BIWEEKLY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionType {
    #[default]
    OneTime,
    Weekly,
    Biweekly,
}

impl SubscriptionType {
    /// All subscription types in display order.
    pub const ALL: [Self; 3] = [Self::OneTime, Self::Weekly, Self::Biweekly];

    /// Multiplier applied to a base price when displaying this option.
    ///
    /// `ONE_TIME` ×1.00, `WEEKLY` ×0.85, `BIWEEKLY` ×0.93.
    #[must_use]
    pub const fn multiplier(self) -> Decimal {
        match self {
            Self::OneTime => Decimal::ONE,
            Self::Weekly => Decimal::from_parts(85, 0, 0, false, 2),
            Self::Biweekly => Decimal::from_parts(93, 0, 0, false, 2),
        }
    }

    /// Wire name as the backend spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneTime => "ONE_TIME",
            Self::Weekly => "WEEKLY",
            Self::Biweekly => "BIWEEKLY",
        }
    }

    /// Human label, e.g. `ONE TIME`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneTime => "ONE TIME",
            Self::Weekly => "WEEKLY",
            Self::Biweekly => "BIWEEKLY",
        }
    }
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionType {
    type Err = String;

    /// Accepts the wire names as well as the option values used on the
    /// service selection form (`one-time`, `weekly`, `bi-weekly`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "one-time" | "onetime" => Ok(Self::OneTime),
            "weekly" => Ok(Self::Weekly),
            "bi-weekly" | "biweekly" => Ok(Self::Biweekly),
            other => Err(format!("unknown subscription type: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&SubscriptionType::OneTime).unwrap(),
            "\"ONE_TIME\""
        );
        assert_eq!(
            serde_json::from_str::<SubscriptionType>("\"BIWEEKLY\"").unwrap(),
            SubscriptionType::Biweekly
        );
    }

    #[test]
    fn test_parse_form_values() {
        assert_eq!(
            "bi-weekly".parse::<SubscriptionType>().unwrap(),
            SubscriptionType::Biweekly
        );
        assert_eq!(
            "ONE_TIME".parse::<SubscriptionType>().unwrap(),
            SubscriptionType::OneTime
        );
        assert!("monthly".parse::<SubscriptionType>().is_err());
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(SubscriptionType::OneTime.multiplier(), Decimal::ONE);
        assert_eq!(SubscriptionType::Weekly.multiplier().to_string(), "0.85");
        assert_eq!(SubscriptionType::Biweekly.multiplier().to_string(), "0.93");
    }
}

use crate::error::OrderError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Decides whether `match` requires the book to be crossed before trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossPolicy {
    /// Trade only while the best bid price is at or above the best offer price
    #[default]
    RequireCross,
    /// Trade whenever both sides hold an order, regardless of price
    Unconditional,
}

impl CrossPolicy {
    /// Whether a best bid at `bid` may trade against a best offer at `offer`.
    pub fn permits(self, bid: Decimal, offer: Decimal) -> bool {
        match self {
            CrossPolicy::RequireCross => bid >= offer,
            CrossPolicy::Unconditional => true,
        }
    }
}

impl FromStr for CrossPolicy {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "require_cross" => Ok(CrossPolicy::RequireCross),
            "unconditional" => Ok(CrossPolicy::Unconditional),
            _ => Err(OrderError::UnknownCrossPolicy(s.to_string())),
        }
    }
}

/// Per-book settings. Missing fields fall back to their defaults.
///
/// ## Examples
///
/// ```
/// use order_match::{BookConfig, CrossPolicy};
///
/// let config = BookConfig::default();
/// assert_eq!(config.cross_policy, CrossPolicy::RequireCross);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub cross_policy: CrossPolicy,
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the side of an order in the book.
///
/// - `Buy` orders rest on the bid queue
/// - `Sell` orders rest on the offer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy side: traders willing to purchase at or below a given price
    Buy,
    /// Sell side: traders willing to sell at or above a given price
    Sell,
}

impl Side {
    /// Returns the side an order of this side trades against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// The order type requested by the submitting party.
///
/// Only `Limit` orders take part in the matching path today; `Market` is
/// carried so the gateway can decode it and decide what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderType {
    #[default]
    Limit,
    Market,
}

/// Lifecycle status of an order.
///
/// Cancellation and a full fill both leave an order with zero open quantity;
/// the status is what tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted, nothing executed yet
    #[default]
    New,
    /// Some, but not all, of the quantity has executed
    PartiallyFilled,
    /// The whole original quantity has executed
    Filled,
    /// Forced closed by a cancel request
    Canceled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::New => write!(f, "NEW"),
            OrderStatus::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Canceled => write!(f, "CANCELED"),
        }
    }
}

/// Insertion timestamp: nanoseconds since the owning book's clock started.
///
/// See `MonotonicClock` for the ordering guarantee.
pub type Timestamp = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_side() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_display() {
        assert_eq!(Side::Buy.to_string(), "BUY");
        assert_eq!(OrderStatus::PartiallyFilled.to_string(), "PARTIALLY_FILLED");
    }
}

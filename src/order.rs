use crate::error::{OrderError, OrderResult};
use crate::types::{OrderStatus, OrderType, Side, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;

/// A single order, either resting in a book or on its way in.
///
/// Identity and reporting fields are public. Price and quantity are fixed by
/// [`Order::limit`], which rejects non-positive values, and the execution
/// bookkeeping is only changed through [`Order::execute`] and
/// [`Order::cancel`], so `executed_quantity` can never exceed `quantity`.
///
/// ```compile_fail
/// use order_match::{Decimal, Order, Side};
///
/// let mut order = Order::limit("B1", "ACME", Side::Buy, Decimal::from(100), Decimal::from(5)).unwrap();
/// order.quantity = Decimal::ZERO;
/// ```
///
/// Orders are not deserializable either, so `limit` is the only way in:
///
/// ```compile_fail
/// use order_match::Order;
///
/// let order: Order = serde_json::from_str("{}").unwrap();
/// ```
///
/// Clones are independent snapshots: the book hands clones back to callers and
/// keeps the live order to itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Client-assigned identifier, unique per submitting party
    pub id: String,
    /// Instrument the order is for
    pub symbol: String,
    /// Originator identifier, used only for reporting
    pub sender_comp_id: String,
    /// Counterparty identifier, used only for reporting
    pub target_comp_id: String,
    /// Whether this is a buy or sell order
    pub side: Side,
    /// Requested order type; only limit orders rest and match
    pub order_type: OrderType,
    price: Decimal,
    quantity: Decimal,
    executed_quantity: Decimal,
    /// Set only by `cancel`, forcing the open quantity to zero
    open_override: Option<Decimal>,
    /// Exact sum of price * quantity over every execution, `None` once it overflowed
    executed_notional: Option<Decimal>,
    average_price: Decimal,
    last_executed_price: Decimal,
    last_executed_quantity: Decimal,
    inserted_at: Option<Timestamp>,
    status: OrderStatus,
}

impl Order {
    /// Creates a new limit order.
    ///
    /// ## Errors
    ///
    /// Returns `OrderError::InvalidQuantity` if `quantity <= 0` and
    /// `OrderError::InvalidPrice` if `price <= 0`.
    ///
    /// ## Examples
    ///
    /// ```
    /// use order_match::{Order, OrderStatus, Side};
    /// use rust_decimal::Decimal;
    ///
    /// let order = Order::limit("B1", "ACME", Side::Buy, Decimal::new(10000, 2), Decimal::from(10)).unwrap();
    /// assert_eq!(order.open_quantity(), Decimal::from(10));
    /// assert_eq!(order.status(), OrderStatus::New);
    /// ```
    pub fn limit(
        id: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        price: Decimal,
        quantity: Decimal,
    ) -> OrderResult<Self> {
        if quantity <= Decimal::ZERO {
            return Err(OrderError::InvalidQuantity(quantity));
        }
        if price <= Decimal::ZERO {
            return Err(OrderError::InvalidPrice(price));
        }

        Ok(Self {
            id: id.into(),
            symbol: symbol.into(),
            sender_comp_id: String::new(),
            target_comp_id: String::new(),
            side,
            order_type: OrderType::Limit,
            price,
            quantity,
            executed_quantity: Decimal::ZERO,
            open_override: None,
            executed_notional: Some(Decimal::ZERO),
            average_price: Decimal::ZERO,
            last_executed_price: Decimal::ZERO,
            last_executed_quantity: Decimal::ZERO,
            inserted_at: None,
            status: OrderStatus::New,
        })
    }

    /// Sets the originator identifier.
    pub fn with_sender_comp_id(mut self, sender_comp_id: impl Into<String>) -> Self {
        self.sender_comp_id = sender_comp_id.into();
        self
    }

    /// Sets the counterparty identifier.
    pub fn with_target_comp_id(mut self, target_comp_id: impl Into<String>) -> Self {
        self.target_comp_id = target_comp_id.into();
        self
    }

    /// Quantity still open: original minus executed, or zero once cancelled.
    pub fn open_quantity(&self) -> Decimal {
        match self.open_override {
            Some(open) => open,
            None => self.quantity - self.executed_quantity,
        }
    }

    /// An order is closed when nothing is left open, whether by fills or by cancel.
    pub fn is_closed(&self) -> bool {
        self.open_quantity().is_zero()
    }

    /// Records an execution of `quantity` at `price`.
    ///
    /// ## Panics
    ///
    /// Panics unless `0 < quantity <= open_quantity()`. The matching loop never
    /// asks for more than is open, so hitting this is a bug in the caller.
    pub fn execute(&mut self, price: Decimal, quantity: Decimal) {
        assert!(
            quantity > Decimal::ZERO,
            "order {}: execution quantity {} must be positive",
            self.id,
            quantity
        );
        assert!(
            quantity <= self.open_quantity(),
            "order {}: execution quantity {} exceeds open quantity {}",
            self.id,
            quantity,
            self.open_quantity()
        );

        // Bounded by the original quantity, so this cannot overflow.
        let executed = self.executed_quantity + quantity;
        let notional = self
            .executed_notional
            .and_then(|total| price.checked_mul(quantity)?.checked_add(total));
        let average_price = notional
            .and_then(|total| total.checked_div(executed))
            .unwrap_or_else(|| self.weighted_average(price, quantity, executed));

        self.executed_quantity = executed;
        self.executed_notional = notional;
        self.average_price = average_price;
        self.last_executed_price = price;
        self.last_executed_quantity = quantity;
        self.status = if self.is_closed() {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
    }

    /// Running average that never multiplies two large values: both weights
    /// are at most one. Used once the exact notional no longer fits.
    fn weighted_average(&self, price: Decimal, quantity: Decimal, executed: Decimal) -> Decimal {
        let previous_weight = self.executed_quantity.checked_div(executed);
        let fill_weight = quantity.checked_div(executed);
        previous_weight
            .zip(fill_weight)
            .and_then(|(previous_weight, fill_weight)| {
                self.average_price
                    .checked_mul(previous_weight)?
                    .checked_add(price.checked_mul(fill_weight)?)
            })
            .unwrap_or(price)
    }

    /// Forces the open quantity to zero without touching the executed quantity.
    pub fn cancel(&mut self) {
        self.open_override = Some(Decimal::ZERO);
        self.status = OrderStatus::Canceled;
    }

    /// Limit price
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Original quantity
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn executed_quantity(&self) -> Decimal {
        self.executed_quantity
    }

    pub fn last_executed_price(&self) -> Decimal {
        self.last_executed_price
    }

    pub fn last_executed_quantity(&self) -> Decimal {
        self.last_executed_quantity
    }

    /// Volume-weighted average execution price, zero if nothing has executed.
    pub fn average_price(&self) -> Decimal {
        self.average_price
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// When the order entered a book, or `None` if it never has.
    pub fn inserted_at(&self) -> Option<Timestamp> {
        self.inserted_at
    }

    /// Stamps the insertion time. Only the book does this, exactly once.
    pub(crate) fn stamp(&mut self, timestamp: Timestamp) {
        assert!(
            self.inserted_at.is_none(),
            "order {} was already inserted at {:?}",
            self.id,
            self.inserted_at
        );
        self.inserted_at = Some(timestamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn buy(quantity: Decimal) -> Order {
        Order::limit("B1", "ACME", Side::Buy, dec!(100.00), quantity).unwrap()
    }

    #[test]
    fn test_rejects_non_positive_quantity_and_price() {
        assert_eq!(
            Order::limit("B1", "ACME", Side::Buy, dec!(100), dec!(0)),
            Err(OrderError::InvalidQuantity(dec!(0)))
        );
        assert_eq!(
            Order::limit("B1", "ACME", Side::Buy, dec!(-1), dec!(5)),
            Err(OrderError::InvalidPrice(dec!(-1)))
        );
    }

    #[test]
    fn test_partial_then_full_execution() {
        let mut order = buy(dec!(10));

        order.execute(dec!(99.00), dec!(4));
        assert_eq!(order.open_quantity(), dec!(6));
        assert_eq!(order.executed_quantity(), dec!(4));
        assert_eq!(order.last_executed_price(), dec!(99.00));
        assert_eq!(order.last_executed_quantity(), dec!(4));
        assert_eq!(order.status(), OrderStatus::PartiallyFilled);
        assert!(!order.is_closed());

        order.execute(dec!(100.00), dec!(6));
        assert!(order.is_closed());
        assert_eq!(order.status(), OrderStatus::Filled);
        assert_eq!(order.last_executed_quantity(), dec!(6));
    }

    #[test]
    fn test_average_price_is_volume_weighted() {
        let mut order = buy(dec!(10));
        assert_eq!(order.average_price(), dec!(0));

        order.execute(dec!(99), dec!(5));
        order.execute(dec!(101), dec!(5));
        assert_eq!(order.average_price(), dec!(100));
    }

    #[test]
    fn test_extreme_magnitudes_keep_quantity_bookkeeping() {
        let huge = Decimal::from(10i64.pow(15));
        let mut order = Order::limit("B1", "ACME", Side::Buy, huge, huge * dec!(2)).unwrap();

        // price * quantity is 1e30, past what a Decimal can hold
        order.execute(huge, huge);
        assert_eq!(order.executed_quantity(), huge);
        assert_eq!(order.average_price(), huge);

        order.execute(huge * dec!(3), huge);
        assert!(order.is_closed());
        assert_eq!(order.status(), OrderStatus::Filled);
        assert_eq!(order.average_price(), huge * dec!(2));
    }

    #[test]
    fn test_cancel_forces_open_to_zero_and_keeps_executed() {
        let mut order = buy(dec!(10));
        order.execute(dec!(100), dec!(3));

        order.cancel();

        assert_eq!(order.open_quantity(), dec!(0));
        assert_eq!(order.executed_quantity(), dec!(3));
        assert!(order.is_closed());
        assert_eq!(order.status(), OrderStatus::Canceled);
    }

    #[test]
    fn test_fractional_quantities_stay_exact() {
        let mut order = buy(dec!(0.3));
        order.execute(dec!(100), dec!(0.1));
        order.execute(dec!(100), dec!(0.2));
        assert!(order.is_closed(), "0.1 + 0.2 must close a 0.3 order exactly");
    }

    #[test]
    #[should_panic(expected = "exceeds open quantity")]
    fn test_overfill_panics() {
        let mut order = buy(dec!(10));
        order.execute(dec!(100), dec!(11));
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_zero_execution_panics() {
        let mut order = buy(dec!(10));
        order.execute(dec!(100), dec!(0));
    }

    #[test]
    #[should_panic(expected = "exceeds open quantity")]
    fn test_execute_after_cancel_panics() {
        let mut order = buy(dec!(10));
        order.cancel();
        order.execute(dec!(100), dec!(1));
    }

    #[test]
    #[should_panic(expected = "already inserted")]
    fn test_double_stamp_panics() {
        let mut order = buy(dec!(10));
        order.stamp(1);
        order.stamp(2);
    }
}

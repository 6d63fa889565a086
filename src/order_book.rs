use crate::clock::MonotonicClock;
use crate::config::BookConfig;
use crate::order::Order;
use crate::price_time_queue::PriceTimeQueue;
use crate::types::Side;
use rust_decimal::Decimal;
use std::fmt;
use tracing::{debug, trace, warn};

/// The book for a single instrument: one bid queue and one offer queue.
///
/// This structure is responsible only for:
///
/// - Keeping resting orders in price-time priority on each side
/// - Cancelling resting orders by id
/// - Crossing the best bid against the best offer on request
///
/// Inserting never matches. The caller inserts, then calls
/// [`OrderBook::match_orders`] to drain every trade the book now allows.
///
/// ### Thread Safety
///
/// Every operation runs to completion without suspending. When shared, the
/// whole book goes behind one lock (see `OrderMatcher`), since matching and
/// cancelling both need a consistent view of both sides.
#[derive(Debug)]
pub struct OrderBook {
    symbol: String,
    config: BookConfig,
    clock: MonotonicClock,
    /// Buy orders: highest price first
    bids: PriceTimeQueue,
    /// Sell orders: lowest price first
    offers: PriceTimeQueue,
}

impl OrderBook {
    /// Creates an empty book with the default configuration.
    ///
    /// ## Examples
    ///
    /// ```
    /// use order_match::OrderBook;
    ///
    /// let order_book = OrderBook::new("ACME");
    /// assert!(order_book.is_empty());
    /// ```
    pub fn new(symbol: impl Into<String>) -> Self {
        Self::with_config(symbol, BookConfig::default())
    }

    /// Creates an empty book using `config`.
    pub fn with_config(symbol: impl Into<String>, config: BookConfig) -> Self {
        OrderBook {
            symbol: symbol.into(),
            config,
            clock: MonotonicClock::new(),
            bids: PriceTimeQueue::new(Side::Buy),
            offers: PriceTimeQueue::new(Side::Sell),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Stamps the order's insertion time and rests it on its side.
    ///
    /// No matching happens here.
    ///
    /// ## Panics
    ///
    /// Panics if the order was already stamped by a book.
    ///
    /// ## Examples
    ///
    /// ```
    /// use order_match::{Order, OrderBook, Side};
    /// use rust_decimal::Decimal;
    ///
    /// let mut order_book = OrderBook::new("ACME");
    /// let order = Order::limit("B1", "ACME", Side::Buy, Decimal::new(10050, 2), Decimal::from(100)).unwrap();
    /// order_book.insert(order);
    ///
    /// assert_eq!(order_book.best_bid(), Some(Decimal::new(10050, 2)));
    /// assert_eq!(order_book.best_offer(), None);
    /// ```
    pub fn insert(&mut self, mut order: Order) {
        order.stamp(self.clock.now());

        debug!(
            symbol = %self.symbol,
            order_id = %order.id,
            side = %order.side,
            price = %order.price(),
            quantity = %order.quantity(),
            "Inserting order"
        );

        self.queue_mut(order.side).insert(order);
    }

    /// Removes the order `id` from `side` and returns it cancelled.
    ///
    /// Only the given side is searched. `None` means no such order rests
    /// there, and the book is left untouched.
    pub fn cancel(&mut self, id: &str, side: Side) -> Option<Order> {
        let Some(mut order) = self.queue_mut(side).remove_by_id(id) else {
            warn!(symbol = %self.symbol, order_id = %id, side = %side, "Cancel for unknown order");
            return None;
        };

        order.cancel();
        debug!(
            symbol = %self.symbol,
            order_id = %order.id,
            side = %side,
            executed = %order.executed_quantity(),
            "Cancelled order"
        );

        Some(order)
    }

    /// Crosses the best bid against the best offer until no more trades are possible.
    ///
    /// Each trade executes at the best offer's price for the smaller of the two
    /// open quantities, so at least one side closes per trade and the loop runs
    /// at most once per resting order. Closed orders leave the book.
    ///
    /// Returns snapshots of both orders after every trade, bid first. Under
    /// `CrossPolicy::RequireCross` matching stops as soon as the best bid is
    /// below the best offer.
    ///
    /// ## Examples
    ///
    /// ```
    /// use order_match::{Order, OrderBook, Side};
    /// use rust_decimal::Decimal;
    ///
    /// let mut order_book = OrderBook::new("ACME");
    /// order_book.insert(Order::limit("B1", "ACME", Side::Buy, Decimal::from(100), Decimal::from(10)).unwrap());
    /// order_book.insert(Order::limit("S1", "ACME", Side::Sell, Decimal::from(99), Decimal::from(10)).unwrap());
    ///
    /// let executions = order_book.match_orders();
    /// assert_eq!(executions.len(), 2);
    /// assert_eq!(executions[0].last_executed_price(), Decimal::from(99));
    /// assert!(order_book.is_empty());
    /// ```
    pub fn match_orders(&mut self) -> Vec<Order> {
        let resting_at_start = self.len();
        let mut executions = Vec::new();
        let mut iterations = 0;

        while let (Some(bid), Some(offer)) = (self.bids.best_mut(), self.offers.best_mut()) {
            if !self.config.cross_policy.permits(bid.price(), offer.price()) {
                break;
            }

            let price = offer.price();
            let quantity = bid.open_quantity().min(offer.open_quantity());

            bid.execute(price, quantity);
            offer.execute(price, quantity);

            trace!(
                symbol = %self.symbol,
                bid_id = %bid.id,
                offer_id = %offer.id,
                price = %price,
                quantity = %quantity,
                "Matched"
            );

            executions.push(bid.clone());
            executions.push(offer.clone());

            let (bid_closed, offer_closed) = (bid.is_closed(), offer.is_closed());
            if bid_closed {
                self.bids.pop_best();
            }
            if offer_closed {
                self.offers.pop_best();
            }

            iterations += 1;
            debug_assert!(
                iterations <= resting_at_start,
                "matching ran {iterations} times over {resting_at_start} resting orders"
            );
        }

        if iterations > 0 {
            debug!(
                symbol = %self.symbol,
                trades = iterations,
                bids = self.bids.len(),
                offers = self.offers.len(),
                "Matching complete"
            );
        }

        executions
    }

    /// Best bid price, if any.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.peek_best().map(|order| order.price())
    }

    /// Best offer price, if any.
    pub fn best_offer(&self) -> Option<Decimal> {
        self.offers.peek_best().map(|order| order.price())
    }

    /// Returns `(best_bid, best_offer)`; either is `None` when its side is empty.
    pub fn compute_spread(&self) -> (Option<Decimal>, Option<Decimal>) {
        (self.best_bid(), self.best_offer())
    }

    /// Best offer minus best bid, when both sides are present.
    pub fn spread(&self) -> Option<Decimal> {
        match self.compute_spread() {
            (Some(bid), Some(offer)) => Some(offer - bid),
            _ => None,
        }
    }

    /// True when both sides are present and the best bid is at or above the best offer.
    pub fn is_crossed(&self) -> bool {
        matches!(self.compute_spread(), (Some(bid), Some(offer)) if bid >= offer)
    }

    pub fn bids(&self) -> &PriceTimeQueue {
        &self.bids
    }

    pub fn offers(&self) -> &PriceTimeQueue {
        &self.offers
    }

    pub fn queue(&self, side: Side) -> &PriceTimeQueue {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.offers,
        }
    }

    fn queue_mut(&mut self, side: Side) -> &mut PriceTimeQueue {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.offers,
        }
    }

    /// Number of resting orders at exactly `price` on `side`.
    pub fn orders_at_price(&self, price: Decimal, side: Side) -> usize {
        self.queue(side).orders_at_price(price)
    }

    /// Total resting orders across both sides.
    pub fn len(&self) -> usize {
        self.bids.len() + self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.offers.is_empty()
    }

    /// Diagnostic dump of both sides in priority order.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BIDS:")?;
        writeln!(f, "-----")?;
        for order in self.bids.iter() {
            write_order(f, order)?;
        }
        writeln!(f)?;
        writeln!(f, "OFFERS:")?;
        writeln!(f, "-------")?;
        for order in self.offers.iter() {
            write_order(f, order)?;
        }
        Ok(())
    }
}

fn write_order(f: &mut fmt::Formatter<'_>, order: &Order) -> fmt::Result {
    writeln!(
        f,
        "{} {} {} @ {} (executed {}, {})",
        order.id,
        order.side,
        order.open_quantity(),
        order.price(),
        order.executed_quantity(),
        order.status()
    )
}

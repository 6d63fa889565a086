use crate::config::BookConfig;
use crate::order::Order;
use crate::order_book::OrderBook;
use crate::types::Side;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// One `OrderBook` per symbol, each behind its own lock.
///
/// ## Thread Safety
///
/// A book is only ever touched while holding its `Mutex`, which makes every
/// insert, cancel and match on one symbol a single exclusive operation.
/// Books for different symbols never share a lock, so they can be driven
/// concurrently. The symbol map is behind a `RwLock` that is only held for
/// writing while a new symbol's book is created.
#[derive(Debug, Default)]
pub struct OrderMatcher {
    config: BookConfig,
    books: RwLock<HashMap<String, Arc<Mutex<OrderBook>>>>,
}

impl OrderMatcher {
    /// Creates a matcher whose books use the default configuration.
    ///
    /// ## Examples
    ///
    /// ```
    /// use order_match::{Order, OrderMatcher, Side};
    /// use rust_decimal::Decimal;
    ///
    /// let matcher = OrderMatcher::new();
    /// matcher.insert(Order::limit("B1", "ACME", Side::Buy, Decimal::from(100), Decimal::from(5)).unwrap());
    /// matcher.insert(Order::limit("S1", "ACME", Side::Sell, Decimal::from(100), Decimal::from(5)).unwrap());
    ///
    /// assert_eq!(matcher.match_symbol("ACME").len(), 2);
    /// assert!(matcher.match_symbol("OTHER").is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_config(BookConfig::default())
    }

    /// Creates a matcher whose books all use `config`.
    pub fn with_config(config: BookConfig) -> Self {
        OrderMatcher {
            config,
            books: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the book for `symbol`, if any order for it was ever inserted.
    pub fn book(&self, symbol: &str) -> Option<Arc<Mutex<OrderBook>>> {
        self.books.read().get(symbol).cloned()
    }

    fn book_or_create(&self, symbol: &str) -> Arc<Mutex<OrderBook>> {
        if let Some(book) = self.book(symbol) {
            return book;
        }

        let mut books = self.books.write();
        Arc::clone(books.entry(symbol.to_string()).or_insert_with(|| {
            info!(symbol = %symbol, "Opening order book");
            Arc::new(Mutex::new(OrderBook::with_config(symbol, self.config)))
        }))
    }

    /// Inserts into the book for the order's symbol, creating it on first use.
    pub fn insert(&self, order: Order) {
        let book = self.book_or_create(&order.symbol);
        book.lock().insert(order);
    }

    /// Runs the matching loop for `symbol`. Unknown symbols produce no executions.
    pub fn match_symbol(&self, symbol: &str) -> Vec<Order> {
        let Some(book) = self.book(symbol) else {
            return Vec::new();
        };
        let executions = book.lock().match_orders();
        executions
    }

    /// Cancels `id` on `side` of the book for `symbol`.
    pub fn cancel(&self, id: &str, symbol: &str, side: Side) -> Option<Order> {
        self.book(symbol)?.lock().cancel(id, side)
    }

    /// All symbols with a book, sorted.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.books.read().keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Lists the known symbols, one per line.
    pub fn display(&self) -> String {
        let mut out = String::from("SYMBOLS:\n--------\n");
        for symbol in self.symbols() {
            out.push_str(&symbol);
            out.push('\n');
        }
        out
    }

    /// Diagnostic dump of the book for `symbol`.
    pub fn display_market(&self, symbol: &str) -> Option<String> {
        let book = self.book(symbol)?;
        let dump = book.lock().display();
        Some(dump)
    }
}

//! A continuous double-auction matching engine with price-time priority.
//!
//! ## Architecture
//!
//! The engine is split into small pieces, leaves first:
//!
//! 1. `Order`: a single order with exact decimal quantities and its execution bookkeeping
//! 2. `PriceTimeQueue`: the resting orders of one side, best first
//! 3. `OrderBook`: one bid queue and one offer queue for one instrument, with
//!    insert, cancel and the matching loop
//! 4. `OrderMatcher`: one locked `OrderBook` per symbol
//!
//! The caller decodes requests into `Order`s, inserts them, and then calls
//! `match_orders`, which drains every trade the book allows and returns
//! snapshots of the orders involved. `ExecutionReport` turns those snapshots
//! into outbound reports.
//!
//! ## Example Usage
//!
//! ```rust
//! use order_match::{Order, OrderBook, Side};
//! use rust_decimal::Decimal;
//!
//! let mut order_book = OrderBook::new("ACME");
//!
//! // Rest a bid for 5 at 100.00, then an offer for 10 at 100.00
//! order_book.insert(Order::limit("B1", "ACME", Side::Buy, Decimal::new(10000, 2), Decimal::from(5)).unwrap());
//! order_book.insert(Order::limit("S1", "ACME", Side::Sell, Decimal::new(10000, 2), Decimal::from(10)).unwrap());
//!
//! let executions = order_book.match_orders();
//! assert_eq!(executions.len(), 2);
//!
//! // The bid is filled and gone, the offer rests with 5 open
//! assert!(order_book.bids().is_empty());
//! assert_eq!(order_book.offers().peek_best().unwrap().open_quantity(), Decimal::from(5));
//! ```
//!
//! Trades always print at the resting offer's price, for the smaller of the
//! two open quantities. Prices and quantities are `Decimal`, so no binary
//! floating point is involved anywhere.
//!
//! Logging goes through `tracing`; the library never installs a subscriber.

mod clock;
mod config;
mod error;
mod order;
mod order_book;
mod order_matcher;
mod price_time_queue;
mod report;
mod types;

// Re-export public API
pub use clock::MonotonicClock;
pub use config::{BookConfig, CrossPolicy};
pub use error::{OrderError, OrderResult};
pub use order::Order;
pub use order_book::OrderBook;
pub use order_matcher::OrderMatcher;
pub use price_time_queue::PriceTimeQueue;
pub use report::{ExecIdGenerator, ExecType, ExecutionReport, SequentialExecIdGenerator};
pub use types::{OrderStatus, OrderType, Side, Timestamp};

// Re-export commonly used external dependencies
pub use parking_lot::Mutex;
pub use rust_decimal::Decimal;

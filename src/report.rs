//! Translation of order snapshots into execution reports.
//!
//! The engine never pushes anything; whoever drives it inserts, matches and
//! then turns each returned snapshot into a report here. Reports are
//! protocol-neutral, so encoding them for the wire is left to the caller.

use crate::order::Order;
use crate::types::{OrderStatus, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out execution ids. Owned by the reporting side, not by the book.
pub trait ExecIdGenerator {
    fn next_exec_id(&self) -> String;
}

/// Yields "1", "2", "3", ... Safe to share between threads.
#[derive(Debug, Default)]
pub struct SequentialExecIdGenerator {
    last: AtomicU64,
}

impl SequentialExecIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continues numbering after `last`.
    pub fn starting_after(last: u64) -> Self {
        SequentialExecIdGenerator {
            last: AtomicU64::new(last),
        }
    }
}

impl ExecIdGenerator for SequentialExecIdGenerator {
    fn next_exec_id(&self) -> String {
        (self.last.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

/// What happened to the order to trigger the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecType {
    New,
    PartialFill,
    Fill,
    Canceled,
}

/// A single outbound execution report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub order_id: String,
    pub exec_id: String,
    pub exec_type: ExecType,
    pub order_status: OrderStatus,
    pub symbol: String,
    pub side: Side,
    pub order_quantity: Decimal,
    /// Open quantity after this event
    pub leaves_quantity: Decimal,
    pub cumulative_quantity: Decimal,
    pub average_price: Decimal,
    /// Present on fill reports only
    pub last_price: Option<Decimal>,
    /// Present on fill reports only
    pub last_quantity: Option<Decimal>,
    /// Reply direction: the order's target becomes the sender
    pub sender_comp_id: String,
    pub target_comp_id: String,
}

impl ExecutionReport {
    fn build(
        order: &Order,
        ids: &dyn ExecIdGenerator,
        exec_type: ExecType,
        order_status: OrderStatus,
    ) -> Self {
        let filled = matches!(exec_type, ExecType::PartialFill | ExecType::Fill);

        ExecutionReport {
            order_id: order.id.clone(),
            exec_id: ids.next_exec_id(),
            exec_type,
            order_status,
            symbol: order.symbol.clone(),
            side: order.side,
            order_quantity: order.quantity(),
            leaves_quantity: order.open_quantity(),
            cumulative_quantity: order.executed_quantity(),
            average_price: order.average_price(),
            last_price: filled.then(|| order.last_executed_price()),
            last_quantity: filled.then(|| order.last_executed_quantity()),
            sender_comp_id: order.target_comp_id.clone(),
            target_comp_id: order.sender_comp_id.clone(),
        }
    }

    /// Acknowledges a newly accepted order.
    pub fn accepted(order: &Order, ids: &dyn ExecIdGenerator) -> Self {
        Self::build(order, ids, ExecType::New, OrderStatus::New)
    }

    /// Reports an execution snapshot returned by `match_orders`.
    ///
    /// The status is FILLED if the snapshot is closed, PARTIALLY_FILLED otherwise.
    pub fn fill(order: &Order, ids: &dyn ExecIdGenerator) -> Self {
        if order.is_closed() {
            Self::build(order, ids, ExecType::Fill, OrderStatus::Filled)
        } else {
            Self::build(order, ids, ExecType::PartialFill, OrderStatus::PartiallyFilled)
        }
    }

    /// Reports an order removed by cancel.
    pub fn canceled(order: &Order, ids: &dyn ExecIdGenerator) -> Self {
        Self::build(order, ids, ExecType::Canceled, OrderStatus::Canceled)
    }
}

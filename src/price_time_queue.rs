use crate::order::Order;
use crate::types::{Side, Timestamp};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Sort key for a resting order. Smaller keys have higher priority.
///
/// `rank` is the price for offers and the negated price for bids, so that a
/// single ascending `BTreeMap` serves both sides. Decimal negation is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PriorityKey {
    rank: Decimal,
    inserted_at: Timestamp,
}

impl PriorityKey {
    fn new(side: Side, price: Decimal, inserted_at: Timestamp) -> Self {
        let rank = match side {
            Side::Buy => -price,
            Side::Sell => price,
        };
        PriorityKey { rank, inserted_at }
    }
}

/// The resting orders of one side of one instrument, in price-time priority.
///
/// - Bids: highest price first, then earliest insertion
/// - Offers: lowest price first, then earliest insertion
///
/// Insertion and removal are $O(\log{N})$: the `BTreeMap` keeps the priority
/// order and a side index maps order ids to their keys for removal by id.
///
/// The queue owns its orders. Callers only ever see shared references or the
/// removed order itself.
#[derive(Debug, Clone)]
pub struct PriceTimeQueue {
    side: Side,
    orders: BTreeMap<PriorityKey, Order>,
    index: HashMap<String, PriorityKey>,
}

impl PriceTimeQueue {
    /// Creates an empty queue for `side`.
    pub fn new(side: Side) -> Self {
        PriceTimeQueue {
            side,
            orders: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Inserts an order at its price-time position.
    ///
    /// Ids must be unique within the queue; the queue does not deduplicate.
    ///
    /// ## Panics
    ///
    /// Panics if the order belongs to the other side or has not been stamped
    /// with an insertion time.
    pub fn insert(&mut self, order: Order) {
        assert_eq!(
            order.side, self.side,
            "order {} sent to the {} queue",
            order.id, self.side
        );
        let Some(inserted_at) = order.inserted_at() else {
            panic!("order {} has no insertion timestamp", order.id);
        };
        debug_assert!(
            !self.index.contains_key(&order.id),
            "duplicate order id {} in {} queue",
            order.id,
            self.side
        );

        let key = PriorityKey::new(self.side, order.price(), inserted_at);
        self.index.insert(order.id.clone(), key);
        self.orders.insert(key, order);
    }

    /// Removes and returns the order with `id`, or `None` if it is not here.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Order> {
        let key = self.index.remove(id)?;
        self.orders.remove(&key)
    }

    /// The highest-priority order, without removing it.
    pub fn peek_best(&self) -> Option<&Order> {
        self.orders.first_key_value().map(|(_, order)| order)
    }

    /// Removes and returns the highest-priority order.
    pub fn pop_best(&mut self) -> Option<Order> {
        let (_, order) = self.orders.pop_first()?;
        self.index.remove(&order.id);
        Some(order)
    }

    /// Mutable access to the head of the queue for the matching loop.
    ///
    /// The price and id must not be changed through this reference, since
    /// they determine the order's key.
    pub(crate) fn best_mut(&mut self) -> Option<&mut Order> {
        self.orders.values_mut().next()
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.index.get(id).and_then(|key| self.orders.get(key))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Orders in priority order, best first.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of resting orders at exactly `price`.
    pub fn orders_at_price(&self, price: Decimal) -> usize {
        self.orders.values().filter(|order| order.price() == price).count()
    }
}

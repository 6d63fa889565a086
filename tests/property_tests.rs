use order_match::{Decimal, Order, OrderBook, PriceTimeQueue, Side};
use proptest::prelude::*;
use std::collections::HashMap;

/// (side, price in cents, whole quantity)
fn order_requests() -> impl Strategy<Value = Vec<(Side, i64, i64)>> {
    prop::collection::vec(
        (
            prop_oneof![Just(Side::Buy), Just(Side::Sell)],
            9_900i64..10_100,
            1i64..20,
        ),
        0..60,
    )
}

fn build_book(requests: &[(Side, i64, i64)]) -> OrderBook {
    let mut order_book = OrderBook::new("ACME");
    for (index, (side, cents, quantity)) in requests.iter().enumerate() {
        let order = Order::limit(
            format!("O{index}"),
            "ACME",
            *side,
            Decimal::new(*cents, 2),
            Decimal::from(*quantity),
        )
        .unwrap();
        order_book.insert(order);
    }
    order_book
}

fn assert_priority_order(queue: &PriceTimeQueue) {
    let orders: Vec<&Order> = queue.iter().collect();
    for pair in orders.windows(2) {
        let (ahead, behind) = (pair[0], pair[1]);
        let better_price = match queue.side() {
            Side::Buy => ahead.price() > behind.price(),
            Side::Sell => ahead.price() < behind.price(),
        };
        let earlier_at_same_price =
            ahead.price() == behind.price() && ahead.inserted_at() < behind.inserted_at();
        assert!(
            better_price || earlier_at_same_price,
            "{} should not be ahead of {}",
            ahead.id,
            behind.id
        );
    }
}

proptest! {
    #[test]
    fn queues_stay_in_price_time_order(requests in order_requests()) {
        let order_book = build_book(&requests);

        assert_priority_order(order_book.bids());
        assert_priority_order(order_book.offers());
        prop_assert_eq!(order_book.len(), requests.len());
    }

    #[test]
    fn matching_conserves_quantity_and_terminates(requests in order_requests()) {
        let mut order_book = build_book(&requests);
        let resting_at_start = order_book.len();

        let executions = order_book.match_orders();

        prop_assert_eq!(executions.len() % 2, 0);
        prop_assert!(executions.len() / 2 <= resting_at_start);

        let mut traded_by_order: HashMap<&str, Decimal> = HashMap::new();
        for pair in executions.chunks(2) {
            let (bid, offer) = (&pair[0], &pair[1]);
            prop_assert_eq!(bid.side, Side::Buy);
            prop_assert_eq!(offer.side, Side::Sell);
            prop_assert!(bid.price() >= offer.price());
            prop_assert_eq!(bid.last_executed_price(), offer.price());
            prop_assert_eq!(offer.last_executed_price(), offer.price());
            prop_assert_eq!(bid.last_executed_quantity(), offer.last_executed_quantity());
            prop_assert!(bid.is_closed() || offer.is_closed(), "every trade closes a side");

            for snapshot in pair {
                *traded_by_order.entry(snapshot.id.as_str()).or_default() +=
                    snapshot.last_executed_quantity();
                let traded = traded_by_order[snapshot.id.as_str()];
                prop_assert_eq!(snapshot.executed_quantity(), traded);
                prop_assert!(snapshot.executed_quantity() <= snapshot.quantity());
            }
        }

        prop_assert!(!order_book.is_crossed());
        for order in order_book.bids().iter().chain(order_book.offers().iter()) {
            prop_assert!(!order.is_closed(), "{} is closed but still resting", order.id);
        }
        assert_priority_order(order_book.bids());
        assert_priority_order(order_book.offers());
    }

    #[test]
    fn second_match_is_empty_and_changes_nothing(requests in order_requests()) {
        let mut order_book = build_book(&requests);
        order_book.match_orders();
        let before = order_book.display();

        prop_assert!(order_book.match_orders().is_empty());
        prop_assert_eq!(order_book.display(), before);
    }

    #[test]
    fn cancel_removes_exactly_one(requests in order_requests(), pick in any::<prop::sample::Index>()) {
        let mut order_book = build_book(&requests);
        prop_assume!(!order_book.is_empty());

        let resting: Vec<(String, Side)> = order_book
            .bids()
            .iter()
            .chain(order_book.offers().iter())
            .map(|order| (order.id.clone(), order.side))
            .collect();
        let (id, side) = pick.get(&resting).clone();
        let before = order_book.len();

        let cancelled = order_book.cancel(&id, side);

        prop_assert!(cancelled.map(|order| order.is_closed()).unwrap_or(false));
        prop_assert_eq!(order_book.len(), before - 1);
        prop_assert!(!order_book.queue(side).contains(&id));
        prop_assert!(order_book.cancel(&id, side).is_none());
        prop_assert_eq!(order_book.len(), before - 1);
    }
}

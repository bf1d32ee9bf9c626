//! Per-symbol order book
//!
//! Two `BTreeMap` sides keyed by price (bids read in reverse for the
//! highest first), a FIFO [`PriceLevel`] per price, and two indices: the
//! order arena is keyed by exchange id, with a client-order-id map beside
//! it. Every resting order is reachable through its price level and both
//! indices; removal through any path unlinks all three.

mod price_level;

use price_level::PriceLevel;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use types::ids::{OrderId, Symbol};
use types::numeric::Price;
use types::order::{Order, Side};

/// All resting orders for one symbol
#[derive(Debug)]
pub struct OrderBook {
    symbol: Symbol,
    /// Buy side; best bid is the highest price, so iterate in reverse
    bids: BTreeMap<Price, PriceLevel>,
    /// Sell side; best ask is the lowest price
    asks: BTreeMap<Price, PriceLevel>,
    /// Order arena, doubling as the exchange-id index
    orders: HashMap<OrderId, Order>,
    /// Client-order-id index for O(1) cancel/amend lookup
    by_cl_ord_id: HashMap<String, OrderId>,
}

impl OrderBook {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            orders: HashMap::new(),
            by_cl_ord_id: HashMap::new(),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Rest an order at the tail of its price level
    ///
    /// Callers only insert live orders: remaining quantity positive and a
    /// non-terminal status.
    pub fn insert(&mut self, order: Order) {
        debug_assert!(order.remaining_quantity > 0);
        debug_assert!(!order.status.is_terminal());

        let side = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        side.entry(order.price).or_default().push_back(order.order_id);

        debug!(
            symbol = %self.symbol,
            side = ?order.side,
            qty = order.remaining_quantity,
            price = %order.price,
            order_id = %order.order_id,
            cl_ord_id = %order.cl_ord_id,
            "added order to book"
        );

        self.by_cl_ord_id
            .insert(order.cl_ord_id.clone(), order.order_id);
        self.orders.insert(order.order_id, order);
    }

    /// Remove by exchange id; returns the removed order
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let order = self.orders.remove(order_id)?;
        self.by_cl_ord_id.remove(&order.cl_ord_id);
        self.unlink(&order);
        Some(order)
    }

    /// Remove by client order id; returns the removed order
    pub fn remove_by_cl_ord_id(&mut self, cl_ord_id: &str) -> Option<Order> {
        let order_id = self.by_cl_ord_id.remove(cl_ord_id)?;
        let order = self
            .orders
            .remove(&order_id)
            .expect("client index points at a live order");
        self.unlink(&order);
        Some(order)
    }

    fn unlink(&mut self, order: &Order) {
        let side = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        if let Some(level) = side.get_mut(&order.price) {
            level.remove(&order.order_id);
            if level.is_empty() {
                side.remove(&order.price);
            }
        }
    }

    /// Head of the highest-priced bid queue
    pub fn best_bid_id(&self) -> Option<OrderId> {
        self.bids
            .iter()
            .next_back()
            .and_then(|(_, level)| level.front())
    }

    /// Head of the lowest-priced ask queue
    pub fn best_ask_id(&self) -> Option<OrderId> {
        self.asks.iter().next().and_then(|(_, level)| level.front())
    }

    pub fn best_bid(&self) -> Option<&Order> {
        self.best_bid_id().and_then(|id| self.orders.get(&id))
    }

    pub fn best_ask(&self) -> Option<&Order> {
        self.best_ask_id().and_then(|id| self.orders.get(&id))
    }

    pub fn best_bid_price(&self) -> Option<Price> {
        self.best_bid().map(|order| order.price)
    }

    pub fn best_ask_price(&self) -> Option<Price> {
        self.best_ask().map(|order| order.price)
    }

    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.get(order_id)
    }

    /// Mutable order access for fills; the caller must not change the
    /// price, side or ids of the order, which would desynchronise the
    /// level queues.
    pub(crate) fn order_mut(&mut self, order_id: &OrderId) -> Option<&mut Order> {
        self.orders.get_mut(order_id)
    }

    /// O(1) lookup by client order id
    pub fn get_by_cl_ord_id(&self, cl_ord_id: &str) -> Option<&Order> {
        self.by_cl_ord_id
            .get(cl_ord_id)
            .and_then(|order_id| self.orders.get(order_id))
    }

    /// Up to `depth` orders from one side in priority order (price, then
    /// arrival at each price)
    pub fn orders_at(&self, side: Side, depth: usize) -> Vec<&Order> {
        let levels: Box<dyn Iterator<Item = (&Price, &PriceLevel)> + '_> = match side {
            Side::Buy => Box::new(self.bids.iter().rev()),
            Side::Sell => Box::new(self.asks.iter()),
        };

        levels
            .flat_map(|(_, level)| level.iter())
            .filter_map(|order_id| self.orders.get(order_id))
            .take(depth)
            .collect()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Structural self-check used by tests: every queued id resolves in
    /// both indices and vice versa, and no dead order rests anywhere.
    pub fn check_integrity(&self) -> bool {
        let mut queued = 0usize;
        for (side, levels) in [(Side::Buy, &self.bids), (Side::Sell, &self.asks)] {
            for (price, level) in levels {
                if level.is_empty() {
                    return false;
                }
                queued += level.len();
                for order_id in level.iter() {
                    let Some(order) = self.orders.get(order_id) else {
                        return false;
                    };
                    if order.side != side
                        || order.price != *price
                        || order.remaining_quantity == 0
                        || order.status.is_terminal()
                    {
                        return false;
                    }
                    if self.by_cl_ord_id.get(&order.cl_ord_id) != Some(order_id) {
                        return false;
                    }
                }
            }
        }
        queued == self.orders.len() && self.by_cl_ord_id.len() == self.orders.len()
    }
}

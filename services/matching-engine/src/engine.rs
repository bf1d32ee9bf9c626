//! Matching engine core
//!
//! Owns every order book and both id counters, and is the only way orders
//! enter or leave a book. All mutating calls on the engine are serialized
//! by the caller (one lock around the whole engine); the counters are
//! atomic so ids stay unique regardless.
//!
//! Client-visible failures never become errors: each one surfaces as a
//! single `Rejected` execution.

use crate::book::OrderBook;
use liquidity::LiquidityProvider;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use types::errors::RejectReason;
use types::execution::{ExecType, Execution};
use types::ids::{ExecId, OrderId, Symbol};
use types::numeric::Price;
use types::order::{Order, OrderRequest, OrderStatus, OrderType, Side};
use types::time::unix_nanos;

/// Main matching engine: symbol → book, plus the liquidity hook
pub struct MatchingEngine {
    books: HashMap<Symbol, OrderBook>,
    order_seq: AtomicU64,
    exec_seq: AtomicU64,
    liquidity: Arc<LiquidityProvider>,
}

impl MatchingEngine {
    pub fn new(liquidity: Arc<LiquidityProvider>) -> Self {
        Self {
            books: HashMap::new(),
            order_seq: AtomicU64::new(1),
            exec_seq: AtomicU64::new(1),
            liquidity,
        }
    }

    /// Submit an order
    ///
    /// Returns the full execution sequence for this order: the `New`
    /// acknowledgement, one (aggressor, passive) pair per match, and a
    /// terminal execution where one applies. On the first order for a
    /// symbol the liquidity provider seeds the book before matching
    /// starts, so the incoming order can cross the seeded quotes.
    pub async fn submit_order(&mut self, request: OrderRequest) -> Vec<Execution> {
        if let Err(reason) = Self::validate(&request) {
            warn!(cl_ord_id = %request.cl_ord_id, %reason, "order rejected");
            return vec![self.reject_request(&request)];
        }

        let order_id = self.next_order_id();
        let accepted_at = unix_nanos();

        // Seeded quotes must be resting before the matching loop runs.
        // Maker orders go through the same path below, minus this consult,
        // so a seed can never trigger a second seed.
        if let Some(quotes) = self
            .liquidity
            .seed_plan(&request.symbol, Some(&request))
            .await
        {
            for quote in quotes {
                self.post_maker(quote);
            }
        }

        let order = Order::accept(request, order_id, accepted_at);
        self.process(order)
    }

    /// Cancel a resting order by its original client order id
    ///
    /// Emits exactly one execution: `Cancelled` on success, `Rejected`
    /// when the symbol or order is unknown.
    pub fn cancel_order(&mut self, symbol: &Symbol, orig_cl_ord_id: &str, cl_ord_id: &str) -> Execution {
        let Some(book) = self.books.get_mut(symbol) else {
            warn!(%symbol, "cancel rejected, unknown symbol");
            return self.reject_lookup(symbol, orig_cl_ord_id, cl_ord_id);
        };

        let Some(mut order) = book.remove_by_cl_ord_id(orig_cl_ord_id) else {
            warn!(%symbol, orig_cl_ord_id, "cancel rejected, order not found");
            return self.reject_lookup(symbol, orig_cl_ord_id, cl_ord_id);
        };

        order.status = OrderStatus::Cancelled;

        info!(
            order_id = %order.order_id,
            orig_cl_ord_id,
            %symbol,
            remaining = order.remaining_quantity,
            "order cancelled"
        );

        Execution {
            exec_id: self.next_exec_id(),
            order_id: Some(order.order_id),
            cl_ord_id: cl_ord_id.to_string(),
            orig_cl_ord_id: Some(orig_cl_ord_id.to_string()),
            symbol: symbol.clone(),
            side: Some(order.side),
            exec_price: Price::ZERO,
            exec_quantity: 0,
            leaves_qty: 0,
            cum_qty: order.filled_quantity,
            exec_type: ExecType::Cancelled,
            order_status: OrderStatus::Cancelled,
            transact_time: unix_nanos(),
        }
    }

    /// Amend (cancel/replace) a resting order
    ///
    /// Atomic: a rejection leaves the original order resting untouched;
    /// success replaces it with a fresh order under a new exchange id and
    /// new time priority, carrying the old fills forward.
    pub fn amend_order(
        &mut self,
        symbol: &Symbol,
        orig_cl_ord_id: &str,
        cl_ord_id: &str,
        new_quantity: Option<u64>,
        new_price: Option<Price>,
    ) -> Vec<Execution> {
        let original = {
            let Some(book) = self.books.get_mut(symbol) else {
                warn!(%symbol, "amend rejected, unknown symbol");
                return vec![self.reject_lookup(symbol, orig_cl_ord_id, cl_ord_id)];
            };

            let Some(existing) = book.get_by_cl_ord_id(orig_cl_ord_id) else {
                warn!(%symbol, orig_cl_ord_id, "amend rejected, order not found");
                return vec![self.reject_lookup(symbol, orig_cl_ord_id, cl_ord_id)];
            };

            let effective_quantity = new_quantity.unwrap_or(existing.quantity);
            if effective_quantity < existing.filled_quantity {
                let reason = RejectReason::QuantityBelowFilled {
                    new_qty: effective_quantity,
                    filled: existing.filled_quantity,
                };
                warn!(%symbol, orig_cl_ord_id, %reason, "amend rejected");
                return vec![self.reject_lookup(symbol, orig_cl_ord_id, cl_ord_id)];
            }

            book.remove_by_cl_ord_id(orig_cl_ord_id)
                .expect("amend target was just looked up")
        };

        let effective_quantity = new_quantity.unwrap_or(original.quantity);
        let effective_price = new_price.unwrap_or(original.price);

        let mut amended = Order {
            order_id: self.next_order_id(),
            cl_ord_id: cl_ord_id.to_string(),
            symbol: symbol.clone(),
            side: original.side,
            order_type: original.order_type,
            price: effective_price,
            quantity: effective_quantity,
            filled_quantity: original.filled_quantity,
            remaining_quantity: effective_quantity - original.filled_quantity,
            status: OrderStatus::New,
            sender_comp_id: original.sender_comp_id,
            target_comp_id: original.target_comp_id,
            created_at: unix_nanos(),
        };

        let mut executions = vec![Execution {
            exec_id: self.next_exec_id(),
            order_id: Some(amended.order_id),
            cl_ord_id: cl_ord_id.to_string(),
            orig_cl_ord_id: Some(orig_cl_ord_id.to_string()),
            symbol: symbol.clone(),
            side: Some(amended.side),
            exec_price: effective_price,
            exec_quantity: 0,
            leaves_qty: amended.remaining_quantity,
            cum_qty: amended.filled_quantity,
            exec_type: ExecType::Replaced,
            order_status: OrderStatus::New,
            transact_time: unix_nanos(),
        }];

        info!(
            orig_cl_ord_id,
            new_cl_ord_id = cl_ord_id,
            new_qty = effective_quantity,
            new_price = %effective_price,
            "order amended"
        );

        // The amendment is a fresh arrival: it re-enters matching and any
        // residual rests with new time priority.
        if amended.remaining_quantity > 0 {
            let book = self
                .books
                .get_mut(symbol)
                .expect("book existed for the amend lookup");
            Self::run_matching(&self.exec_seq, &mut amended, book, &mut executions);
            if amended.remaining_quantity > 0 && amended.order_type == OrderType::Limit {
                book.insert(amended);
            }
        }

        executions
    }

    /// Apply the provider's refresh plans: cancel each refreshed symbol's
    /// previous quote fan, then post the new one. Returns how many symbols
    /// were refreshed.
    pub async fn refresh_liquidity(&mut self) -> usize {
        let plans = self.liquidity.refresh_plans().await;
        let refreshed = plans.len();

        for plan in plans {
            for stale in &plan.cancel {
                // A quote that traded away is simply not there any more
                let execution = self.cancel_order(&plan.symbol, stale, stale);
                debug!(
                    symbol = %plan.symbol,
                    cl_ord_id = %stale,
                    outcome = ?execution.exec_type,
                    "retired maker quote"
                );
            }
            for quote in plan.quotes {
                self.post_maker(quote);
            }
        }

        refreshed
    }

    /// Manually seed liquidity for a symbol, outside any order flow.
    /// Returns whether a seed actually happened (it will not when the
    /// provider is disabled or the symbol is already active).
    pub async fn setup_liquidity(&mut self, symbol: &Symbol) -> bool {
        match self.liquidity.setup(symbol).await {
            Some(quotes) => {
                for quote in quotes {
                    self.post_maker(quote);
                }
                true
            }
            None => false,
        }
    }

    pub fn book(&self, symbol: &Symbol) -> Option<&OrderBook> {
        self.books.get(symbol)
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.books.keys().cloned().collect()
    }

    /// Post one maker quote through the normal submit path, without the
    /// liquidity consult. Maker executions are logged and dropped; no
    /// session is waiting for them.
    fn post_maker(&mut self, quote: OrderRequest) {
        let order = Order::accept(quote, self.next_order_id(), unix_nanos());
        let executions = self.process(order);
        debug!(
            executions = executions.len(),
            "posted maker quote"
        );
    }

    /// Acknowledge, match, then rest or reject the remainder
    fn process(&mut self, mut order: Order) -> Vec<Execution> {
        let book = self
            .books
            .entry(order.symbol.clone())
            .or_insert_with(|| OrderBook::new(order.symbol.clone()));

        let mut executions = vec![Self::execution(
            &self.exec_seq,
            &order,
            ExecType::New,
            Price::ZERO,
            0,
        )];

        Self::run_matching(&self.exec_seq, &mut order, book, &mut executions);

        if order.remaining_quantity > 0 && order.order_type == OrderType::Limit {
            book.insert(order);
        }

        executions
    }

    /// The matching loop: walk the counter side best-first until the order
    /// is done, the book runs dry, or the limit price stops crossing.
    fn run_matching(
        exec_seq: &AtomicU64,
        order: &mut Order,
        book: &mut OrderBook,
        executions: &mut Vec<Execution>,
    ) {
        while order.remaining_quantity > 0 {
            let counter_id = match order.side {
                Side::Buy => book.best_ask_id(),
                Side::Sell => book.best_bid_id(),
            };

            let Some(counter_id) = counter_id else {
                if order.order_type == OrderType::Market {
                    // Market order outlived the liquidity: whatever filled
                    // stays filled, the rest is rejected, nothing rests.
                    order.status = OrderStatus::Rejected;
                    warn!(
                        order_id = %order.order_id,
                        symbol = %order.symbol,
                        leaves = order.remaining_quantity,
                        "market order rejected, no counter liquidity"
                    );
                    executions.push(Self::execution(
                        exec_seq,
                        order,
                        ExecType::Rejected,
                        Price::ZERO,
                        0,
                    ));
                }
                break;
            };

            if order.order_type == OrderType::Limit {
                let counter_price = book
                    .order(&counter_id)
                    .expect("best id resolves in the arena")
                    .price;
                let crosses = match order.side {
                    Side::Buy => order.price >= counter_price,
                    Side::Sell => order.price <= counter_price,
                };
                if !crosses {
                    break;
                }
            }

            Self::execute_match(exec_seq, order, counter_id, book, executions);
        }
    }

    /// One trade between the incoming order and the resting head of the
    /// counter queue. The resting price governs, which is where the
    /// aggressor's price improvement comes from.
    fn execute_match(
        exec_seq: &AtomicU64,
        aggressor: &mut Order,
        counter_id: OrderId,
        book: &mut OrderBook,
        executions: &mut Vec<Execution>,
    ) {
        let passive = book
            .order_mut(&counter_id)
            .expect("best id resolves in the arena");

        let match_quantity = aggressor.remaining_quantity.min(passive.remaining_quantity);
        let match_price = passive.price;

        aggressor.fill(match_quantity);
        passive.fill(match_quantity);
        let passive_snapshot = passive.clone();

        info!(
            qty = match_quantity,
            symbol = %aggressor.symbol,
            price = %match_price,
            aggressor = %aggressor.order_id,
            passive = %passive_snapshot.order_id,
            "match"
        );

        let aggressor_type = if aggressor.is_filled() {
            ExecType::Fill
        } else {
            ExecType::PartialFill
        };
        let passive_type = if passive_snapshot.is_filled() {
            ExecType::Fill
        } else {
            ExecType::PartialFill
        };

        executions.push(Self::execution(
            exec_seq,
            aggressor,
            aggressor_type,
            match_price,
            match_quantity,
        ));
        executions.push(Self::execution(
            exec_seq,
            &passive_snapshot,
            passive_type,
            match_price,
            match_quantity,
        ));

        if passive_snapshot.is_filled() {
            book.remove(&counter_id);
        }
    }

    fn validate(request: &OrderRequest) -> Result<(), RejectReason> {
        if request.cl_ord_id.is_empty() {
            return Err(RejectReason::MissingClOrdId);
        }
        if request.symbol.is_empty() {
            return Err(RejectReason::MissingSymbol);
        }
        if request.quantity == 0 {
            return Err(RejectReason::InvalidQuantity);
        }
        if request.order_type == OrderType::Limit
            && !request.price.is_some_and(|price| price.is_positive())
        {
            return Err(RejectReason::MissingLimitPrice);
        }
        Ok(())
    }

    fn execution(
        exec_seq: &AtomicU64,
        order: &Order,
        exec_type: ExecType,
        exec_price: Price,
        exec_quantity: u64,
    ) -> Execution {
        Execution {
            exec_id: ExecId::new(exec_seq.fetch_add(1, Ordering::SeqCst)),
            order_id: Some(order.order_id),
            cl_ord_id: order.cl_ord_id.clone(),
            orig_cl_ord_id: None,
            symbol: order.symbol.clone(),
            side: Some(order.side),
            exec_price,
            exec_quantity,
            leaves_qty: order.remaining_quantity,
            cum_qty: order.filled_quantity,
            exec_type,
            order_status: order.status,
            transact_time: unix_nanos(),
        }
    }

    /// Reject an order that never got an exchange id
    fn reject_request(&self, request: &OrderRequest) -> Execution {
        Execution {
            exec_id: self.next_exec_id(),
            order_id: None,
            cl_ord_id: request.cl_ord_id.clone(),
            orig_cl_ord_id: None,
            symbol: request.symbol.clone(),
            side: Some(request.side),
            exec_price: Price::ZERO,
            exec_quantity: 0,
            leaves_qty: 0,
            cum_qty: 0,
            exec_type: ExecType::Rejected,
            order_status: OrderStatus::Rejected,
            transact_time: unix_nanos(),
        }
    }

    /// Reject a cancel/amend whose target could not be found
    fn reject_lookup(&self, symbol: &Symbol, orig_cl_ord_id: &str, cl_ord_id: &str) -> Execution {
        Execution {
            exec_id: self.next_exec_id(),
            order_id: None,
            cl_ord_id: cl_ord_id.to_string(),
            orig_cl_ord_id: Some(orig_cl_ord_id.to_string()),
            symbol: symbol.clone(),
            side: None,
            exec_price: Price::ZERO,
            exec_quantity: 0,
            leaves_qty: 0,
            cum_qty: 0,
            exec_type: ExecType::Rejected,
            order_status: OrderStatus::Rejected,
            transact_time: unix_nanos(),
        }
    }

    fn next_order_id(&self) -> OrderId {
        OrderId::new(self.order_seq.fetch_add(1, Ordering::SeqCst))
    }

    fn next_exec_id(&self) -> ExecId {
        ExecId::new(self.exec_seq.fetch_add(1, Ordering::SeqCst))
    }
}

//! Liquidity provider
//!
//! Plans market-maker quote fans. On the first touch of a symbol the
//! provider builds a seed plan: a ladder of bid/ask limit orders around a
//! reference price, spaced and sized by the symbol's tier profile. The
//! matching engine posts the planned orders through its own submit path,
//! so the provider holds no engine reference and cannot recurse.

use crate::config::LiquidityConfig;
use crate::price_feed::PriceFeed;
use crate::profile::{LiquidityProfile, ProfileService};
use dashmap::{DashMap, DashSet};
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use types::ids::Symbol;
use types::numeric::Price;
use types::order::{OrderRequest, OrderType, Side};

/// Sender comp id carried by every maker order, so downstream observers
/// can tell provider quotes from client flow
pub const MAKER_SENDER_COMP_ID: &str = "MARKET_MAKER";
const MAKER_TARGET_COMP_ID: &str = "EXCHANGE";

/// A planned re-quote for one symbol: cancel the previous fan, post a new one
#[derive(Debug, Clone)]
pub struct QuoteRefresh {
    pub symbol: Symbol,
    /// Client order ids of the previously posted fan
    pub cancel: Vec<String>,
    pub quotes: Vec<OrderRequest>,
}

/// Monitoring snapshot of the provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub enabled: bool,
    pub active_symbols: Vec<Symbol>,
    pub reference_prices: Vec<(Symbol, Price)>,
    pub profiles: Vec<LiquidityProfile>,
}

/// Market-maker quote planner
pub struct LiquidityProvider {
    enabled: bool,
    fallback_price: Price,
    price_feed: Arc<PriceFeed>,
    profiles: Arc<ProfileService>,
    /// Symbols that have been quoted at least once
    active: DashSet<Symbol>,
    /// Reference price behind each symbol's current fan
    last_price: DashMap<Symbol, Price>,
    /// Client order ids of each symbol's current fan
    open_quotes: DashMap<Symbol, Vec<String>>,
    quote_seq: AtomicU64,
}

impl LiquidityProvider {
    pub fn new(
        config: &LiquidityConfig,
        price_feed: Arc<PriceFeed>,
        profiles: Arc<ProfileService>,
    ) -> Self {
        if config.enabled {
            info!(
                fallback = %config.fallback_price,
                refresh_ms = config.refresh_interval_ms,
                "liquidity provider enabled, profiles follow market-cap tier"
            );
        } else {
            info!("liquidity provider disabled");
        }

        Self {
            enabled: config.enabled,
            fallback_price: config.fallback_price,
            price_feed,
            profiles,
            active: DashSet::new(),
            last_price: DashMap::new(),
            open_quotes: DashMap::new(),
            quote_seq: AtomicU64::new(1),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the symbol already has quotes posted
    pub fn is_active(&self, symbol: &Symbol) -> bool {
        self.active.contains(symbol)
    }

    /// Plan seed quotes for a symbol about to receive its first order
    ///
    /// Returns `None` when the provider is disabled or the symbol is
    /// already active: seeding is idempotent, and maker orders posted from
    /// a plan can never trigger a second plan for the same symbol.
    pub async fn seed_plan(
        &self,
        symbol: &Symbol,
        incoming: Option<&OrderRequest>,
    ) -> Option<Vec<OrderRequest>> {
        if !self.enabled {
            return None;
        }
        if self.active.contains(symbol) {
            debug!(%symbol, "liquidity already exists");
            return None;
        }

        info!(%symbol, "first order for symbol, setting up liquidity");

        let profile = self.profiles.get(symbol).await;
        let reference = self.reference_price(symbol, incoming).await;
        let quotes = self.build_fan(symbol, reference, &profile);

        self.register_fan(symbol, reference, &quotes);
        self.active.insert(symbol.clone());

        info!(
            %symbol,
            tier = ?profile.tier,
            market_cap = %profile.market_cap_display(),
            %reference,
            levels = profile.levels,
            "liquidity setup complete"
        );

        Some(quotes)
    }

    /// Manual trigger, equivalent to seeding with no incoming order
    pub async fn setup(&self, symbol: &Symbol) -> Option<Vec<OrderRequest>> {
        if !self.enabled {
            warn!("cannot set up liquidity, provider is disabled");
            return None;
        }
        self.seed_plan(symbol, None).await
    }

    /// Plan re-quotes for every active symbol whose reference price moved
    ///
    /// Each plan cancels the symbol's previous fan before the new one is
    /// posted, so the book holds at most one fan per symbol.
    pub async fn refresh_plans(&self) -> Vec<QuoteRefresh> {
        if !self.enabled {
            return Vec::new();
        }

        // Snapshot the active set before awaiting anything
        let symbols: Vec<Symbol> = self.active.iter().map(|entry| entry.key().clone()).collect();
        let mut plans = Vec::new();

        for symbol in symbols {
            let Some(fresh) = self.price_feed.get(&symbol).await else {
                continue;
            };
            let previous = self.last_price.get(&symbol).map(|entry| *entry);
            if previous == Some(fresh) {
                continue;
            }

            info!(
                %symbol,
                old = ?previous.map(|price| price.to_string()),
                new = %fresh,
                "reference price moved, refreshing quotes"
            );

            let profile = self.profiles.get(&symbol).await;
            let cancel = self
                .open_quotes
                .get(&symbol)
                .map(|ids| ids.clone())
                .unwrap_or_default();
            let quotes = self.build_fan(&symbol, fresh, &profile);
            self.register_fan(&symbol, fresh, &quotes);

            plans.push(QuoteRefresh {
                symbol,
                cancel,
                quotes,
            });
        }

        plans
    }

    /// Monitoring snapshot
    pub fn status(&self) -> ProviderStatus {
        let active_symbols: Vec<Symbol> =
            self.active.iter().map(|entry| entry.key().clone()).collect();
        let profiles = active_symbols
            .iter()
            .filter_map(|symbol| self.profiles.cached(symbol))
            .collect();

        ProviderStatus {
            enabled: self.enabled,
            active_symbols: active_symbols.clone(),
            reference_prices: self
                .last_price
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect(),
            profiles,
        }
    }

    /// Reference price priority: fresh feed price, then the incoming
    /// order's limit price, then the configured fallback.
    async fn reference_price(&self, symbol: &Symbol, incoming: Option<&OrderRequest>) -> Price {
        if let Some(price) = self.price_feed.get(symbol).await {
            return price;
        }

        if let Some(order) = incoming {
            if order.order_type == OrderType::Limit {
                if let Some(price) = order.price.filter(|price| price.is_positive()) {
                    warn!(%symbol, %price, "using order limit price as reference");
                    return price;
                }
            }
        }

        warn!(%symbol, fallback = %self.fallback_price, "using fallback reference price");
        self.fallback_price
    }

    /// Build the two-sided quote ladder around a reference price
    fn build_fan(
        &self,
        symbol: &Symbol,
        reference: Price,
        profile: &LiquidityProfile,
    ) -> Vec<OrderRequest> {
        let mut quotes = Vec::with_capacity(profile.levels as usize * 2);

        for level in 0..profile.levels {
            let offset_bps = profile.base_spread_bps + level * profile.level_increment_bps;
            let offset = (Decimal::from(offset_bps) / dec!(10_000))
                .round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero);

            let bid = Price::new(reference.as_decimal() * (Decimal::ONE - offset)).round_down_2dp();
            let ask = Price::new(reference.as_decimal() * (Decimal::ONE + offset)).round_up_2dp();
            let quantity = profile.base_quantity * profile.quantity_multiplier.pow(level);

            quotes.push(self.maker_order(symbol, Side::Buy, bid, quantity, level));
            quotes.push(self.maker_order(symbol, Side::Sell, ask, quantity, level));
        }

        quotes
    }

    fn maker_order(
        &self,
        symbol: &Symbol,
        side: Side,
        price: Price,
        quantity: u64,
        level: u32,
    ) -> OrderRequest {
        let seq = self.quote_seq.fetch_add(1, Ordering::Relaxed);
        let side_tag = match side {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        };

        OrderRequest {
            cl_ord_id: format!("MM-{symbol}-{side_tag}-{level}-{seq}"),
            symbol: symbol.clone(),
            side,
            order_type: OrderType::Limit,
            price: Some(price),
            quantity,
            sender_comp_id: MAKER_SENDER_COMP_ID.to_string(),
            target_comp_id: MAKER_TARGET_COMP_ID.to_string(),
        }
    }

    fn register_fan(&self, symbol: &Symbol, reference: Price, quotes: &[OrderRequest]) {
        self.last_price.insert(symbol.clone(), reference);
        self.open_quotes.insert(
            symbol.clone(),
            quotes.iter().map(|quote| quote.cl_ord_id.clone()).collect(),
        );
    }
}

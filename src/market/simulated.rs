//! Simulated market data generator
//!
//! Produces realistic-looking data for the full symbol set without any
//! external connection. Stateless and synchronous; no background task.

use chrono::{Duration, Utc};
use rand::Rng;

use crate::constants::simulated::{DAILY_VARIATION_PCT, DEFAULT_BASE_PRICE, TICK_VARIATION_PCT};
use crate::market::snapshot::MarketSnapshot;
use crate::market::types::{Bar, HistoricalBar, MarketMessage, Quote, Trade};

/// Fixed base price a symbol's simulated data varies around.
pub fn base_price(symbol: &str) -> f64 {
    match symbol {
        "AAPL" => 175.0,
        "GOOGL" => 140.0,
        "MSFT" => 380.0,
        "AMZN" => 180.0,
        "TSLA" => 250.0,
        "SPY" => 500.0,
        _ => DEFAULT_BASE_PRICE,
    }
}

/// Populate a snapshot with a full simulated data set: a 30-day daily-bar
/// window per symbol plus one current quote, trade and bar each, all
/// timestamped at generation time.
pub fn populate(snapshot: &mut MarketSnapshot, symbols: &[String]) {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let days = crate::constants::market::SIMULATED_LOOKBACK_DAYS;

    for symbol in symbols {
        let base = base_price(symbol);

        let mut bars = Vec::with_capacity(days);
        for i in 0..days {
            // Uniform variation in (-2.5%, +2.5%] around the base
            let variation = (0.5 - rng.gen::<f64>()) * (DAILY_VARIATION_PCT * 2.0);
            let close = base * (1.0 + variation / 100.0);
            bars.push(HistoricalBar {
                timestamp: (now - Duration::days((days - i) as i64)).to_rfc3339(),
                open: close * 0.99,
                high: close * 1.02,
                low: close * 0.98,
                close,
                volume: rng.gen_range(1_000_000..=10_000_000) as f64,
            });
        }
        snapshot.set_historical_bars(symbol.clone(), bars);

        snapshot.apply(MarketMessage::Quote(Quote {
            symbol: symbol.clone(),
            bid_price: base * 0.999,
            ask_price: base * 1.001,
            bid_size: rng.gen_range(100..=1000) as f64,
            ask_size: rng.gen_range(100..=1000) as f64,
            timestamp: now.to_rfc3339(),
        }));

        snapshot.apply(MarketMessage::Trade(Trade {
            symbol: symbol.clone(),
            price: base,
            size: rng.gen_range(100..=1000) as f64,
            timestamp: now.to_rfc3339(),
        }));

        snapshot.apply(MarketMessage::Bar(current_bar(symbol)));
    }
}

/// One current-day bar around the symbol's base price. Also serves as the
/// degraded fallback the stream producer emits when its connection fails.
pub fn current_bar(symbol: &str) -> Bar {
    let mut rng = rand::thread_rng();
    let base = base_price(symbol);
    Bar {
        symbol: symbol.to_string(),
        open: base * 0.99,
        high: base * 1.02,
        low: base * 0.98,
        close: base,
        volume: rng.gen_range(1_000_000..=5_000_000) as f64,
        timestamp: Utc::now().to_rfc3339(),
    }
}

/// One simulated tick: a trade within ±0.25% of the last seen price.
/// Feeds the simulated stream path so the watch loop keeps observing
/// fresh prices.
pub fn price_update(symbol: &str, last_price: f64) -> Trade {
    let mut rng = rand::thread_rng();
    let variation = (0.5 - rng.gen::<f64>()) * (TICK_VARIATION_PCT * 2.0);
    Trade {
        symbol: symbol.to_string(),
        price: last_price * (1.0 + variation / 100.0),
        size: rng.gen_range(100..=1000) as f64,
        timestamp: Utc::now().to_rfc3339(),
    }
}

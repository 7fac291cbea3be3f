//! Application-wide constants and magic numbers
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make the codebase easier to tune.

use std::time::Duration;

/// Portfolio constants
pub mod portfolio {
    /// Cash every session starts with; the profit/loss baseline
    pub const STARTING_CAPITAL: f64 = 100_000.0;
}

/// Trading decision constants
pub mod trading {
    /// Fixed buy lot size in shares, regardless of price or account size
    pub const BUY_LOT_SIZE: u32 = 10;

    /// Tolerance for the "equal" price comparator
    pub const PRICE_EQUAL_TOLERANCE: f64 = 0.01;
}

/// Market data constants
pub mod market {
    use super::*;

    /// Trailing window for the historical daily-bar pull
    pub const HISTORICAL_LOOKBACK_DAYS: i64 = 100;

    /// Days of daily bars produced by the simulated generator
    pub const SIMULATED_LOOKBACK_DAYS: usize = 30;

    /// Cadence of the watch loop between evaluation cycles
    pub const WATCH_INTERVAL: Duration = Duration::from_secs(1);

    /// Contract bound: the producer must observe a shutdown signal within
    /// this interval. The select!-based producer reacts faster; this is
    /// the documented upper bound.
    pub const SHUTDOWN_OBSERVE_BOUND: Duration = Duration::from_secs(1);
}

/// Simulated generator constants
pub mod simulated {
    /// Max daily close variation around the base price (percent)
    pub const DAILY_VARIATION_PCT: f64 = 2.5;

    /// Max per-tick price variation for streamed updates (percent)
    pub const TICK_VARIATION_PCT: f64 = 0.25;

    /// Fallback base price for symbols without a configured base
    pub const DEFAULT_BASE_PRICE: f64 = 100.0;
}

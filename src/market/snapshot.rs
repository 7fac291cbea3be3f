//! Aggregated view of all market data observed during a run
//!
//! The snapshot is append-only: historical bars are written once per symbol,
//! streamed kinds grow as the producer delivers messages. Nothing is removed
//! mid-run.

use std::collections::HashMap;

use crate::market::types::{Bar, HistoricalBar, MarketMessage, Quote, Trade};

#[derive(Clone, Debug, Default)]
pub struct MarketSnapshot {
    historical_bars: HashMap<String, Vec<HistoricalBar>>,
    live_bars: Vec<Bar>,
    quotes: Vec<Quote>,
    trades: Vec<Trade>,
}

impl MarketSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the fixed historical window for a symbol. Written once per
    /// symbol at acquisition; never rewritten mid-run.
    pub fn set_historical_bars(&mut self, symbol: impl Into<String>, bars: Vec<HistoricalBar>) {
        self.historical_bars.insert(symbol.into(), bars);
    }

    /// Append one streamed message under its kind.
    pub fn apply(&mut self, message: MarketMessage) {
        match message {
            MarketMessage::Bar(bar) => self.live_bars.push(bar),
            MarketMessage::Quote(quote) => self.quotes.push(quote),
            MarketMessage::Trade(trade) => self.trades.push(trade),
        }
    }

    pub fn historical_bars(&self, symbol: &str) -> Option<&[HistoricalBar]> {
        self.historical_bars.get(symbol).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.historical_bars.is_empty()
            && self.live_bars.is_empty()
            && self.quotes.is_empty()
            && self.trades.is_empty()
    }

    /// Counts per streamed kind, for progress logging.
    pub fn stream_counts(&self) -> (usize, usize, usize) {
        (self.live_bars.len(), self.quotes.len(), self.trades.len())
    }

    /// Resolve the current price for a symbol.
    ///
    /// Precedence, first hit wins:
    /// 1. last historical bar close for the symbol
    /// 2. first live bar matching the symbol, its close
    /// 3. first quote matching the symbol, bid/ask midpoint
    /// 4. first trade matching the symbol, its price
    ///
    /// `None` means "no price observed yet" and is a skip for callers,
    /// not an error.
    pub fn resolve_price(&self, symbol: &str) -> Option<f64> {
        if let Some(last) = self
            .historical_bars
            .get(symbol)
            .and_then(|bars| bars.last())
        {
            return Some(last.close);
        }

        if let Some(bar) = self.live_bars.iter().find(|b| b.symbol == symbol) {
            return Some(bar.close);
        }

        if let Some(quote) = self.quotes.iter().find(|q| q.symbol == symbol) {
            return Some(quote.mid_price());
        }

        self.trades
            .iter()
            .find(|t| t.symbol == symbol)
            .map(|t| t.price)
    }
}

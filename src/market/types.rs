//! Typed market-data records
//!
//! Four differently-shaped records arrive from the data sources; each gets
//! its own struct and the streamed kinds are carried as a tagged union so
//! downstream code never probes string-keyed maps.

use serde::{Deserialize, Serialize};

/// Daily bar from the historical REST pull. Field renames match the
/// provider wire format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBar {
    #[serde(rename = "t")]
    pub timestamp: String,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
}

/// Intraday bar delivered over the live stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub bid_price: f64,
    pub ask_price: f64,
    pub bid_size: f64,
    pub ask_size: f64,
    pub timestamp: String,
}

impl Quote {
    /// Midpoint between bid and ask.
    pub fn mid_price(&self) -> f64 {
        (self.ask_price + self.bid_price) / 2.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub price: f64,
    pub size: f64,
    pub timestamp: String,
}

/// One streamed message, tagged by kind. The unit the producer pushes onto
/// the shared queue and the snapshot appends on drain.
#[derive(Clone, Debug, PartialEq)]
pub enum MarketMessage {
    Bar(Bar),
    Quote(Quote),
    Trade(Trade),
}

impl MarketMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            MarketMessage::Bar(_) => "bar",
            MarketMessage::Quote(_) => "quote",
            MarketMessage::Trade(_) => "trade",
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            MarketMessage::Bar(b) => &b.symbol,
            MarketMessage::Quote(q) => &q.symbol,
            MarketMessage::Trade(t) => &t.symbol,
        }
    }
}

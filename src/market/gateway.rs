//! Market data gateway
//!
//! Owns the shared queue, the producer handle and the source-selection
//! routing. Exactly one source is selected per run; every path populates
//! the snapshot once, after which the workflow drains the queue on each
//! visit.

use std::collections::HashMap;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::TradingError;
use crate::market::historical::HistoricalDataClient;
use crate::market::simulated;
use crate::market::snapshot::MarketSnapshot;
use crate::market::stream::{spawn_producer, StreamConfig};
use crate::market::types::MarketMessage;

/// The four ingestion paths. Routing is a pure function of market hours
/// and the simulation preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataSource {
    LiveStream,
    Historical,
    SimulatedStream,
    SimulatedHistorical,
}

pub fn select_source(market_open: bool, use_simulation: bool) -> DataSource {
    match (use_simulation, market_open) {
        (true, true) => DataSource::SimulatedStream,
        (true, false) => DataSource::SimulatedHistorical,
        (false, true) => DataSource::LiveStream,
        (false, false) => DataSource::Historical,
    }
}

pub struct MarketDataGateway {
    symbols: Vec<String>,
    queue_tx: mpsc::UnboundedSender<MarketMessage>,
    queue_rx: mpsc::UnboundedReceiver<MarketMessage>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    producer: Option<JoinHandle<()>>,
    active: Option<DataSource>,
    /// Last simulated price per symbol, advanced tick by tick
    sim_prices: HashMap<String, f64>,
}

impl MarketDataGateway {
    pub fn new(symbols: Vec<String>) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            symbols,
            queue_tx,
            queue_rx,
            shutdown_tx,
            shutdown_rx,
            producer: None,
            active: None,
            sim_prices: HashMap::new(),
        }
    }

    pub fn active_source(&self) -> Option<DataSource> {
        self.active
    }

    /// Populate the snapshot from the selected source. Live streaming
    /// starts the background producer; the other paths are synchronous.
    /// Missing provider credentials abort before any acquisition attempt.
    pub async fn acquire(
        &mut self,
        source: DataSource,
        config: &AppConfig,
        snapshot: &mut MarketSnapshot,
    ) -> Result<(), TradingError> {
        self.active = Some(source);

        match source {
            DataSource::Historical => {
                info!("Fetching historical market data...");
                let client = HistoricalDataClient::new(&config.alpaca)?;
                for symbol in &self.symbols {
                    let bars = client.daily_bars(symbol).await?;
                    info!("  {}: {} daily bars", symbol, bars.len());
                    snapshot.set_historical_bars(symbol.clone(), bars);
                }
            }
            DataSource::LiveStream => {
                info!("Starting live market data stream...");
                let (api_key, secret_key) = config.alpaca.credentials()?;
                let stream_config = StreamConfig {
                    stream_url: config.alpaca.stream_url.clone(),
                    api_key: api_key.to_string(),
                    secret_key: secret_key.to_string(),
                    symbols: self.symbols.clone(),
                };
                self.producer = Some(spawn_producer(
                    stream_config,
                    self.queue_tx.clone(),
                    self.shutdown_rx.clone(),
                ));
            }
            DataSource::SimulatedStream | DataSource::SimulatedHistorical => {
                info!("Generating simulated market data...");
                simulated::populate(snapshot, &self.symbols);
                for symbol in &self.symbols {
                    self.sim_prices
                        .insert(symbol.clone(), simulated::base_price(symbol));
                }
            }
        }

        self.drain_into(snapshot);
        Ok(())
    }

    /// On the simulated stream path, enqueue one price tick per symbol so
    /// each watch cycle observes fresh data. No-op on the other paths.
    pub fn pump_simulated(&mut self) {
        if self.active != Some(DataSource::SimulatedStream) {
            return;
        }
        for symbol in &self.symbols {
            let last = self
                .sim_prices
                .get(symbol)
                .copied()
                .unwrap_or_else(|| simulated::base_price(symbol));
            let tick = simulated::price_update(symbol, last);
            self.sim_prices.insert(symbol.clone(), tick.price);
            let _ = self.queue_tx.send(MarketMessage::Trade(tick));
        }
    }

    /// Drain every currently queued message into the snapshot, in arrival
    /// order. Non-blocking: stops as soon as the queue reports empty.
    pub fn drain_into(&mut self, snapshot: &mut MarketSnapshot) -> usize {
        let mut drained = 0;
        while let Ok(message) = self.queue_rx.try_recv() {
            snapshot.apply(message);
            drained += 1;
        }
        drained
    }

    /// Signal the producer to stop and wait for it to release its
    /// subscriptions and exit.
    pub async fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.producer.take() {
            if let Err(e) = handle.await {
                warn!("Producer task ended abnormally: {}", e);
            }
            info!("Market data connections closed.");
        }
    }

    /// Test/fallback hook: a sender feeding the gateway queue.
    pub fn queue_sender(&self) -> mpsc::UnboundedSender<MarketMessage> {
        self.queue_tx.clone()
    }
}

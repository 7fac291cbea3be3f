//! Historical daily bars over the Alpaca data REST API

use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::config::AlpacaConfig;
use crate::constants;
use crate::error::TradingError;
use crate::market::types::HistoricalBar;

#[derive(Clone)]
pub struct HistoricalDataClient {
    client: Client,
    data_url: String,
    api_key: String,
    secret_key: String,
}

#[derive(Deserialize)]
struct BarsResponse {
    #[serde(default)]
    bars: Option<Vec<HistoricalBar>>,
}

impl HistoricalDataClient {
    /// Build a client from configuration. Missing credentials are fatal
    /// here, before any request is made.
    pub fn new(config: &AlpacaConfig) -> Result<Self, TradingError> {
        let (api_key, secret_key) = config.credentials()?;
        Ok(Self {
            client: Client::new(),
            data_url: config.data_url.clone(),
            api_key: api_key.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    /// Daily bars for one symbol over the trailing lookback window,
    /// oldest first.
    pub async fn daily_bars(&self, symbol: &str) -> Result<Vec<HistoricalBar>, TradingError> {
        let end = Utc::now().date_naive();
        let start = end - Duration::days(constants::market::HISTORICAL_LOOKBACK_DAYS);

        let url = format!(
            "{}/v2/stocks/{}/bars?timeframe=1Day&start={}&end={}&limit=1000",
            self.data_url, symbol, start, end
        );

        info!("Fetching historical bars for {}...", symbol);
        let resp = self
            .client
            .get(&url)
            .header("APCA-API-KEY-ID", &self.api_key)
            .header("APCA-API-SECRET-KEY", &self.secret_key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TradingError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let data: BarsResponse = resp.json().await?;
        Ok(data.bars.unwrap_or_default())
    }
}

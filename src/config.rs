use serde::Deserialize;
use std::env;
use std::fs;
use tracing::warn;

use crate::error::TradingError;

#[derive(Clone, Debug, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: default_model(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AlpacaConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_data_url")]
    pub data_url: String,
    #[serde(default = "default_stream_url")]
    pub stream_url: String,
}

impl Default for AlpacaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            data_url: default_data_url(),
            stream_url: default_stream_url(),
        }
    }
}

impl AlpacaConfig {
    /// Both credential strings, or a fatal configuration error.
    /// Callers invoke this before issuing any request.
    pub fn credentials(&self) -> Result<(&str, &str), TradingError> {
        if self.api_key.is_empty() || self.secret_key.is_empty() {
            return Err(TradingError::Config(
                "APCA_API_KEY_ID and APCA_API_SECRET_KEY must be set".to_string(),
            ));
        }
        Ok((&self.api_key, &self.secret_key))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// When set, both data paths route to the simulated generator
    #[serde(default)]
    pub use_simulation: bool,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub alpaca: AlpacaConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            use_simulation: false,
            llm: LlmConfig::default(),
            alpaca: AlpacaConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, TradingError> {
        Self::load_from("config.yaml")
    }

    /// Read config from a YAML file, falling back to defaults when the file
    /// is absent, then overlay environment variables. Credentials are only
    /// validated at the point a data path needs them.
    pub fn load_from(path: &str) -> Result<Self, TradingError> {
        let mut config = match fs::read_to_string(path) {
            Ok(content) => {
                // Strip BOM if present
                let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
                serde_yaml::from_str(content)
                    .map_err(|e| TradingError::Parse(format!("{}: {}", path, e)))?
            }
            Err(_) => Self::default(),
        };
        config.apply_env();

        if config.alpaca.api_key.contains("your-alpaca-key")
            || config.alpaca.secret_key.contains("your-alpaca-secret")
        {
            warn!("Alpaca keys are still placeholders. Set APCA_API_KEY_ID and APCA_API_SECRET_KEY in .env.");
        }

        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = env::var("APCA_API_KEY_ID") {
            self.alpaca.api_key = v;
        }
        if let Ok(v) = env::var("APCA_API_SECRET_KEY") {
            self.alpaca.secret_key = v;
        }
        if self.llm.api_key.is_none() {
            if let Ok(v) = env::var("OPENAI_API_KEY") {
                self.llm.api_key = Some(v);
            }
        }
        if let Ok(v) = env::var("STRATWATCH_USE_SIMULATION") {
            self.use_simulation = matches!(v.as_str(), "1" | "true" | "yes");
        }
    }
}

fn default_symbols() -> Vec<String> {
    ["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA", "SPY"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_data_url() -> String {
    "https://data.alpaca.markets".to_string()
}

fn default_stream_url() -> String {
    "wss://stream.data.alpaca.markets/v2/iex".to_string()
}

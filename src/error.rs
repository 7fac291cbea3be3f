//! Custom error types for the trading workflow
//!
//! Provides structured, typed errors instead of generic Box<dyn Error>

use thiserror::Error;

/// Top-level trading workflow errors
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Data provider error: HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl From<String> for TradingError {
    fn from(err: String) -> Self {
        TradingError::Config(err)
    }
}

impl From<&str> for TradingError {
    fn from(err: &str) -> Self {
        TradingError::Config(err.to_string())
    }
}

//! stratwatch - single-strategy trading watcher
//!
//! This library provides the core functionality for one automated trading
//! decision cycle: strategy interpretation, market data acquisition,
//! signal evaluation and simulated trade execution.

pub mod config;
pub mod constants;
pub mod error;
pub mod evaluator;
pub mod market;
pub mod portfolio;
pub mod strategy;
pub mod workflow;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::TradingError;
pub use evaluator::{evaluate, Evaluation};
pub use market::gateway::{select_source, DataSource, MarketDataGateway};
pub use market::snapshot::MarketSnapshot;
pub use portfolio::{PortfolioLedger, TradeAction, TradeSignal, Transaction};
pub use strategy::interpreter::{LlmClient, ParseOutcome, StrategyInterpreter};
pub use strategy::rule::{Comparator, PriceCondition, StrategyRule};
pub use workflow::{WorkflowController, WorkflowStage};

#[cfg(test)]
mod config_tests;

//! Portfolio ledger
//!
//! The authoritative cash/position/transaction record. Cash never goes
//! negative, positions never go negative, and a symbol entry is removed
//! the moment its quantity reaches zero. Every attempted trade produces
//! exactly one transaction record, failed attempts included; the history
//! is append-only and never rewound.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::market::snapshot::MarketSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

/// One-shot recommendation for the current cycle. Produced fresh each
/// evaluation, consumed immediately, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct TradeSignal {
    pub action: TradeAction,
    pub symbol: String,
    pub quantity: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Executed,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    InsufficientFunds,
    InsufficientShares,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub timestamp: String,
    pub action: TradeAction,
    pub symbol: String,
    pub quantity: u32,
    pub price: f64,
    pub value: f64,
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Holding {
    pub symbol: String,
    pub quantity: u32,
    pub price: f64,
    pub value: f64,
}

/// Structured portfolio report. Side-effect free to produce; generating it
/// twice from the same state yields the same values.
#[derive(Clone, Debug, Serialize)]
pub struct PortfolioReport {
    pub timestamp: String,
    pub cash: f64,
    pub holdings: Vec<Holding>,
    pub portfolio_value: f64,
    pub profit_loss: f64,
    pub profit_loss_percentage: f64,
    pub transaction_count: usize,
    pub last_transaction: Option<Transaction>,
}

#[derive(Clone, Debug)]
pub struct PortfolioLedger {
    cash: f64,
    positions: HashMap<String, u32>,
    history: Vec<Transaction>,
    starting_capital: f64,
}

impl PortfolioLedger {
    pub fn new(starting_capital: f64) -> Self {
        Self {
            cash: starting_capital,
            positions: HashMap::new(),
            history: Vec::new(),
            starting_capital,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Current share count for a symbol; zero when not held.
    pub fn position(&self, symbol: &str) -> u32 {
        self.positions.get(symbol).copied().unwrap_or(0)
    }

    pub fn positions(&self) -> &HashMap<String, u32> {
        &self.positions
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    /// True once the history holds at least one executed buy and one
    /// executed sell for the symbol: the strategy's full cycle.
    pub fn has_completed_cycle(&self, symbol: &str) -> bool {
        let mut buy_executed = false;
        let mut sell_executed = false;
        for tx in &self.history {
            if tx.status == TransactionStatus::Executed && tx.symbol == symbol {
                match tx.action {
                    TradeAction::Buy => buy_executed = true,
                    TradeAction::Sell => sell_executed = true,
                }
            }
        }
        buy_executed && sell_executed
    }

    /// Apply one trade signal at the given execution price. Rejected
    /// trades leave cash and positions untouched; every attempt appends
    /// exactly one record.
    pub fn execute(&mut self, signal: &TradeSignal, price: f64) -> &Transaction {
        let value = signal.quantity as f64 * price;
        let mut transaction = Transaction {
            id: Uuid::new_v4(),
            timestamp: Utc::now().to_rfc3339(),
            action: signal.action,
            symbol: signal.symbol.clone(),
            quantity: signal.quantity,
            price,
            value,
            status: TransactionStatus::Executed,
            reason: None,
        };

        match signal.action {
            TradeAction::Buy => {
                if value > self.cash {
                    warn!(
                        "Insufficient funds to buy {} shares of {} at ${:.2}",
                        signal.quantity, signal.symbol, price
                    );
                    transaction.status = TransactionStatus::Failed;
                    transaction.reason = Some(FailureReason::InsufficientFunds);
                } else {
                    self.cash -= value;
                    *self.positions.entry(signal.symbol.clone()).or_insert(0) += signal.quantity;
                    info!(
                        "Bought {} shares of {} at ${:.2}",
                        signal.quantity, signal.symbol, price
                    );
                }
            }
            TradeAction::Sell => {
                let held = self.position(&signal.symbol);
                if signal.quantity > held {
                    warn!(
                        "Insufficient shares to sell {} shares of {}",
                        signal.quantity, signal.symbol
                    );
                    transaction.status = TransactionStatus::Failed;
                    transaction.reason = Some(FailureReason::InsufficientShares);
                } else {
                    self.cash += value;
                    let remaining = held - signal.quantity;
                    if remaining == 0 {
                        self.positions.remove(&signal.symbol);
                    } else {
                        self.positions.insert(signal.symbol.clone(), remaining);
                    }
                    info!(
                        "Sold {} shares of {} at ${:.2}",
                        signal.quantity, signal.symbol, price
                    );
                }
            }
        }

        self.history.push(transaction);
        self.history.last().unwrap()
    }

    /// Current portfolio report against snapshot prices. Holdings with no
    /// resolvable price are omitted from the valuation.
    pub fn report(&self, snapshot: &MarketSnapshot) -> PortfolioReport {
        let mut holdings = Vec::new();
        let mut portfolio_value = self.cash;

        let mut symbols: Vec<&String> = self.positions.keys().collect();
        symbols.sort();

        for symbol in symbols {
            let quantity = self.positions[symbol];
            if let Some(price) = snapshot.resolve_price(symbol) {
                let value = quantity as f64 * price;
                portfolio_value += value;
                holdings.push(Holding {
                    symbol: symbol.clone(),
                    quantity,
                    price,
                    value,
                });
            }
        }

        let profit_loss = portfolio_value - self.starting_capital;
        let profit_loss_percentage = if self.starting_capital > 0.0 {
            profit_loss / self.starting_capital * 100.0
        } else {
            0.0
        };

        PortfolioReport {
            timestamp: Utc::now().to_rfc3339(),
            cash: self.cash,
            holdings,
            portfolio_value,
            profit_loss,
            profit_loss_percentage,
            transaction_count: self.history.len(),
            last_transaction: self.history.last().cloned(),
        }
    }

    /// Human-readable listing of every transaction, for the end-of-run
    /// summary.
    pub fn summary(&self) -> String {
        if self.history.is_empty() {
            return "No transactions were made.".to_string();
        }

        let mut out = String::from("Transaction History:\n");
        for (i, tx) in self.history.iter().enumerate() {
            let action = match tx.action {
                TradeAction::Buy => "BUY",
                TradeAction::Sell => "SELL",
            };
            let status = match tx.status {
                TransactionStatus::Executed => String::new(),
                TransactionStatus::Failed => match tx.reason {
                    Some(FailureReason::InsufficientFunds) => {
                        " [FAILED: insufficient funds]".to_string()
                    }
                    Some(FailureReason::InsufficientShares) => {
                        " [FAILED: insufficient shares]".to_string()
                    }
                    None => " [FAILED]".to_string(),
                },
            };
            out.push_str(&format!(
                "  {}. {} {} shares of {} at ${:.2} (${:.2}){}\n",
                i + 1,
                action,
                tx.quantity,
                tx.symbol,
                tx.price,
                tx.value,
                status
            ));
        }
        out
    }
}

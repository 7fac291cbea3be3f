//! Signal evaluator
//!
//! Maps one strategy rule, the current snapshot and current positions into
//! at most one trade signal per invocation, and detects when the strategy
//! has finished its full buy/sell cycle.

use tracing::info;

use crate::constants::trading::BUY_LOT_SIZE;
use crate::market::snapshot::MarketSnapshot;
use crate::portfolio::{PortfolioLedger, TradeAction, TradeSignal};
use crate::strategy::rule::StrategyRule;

#[derive(Clone, Debug, PartialEq)]
pub enum Evaluation {
    /// Act on this signal now
    Signal(TradeSignal),
    /// The strategy has executed a full buy/sell cycle; stop watching
    Complete,
    /// Nothing to do this cycle; retry on the next
    Hold,
}

/// Evaluate one cycle.
///
/// Completion is checked first. Buy requires an entry condition and a flat
/// position; sell requires an exit condition and an open position, so the
/// position guard makes the two mutually exclusive. A missing rule, asset
/// or price is an expected not-ready state, never an error.
pub fn evaluate(
    rule: &StrategyRule,
    snapshot: &MarketSnapshot,
    ledger: &PortfolioLedger,
) -> Evaluation {
    let Some(asset) = rule.asset.as_deref() else {
        return Evaluation::Hold;
    };

    if ledger.has_completed_cycle(asset) {
        info!("Strategy fully executed (buy and sell completed) for {}", asset);
        return Evaluation::Complete;
    }

    let Some(current_price) = snapshot.resolve_price(asset) else {
        info!("No market data found for asset: {}", asset);
        return Evaluation::Hold;
    };

    let position = ledger.position(asset);

    if position == 0 {
        if let Some(entry) = &rule.entry_condition {
            info!(
                "Checking buy condition: {:?} {} against price {:.2}",
                entry.comparator, entry.threshold_price, current_price
            );
            if entry.comparator.matches(current_price, entry.threshold_price) {
                let signal = TradeSignal {
                    action: TradeAction::Buy,
                    symbol: asset.to_string(),
                    quantity: BUY_LOT_SIZE,
                };
                info!("Generated BUY signal: {:?}", signal);
                return Evaluation::Signal(signal);
            }
        }
    } else if let Some(exit) = &rule.exit_condition {
        info!(
            "Checking sell condition: {:?} {} against price {:.2}",
            exit.comparator, exit.threshold_price, current_price
        );
        if exit.comparator.matches(current_price, exit.threshold_price) {
            let signal = TradeSignal {
                action: TradeAction::Sell,
                symbol: asset.to_string(),
                quantity: position,
            };
            info!("Generated SELL signal: {:?}", signal);
            return Evaluation::Signal(signal);
        }
    }

    Evaluation::Hold
}

//! Workflow controller
//!
//! The finite-state machine that sequences interpretation, data
//! acquisition, evaluation and execution:
//!
//! AwaitRule → InitLedger → StartWatching → SelectSource → Watch → Stopped
//!
//! The controller owns the shared context exclusively; components read and
//! write it only through their call signatures. The watch loop is a
//! single-threaded cooperative cycle; the only other execution context is
//! the gateway's stream producer, which communicates solely by enqueue.

use chrono::Utc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::constants;
use crate::error::TradingError;
use crate::evaluator::{evaluate, Evaluation};
use crate::market::gateway::{select_source, MarketDataGateway};
use crate::market::hours::{eastern_clock, market_is_open};
use crate::market::snapshot::MarketSnapshot;
use crate::portfolio::{PortfolioLedger, PortfolioReport};
use crate::strategy::interpreter::StrategyInterpreter;
use crate::strategy::rule::StrategyRule;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowStage {
    AwaitRule,
    InitLedger,
    StartWatching,
    SelectSource,
    Watch,
    Stopped,
}

/// Shared context threaded through the components. Owned exclusively by
/// the controller; never mutated concurrently.
pub struct WorkflowContext {
    pub rule: StrategyRule,
    pub snapshot: MarketSnapshot,
    pub ledger: PortfolioLedger,
    pub market_open: bool,
    pub is_watching: bool,
    pub use_simulation: bool,
}

pub struct WorkflowController {
    config: AppConfig,
    interpreter: StrategyInterpreter,
    gateway: MarketDataGateway,
    ctx: WorkflowContext,
    stage: WorkflowStage,
}

impl WorkflowController {
    pub fn new(config: AppConfig, interpreter: StrategyInterpreter) -> Self {
        let gateway = MarketDataGateway::new(config.symbols.clone());
        let ctx = WorkflowContext {
            rule: StrategyRule::empty(),
            snapshot: MarketSnapshot::new(),
            ledger: PortfolioLedger::new(constants::portfolio::STARTING_CAPITAL),
            market_open: false,
            is_watching: false,
            use_simulation: config.use_simulation,
        };
        Self {
            config,
            interpreter,
            gateway,
            ctx,
            stage: WorkflowStage::AwaitRule,
        }
    }

    fn transition(&mut self, next: WorkflowStage) {
        info!("Workflow: {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    /// Run the full workflow for one free-text strategy.
    pub async fn run(self, user_strategy: &str) -> Result<PortfolioReport, TradingError> {
        let outcome = self.interpreter.interpret(user_strategy).await;
        let rule = outcome.into_rule();
        if rule.is_empty() {
            warn!("No actionable rule was produced; the session will watch without trading.");
        }
        self.run_with_rule(rule).await
    }

    /// Run the workflow from `InitLedger` with an already-interpreted rule.
    pub async fn run_with_rule(mut self, rule: StrategyRule) -> Result<PortfolioReport, TradingError> {
        self.ctx.rule = rule;

        self.transition(WorkflowStage::InitLedger);
        self.ctx.ledger = PortfolioLedger::new(constants::portfolio::STARTING_CAPITAL);
        info!("Portfolio initialized with ${:.2}", self.ctx.ledger.cash());

        self.transition(WorkflowStage::StartWatching);
        info!("Starting to watch the market for trading opportunities...");

        self.transition(WorkflowStage::SelectSource);
        let now = Utc::now();
        self.ctx.market_open = market_is_open(now);
        info!(
            "Market open check: now is {}. Market open: {}",
            eastern_clock(now),
            self.ctx.market_open
        );

        let source = select_source(self.ctx.market_open, self.ctx.use_simulation);
        info!("Routing to data source: {:?}", source);
        self.gateway
            .acquire(source, &self.config, &mut self.ctx.snapshot)
            .await?;
        // First successful population of the snapshot starts the watch.
        self.ctx.is_watching = true;

        self.transition(WorkflowStage::Watch);
        self.watch_loop().await;

        self.transition(WorkflowStage::Stopped);
        self.gateway.shutdown().await;

        let report = self.ctx.ledger.report(&self.ctx.snapshot);
        info!("Final cash balance: ${:.2}", self.ctx.ledger.cash());
        info!("{}", self.ctx.ledger.summary());
        Ok(report)
    }

    async fn watch_loop(&mut self) {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            self.gateway.pump_simulated();
            let drained = self.gateway.drain_into(&mut self.ctx.snapshot);
            if drained > 0 {
                let (bars, quotes, trades) = self.ctx.snapshot.stream_counts();
                info!(
                    "Drained {} messages (bars: {}, quotes: {}, trades: {})",
                    drained, bars, quotes, trades
                );
            }

            match evaluate(&self.ctx.rule, &self.ctx.snapshot, &self.ctx.ledger) {
                Evaluation::Complete => {
                    info!("Strategy conditions met. Stopping market watch.");
                    self.ctx.is_watching = false;
                }
                Evaluation::Signal(signal) => {
                    // Execution price is resolved at execution time; it may
                    // differ from the evaluation-time price.
                    match self.ctx.snapshot.resolve_price(&signal.symbol) {
                        Some(price) => {
                            self.ctx.ledger.execute(&signal, price);
                        }
                        None => {
                            warn!("Could not determine current price for {}", signal.symbol);
                        }
                    }
                }
                Evaluation::Hold => {}
            }

            if !self.ctx.is_watching {
                break;
            }

            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Interrupt received; stopping the market watch...");
                    self.ctx.is_watching = false;
                    break;
                }
                _ = tokio::time::sleep(constants::market::WATCH_INTERVAL) => {}
            }
        }
    }
}

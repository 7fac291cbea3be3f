//! Structured strategy rules
//!
//! The interpreter turns free-text strategies into one of these. A rule is
//! immutable once produced; a missing asset or condition simply disables
//! that signal direction.

use serde::{Deserialize, Serialize};

use crate::constants::trading::PRICE_EQUAL_TOLERANCE;

/// Price comparison operator for entry/exit conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    Below,
    Above,
    Equal,
}

impl Comparator {
    /// True when `price` satisfies this comparator against `threshold`.
    /// Equality uses a small tolerance band.
    pub fn matches(self, price: f64, threshold: f64) -> bool {
        match self {
            Comparator::Below => price < threshold,
            Comparator::Above => price > threshold,
            Comparator::Equal => (price - threshold).abs() < PRICE_EQUAL_TOLERANCE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceCondition {
    #[serde(rename = "condition")]
    pub comparator: Comparator,
    #[serde(rename = "price")]
    pub threshold_price: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyRule {
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub entry_condition: Option<PriceCondition>,
    #[serde(default)]
    pub exit_condition: Option<PriceCondition>,
}

impl StrategyRule {
    /// A rule that yields no signals.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.asset.is_none() && self.entry_condition.is_none() && self.exit_condition.is_none()
    }
}

//! Pre-trade rule checks on a signal before it is sized.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::config::TradeRulesConfig;

/// Result of a pre-trade check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeCheck {
    pub approved: bool,
    pub reason: String,
}

impl TradeCheck {
    fn pass() -> Self {
        Self {
            approved: true,
            reason: "Trade validated".to_string(),
        }
    }

    fn fail(reason: String) -> Self {
        debug!(%reason, "Trade check failed");
        Self {
            approved: false,
            reason,
        }
    }
}

/// Checks position limits, confidence and stop-loss/take-profit bounds.
#[derive(Debug, Clone)]
pub struct TradeGate {
    rules: TradeRulesConfig,
    max_open_positions: u32,
}

impl TradeGate {
    pub fn new(rules: TradeRulesConfig, max_open_positions: u32) -> Self {
        Self {
            rules,
            max_open_positions,
        }
    }

    /// Run the rules in order; the first failure is reported.
    pub fn check(
        &self,
        confidence: Decimal,
        stop_loss_percent: Decimal,
        take_profit_percent: Decimal,
        open_positions: u32,
    ) -> TradeCheck {
        if open_positions >= self.max_open_positions {
            return TradeCheck::fail(format!(
                "Position limit reached ({}/{})",
                open_positions, self.max_open_positions
            ));
        }

        if confidence < self.rules.confidence_threshold {
            return TradeCheck::fail(format!(
                "Confidence {} below threshold {}",
                confidence, self.rules.confidence_threshold
            ));
        }

        let (min_sl, max_sl) = (self.rules.min_stop_loss_percent, self.rules.max_stop_loss_percent);
        if stop_loss_percent < min_sl || stop_loss_percent > max_sl {
            return TradeCheck::fail(format!(
                "Invalid SL: {}% (must be {}-{}%)",
                stop_loss_percent, min_sl, max_sl
            ));
        }

        if take_profit_percent <= stop_loss_percent {
            return TradeCheck::fail(format!(
                "TP ({}%) must be greater than SL ({}%)",
                take_profit_percent, stop_loss_percent
            ));
        }

        TradeCheck::pass()
    }
}

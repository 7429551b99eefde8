//! Trade planning: turn a long/short proposal into a sized order plan.
//!
//! Pipeline: build both baskets → validate → classify → pre-trade checks →
//! size → attach per-asset notionals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::assets::AssetUniverse;
use crate::basket::{
    Basket, BasketBuilder, BasketCategory, BasketClassifier, BasketValidator, WeightingMethod,
    WeightingPolicy,
};
use crate::config::Config;
use crate::risk::{PositionSize, PositionSizer, SizingInput, SizingResult, TradeGate, VolatilityNormalizer};

fn default_weighting() -> String {
    WeightingMethod::Equal.as_str().to_string()
}

/// A proposed pair trade, as produced by the signal generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeProposal {
    pub long_assets: Vec<String>,
    pub short_assets: Vec<String>,
    /// Weighting method name; unknown names fall back to equal weighting
    #[serde(default = "default_weighting")]
    pub weighting: String,
    /// Volatility (%) per symbol, used for weighting and sizing
    #[serde(default)]
    pub volatilities: HashMap<String, Decimal>,
    /// Conviction score per symbol, for conviction weighting
    #[serde(default)]
    pub convictions: HashMap<String, Decimal>,
    /// Market cap per symbol, for market-cap weighting
    #[serde(default)]
    pub market_caps: HashMap<String, Decimal>,
    /// Signal confidence (0-10)
    pub confidence: Decimal,
    pub stop_loss_percent: Decimal,
    /// When present, the pre-trade rules (confidence threshold, SL/TP bounds) are enforced
    #[serde(default)]
    pub take_profit_percent: Option<Decimal>,
    #[serde(default)]
    pub open_positions: u32,
}

impl TradeProposal {
    /// Weighting policy for this proposal with its auxiliary data attached.
    pub fn weighting_policy(&self) -> WeightingPolicy {
        let method = WeightingMethod::parse_lenient(&self.weighting);
        let data = match method {
            WeightingMethod::Equal => HashMap::new(),
            WeightingMethod::Volatility => self.volatilities.clone(),
            WeightingMethod::Conviction => self.convictions.clone(),
            WeightingMethod::MarketCap => self.market_caps.clone(),
        };
        WeightingPolicy::from_method(method, data)
    }
}

/// Exchange-ready plan for an approved trade.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPlan {
    pub category: BasketCategory,
    pub weighting: WeightingMethod,
    /// Long side with per-asset notionals attached
    pub long_basket: Basket,
    /// Short side with per-asset notionals attached
    pub short_basket: Basket,
    pub sizing: PositionSize,
    /// Default slippage tolerance for the basket category (0.0-1.0)
    pub slippage: Decimal,
    pub generated_at: DateTime<Utc>,
}

/// Outcome of planning a proposal.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TradePlan {
    /// Baskets are valid and the trade is sized
    Approved(OrderPlan),
    /// Baskets are valid but a risk rule declined the trade
    Rejected {
        category: BasketCategory,
        reason: String,
    },
    /// One or both baskets failed validation
    Invalid { errors: Vec<String> },
}

impl TradePlan {
    pub fn order(&self) -> Option<&OrderPlan> {
        match self {
            TradePlan::Approved(order) => Some(order),
            _ => None,
        }
    }
}

/// Runs the full basket and sizing pipeline for trade proposals.
#[derive(Debug, Clone)]
pub struct TradePlanner {
    builder: BasketBuilder,
    validator: BasketValidator,
    classifier: BasketClassifier,
    gate: TradeGate,
    sizer: PositionSizer,
}

impl TradePlanner {
    /// Create a planner from configuration and the venue's asset universe.
    pub fn new(config: &Config, universe: AssetUniverse) -> Self {
        Self {
            builder: BasketBuilder::new(
                config.basket.clone(),
                config.volatility.clone(),
                universe.clone(),
            ),
            validator: BasketValidator::new(config.basket.clone(), universe.clone()),
            classifier: BasketClassifier::new(universe.clone()),
            gate: TradeGate::new(config.trade_rules.clone(), config.sizing.max_open_positions),
            sizer: PositionSizer::new(
                config.sizing.clone(),
                VolatilityNormalizer::new(config.volatility.clone(), universe),
            ),
        }
    }

    pub fn builder(&self) -> &BasketBuilder {
        &self.builder
    }

    pub fn validator(&self) -> &BasketValidator {
        &self.validator
    }

    pub fn classifier(&self) -> &BasketClassifier {
        &self.classifier
    }

    pub fn sizer(&self) -> &PositionSizer {
        &self.sizer
    }

    /// Plan a proposal end to end.
    pub fn plan(&self, proposal: &TradeProposal) -> TradePlan {
        let policy = proposal.weighting_policy();

        let long = self.builder.build(&proposal.long_assets, &policy);
        let short = self.builder.build(&proposal.short_assets, &policy);

        let mut errors = Vec::new();
        for (side, basket) in [("Long", &long), ("Short", &short)] {
            let validation = self.validator.validate(basket);
            errors.extend(
                validation
                    .errors
                    .into_iter()
                    .map(|e| format!("{} basket: {}", side, e)),
            );
        }
        if !errors.is_empty() {
            warn!(count = errors.len(), "Proposal baskets failed validation");
            return TradePlan::Invalid { errors };
        }

        let category = self.classifier.classify(&long, &short);

        if let Some(take_profit) = proposal.take_profit_percent {
            let check = self.gate.check(
                proposal.confidence,
                proposal.stop_loss_percent,
                take_profit,
                proposal.open_positions,
            );
            if !check.approved {
                return TradePlan::Rejected {
                    category,
                    reason: check.reason,
                };
            }
        }

        let input = SizingInput {
            confidence: proposal.confidence,
            long_basket: long,
            short_basket: short,
            volatilities: proposal.volatilities.clone(),
            open_positions: proposal.open_positions,
            stop_loss_percent: proposal.stop_loss_percent,
        };

        match self.sizer.size(&input) {
            SizingResult::Rejected { reason } => TradePlan::Rejected { category, reason },
            SizingResult::Approved(sizing) => {
                info!(
                    %category,
                    size_usd = %sizing.size_usd,
                    risk_usd = %sizing.risk_usd,
                    leverage = %sizing.leverage,
                    "Trade planned"
                );

                TradePlan::Approved(OrderPlan {
                    category,
                    weighting: policy.method(),
                    long_basket: input.long_basket.with_notional(sizing.long_size_usd),
                    short_basket: input.short_basket.with_notional(sizing.short_size_usd),
                    slippage: category.default_slippage(),
                    sizing,
                    generated_at: Utc::now(),
                })
            }
        }
    }
}

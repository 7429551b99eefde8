//! Weighting policies: turn a list of symbols into raw basket weights.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

use super::redistribute::{enforce_min_weight, equal_weights};
use crate::assets::AssetUniverse;
use crate::config::VolatilityConfig;
use crate::utils::decimal::normalize;

/// Conviction assumed for symbols without a score.
const DEFAULT_CONVICTION: Decimal = dec!(5.0);

/// Market cap assumed for symbols missing from the cap table.
const DEFAULT_MARKET_CAP: Decimal = dec!(10);

/// Name of a weighting method, as it appears in signals and config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingMethod {
    Equal,
    Volatility,
    Conviction,
    MarketCap,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weighting method: {0}")]
pub struct UnknownWeightingMethod(pub String);

impl FromStr for WeightingMethod {
    type Err = UnknownWeightingMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal" => Ok(Self::Equal),
            "volatility" | "inverse_volatility" | "risk_parity" => Ok(Self::Volatility),
            "conviction" => Ok(Self::Conviction),
            "market_cap" | "marketcap" => Ok(Self::MarketCap),
            _ => Err(UnknownWeightingMethod(s.to_string())),
        }
    }
}

impl WeightingMethod {
    /// Parse a method name, falling back to [`WeightingMethod::Equal`] for unknown names.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|e: UnknownWeightingMethod| {
            warn!(method = %e.0, "Unknown weighting method, using equal");
            Self::Equal
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Volatility => "volatility",
            Self::Conviction => "conviction",
            Self::MarketCap => "market_cap",
        }
    }
}

impl fmt::Display for WeightingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighting rule plus the per-symbol data it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightingPolicy {
    /// 1/n for every asset
    Equal,
    /// Weight proportional to 1/volatility (risk-parity style)
    InverseVolatility(HashMap<String, Decimal>),
    /// Weight proportional to signal conviction per asset
    Conviction(HashMap<String, Decimal>),
    /// Weight proportional to market cap; an empty map uses the reference caps
    MarketCap(HashMap<String, Decimal>),
}

impl WeightingPolicy {
    /// Pair a method with its auxiliary data.
    pub fn from_method(method: WeightingMethod, data: HashMap<String, Decimal>) -> Self {
        match method {
            WeightingMethod::Equal => Self::Equal,
            WeightingMethod::Volatility => Self::InverseVolatility(data),
            WeightingMethod::Conviction => Self::Conviction(data),
            WeightingMethod::MarketCap => Self::MarketCap(data),
        }
    }

    pub fn method(&self) -> WeightingMethod {
        match self {
            Self::Equal => WeightingMethod::Equal,
            Self::InverseVolatility(_) => WeightingMethod::Volatility,
            Self::Conviction(_) => WeightingMethod::Conviction,
            Self::MarketCap(_) => WeightingMethod::MarketCap,
        }
    }

    /// Weights for `symbols`, summing to one, with the minimum-weight floor applied
    /// to every policy except `Equal`.
    pub fn allocate(
        &self,
        symbols: &[String],
        universe: &AssetUniverse,
        volatility: &VolatilityConfig,
        min_weight: Decimal,
    ) -> Vec<Decimal> {
        let n = symbols.len();
        if n == 0 {
            return Vec::new();
        }

        let raw = match self {
            Self::Equal => return equal_weights(n),
            Self::InverseVolatility(vols) => {
                let inverse: Vec<Decimal> = symbols
                    .iter()
                    .map(|s| {
                        let vol = vols
                            .get(s)
                            .copied()
                            .unwrap_or_else(|| volatility.baseline(universe.class_of(s)));
                        Decimal::ONE / vol.max(volatility.min_weighting_volatility)
                    })
                    .collect();
                normalize(&inverse)
            }
            Self::Conviction(scores) => {
                if scores.is_empty() {
                    return equal_weights(n);
                }
                let values: Vec<Decimal> = symbols
                    .iter()
                    .map(|s| scores.get(s).copied().unwrap_or(DEFAULT_CONVICTION))
                    .collect();
                normalize(&values)
            }
            Self::MarketCap(caps) => {
                let table = if caps.is_empty() {
                    universe.reference_caps()
                } else {
                    caps
                };
                let values: Vec<Decimal> = symbols
                    .iter()
                    .map(|s| table.get(s).copied().unwrap_or(DEFAULT_MARKET_CAP))
                    .collect();
                normalize(&values)
            }
        };

        let Some(raw) = raw else {
            debug!(method = %self.method(), "Weights do not sum to a positive total, using equal");
            return equal_weights(n);
        };

        enforce_min_weight(&raw, min_weight)
    }
}

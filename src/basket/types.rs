//! Basket value types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal::round_usd;

/// One asset and its share of a basket side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetWeight {
    /// Ticker symbol (e.g., "BTC", "XAU")
    #[serde(default, alias = "coin")]
    pub symbol: String,
    /// Fraction of the side allocated to this asset (0.0-1.0)
    #[serde(default)]
    pub weight: Decimal,
    /// USD notional for this asset, attached once the side is sized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notional: Option<Decimal>,
}

impl AssetWeight {
    pub fn new(symbol: impl Into<String>, weight: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            weight,
            notional: None,
        }
    }
}

/// Ordered set of weighted assets forming one side of a pair trade.
///
/// Baskets are values: sizing annotations produce a new basket rather than
/// mutating the validated one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Basket {
    assets: Vec<AssetWeight>,
}

impl Basket {
    pub fn new(assets: Vec<AssetWeight>) -> Self {
        Self { assets }
    }

    /// Convenience constructor from `(symbol, weight)` pairs.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, Decimal)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(symbol, weight)| AssetWeight::new(symbol, weight))
                .collect(),
        )
    }

    pub fn assets(&self) -> &[AssetWeight] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|a| a.symbol.as_str())
    }

    pub fn weight_of(&self, symbol: &str) -> Option<Decimal> {
        self.assets
            .iter()
            .find(|a| a.symbol == symbol)
            .map(|a| a.weight)
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> Decimal {
        self.assets.iter().map(|a| a.weight).sum()
    }

    /// Copy of this basket with `weight × side_size_usd` attached to every asset.
    pub fn with_notional(&self, side_size_usd: Decimal) -> Basket {
        Basket::new(
            self.assets
                .iter()
                .map(|a| AssetWeight {
                    symbol: a.symbol.clone(),
                    weight: a.weight,
                    notional: Some(round_usd(a.weight * side_size_usd)),
                })
                .collect(),
        )
    }
}

//! Basket construction: trim, weight, floor, round.

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, error, warn};

use super::presets::BasketPreset;
use super::types::{AssetWeight, Basket};
use super::weighting::WeightingPolicy;
use crate::assets::AssetUniverse;
use crate::config::{BasketConfig, VolatilityConfig};
use crate::utils::decimal::round_to_precision;

/// Builds weighted baskets for one side of a pair trade.
#[derive(Debug, Clone)]
pub struct BasketBuilder {
    config: BasketConfig,
    volatility: VolatilityConfig,
    universe: AssetUniverse,
}

impl BasketBuilder {
    /// Create a new basket builder.
    pub fn new(config: BasketConfig, volatility: VolatilityConfig, universe: AssetUniverse) -> Self {
        Self {
            config,
            volatility,
            universe,
        }
    }

    /// Build a basket from symbols using the given weighting policy.
    ///
    /// Inputs longer than `max_assets_per_side` are trimmed to the leading
    /// symbols. Weights are rounded to `weight_decimals`; the small drift this
    /// introduces in the sum is left for the validator's tolerance.
    pub fn build<S: AsRef<str>>(&self, symbols: &[S], policy: &WeightingPolicy) -> Basket {
        if symbols.is_empty() {
            error!("Cannot create basket: no assets provided");
            return Basket::default();
        }

        let max_assets = self.config.max_assets_per_side;
        if symbols.len() > max_assets {
            warn!(
                from = symbols.len(),
                to = max_assets,
                "Trimming basket to maximum assets per side"
            );
        }

        let symbols: Vec<String> = symbols
            .iter()
            .take(max_assets)
            .map(|s| s.as_ref().to_string())
            .collect();

        let weights = policy.allocate(
            &symbols,
            &self.universe,
            &self.volatility,
            self.config.min_weight_per_asset,
        );

        let assets: Vec<AssetWeight> = symbols
            .into_iter()
            .zip(weights)
            .map(|(symbol, weight)| {
                AssetWeight::new(symbol, round_to_precision(weight, self.config.weight_decimals))
            })
            .collect();

        debug!(
            method = %policy.method(),
            assets = assets.len(),
            "Built basket"
        );

        Basket::new(assets)
    }

    /// Suggest a long/short basket pair for a named strategy preset.
    ///
    /// Both sides are inverse-volatility weighted. Symbols without a supplied
    /// volatility use their asset-class baseline.
    pub fn suggest(
        &self,
        preset: BasketPreset,
        volatilities: &HashMap<String, Decimal>,
    ) -> (Basket, Basket) {
        let (long_assets, short_assets) = preset.assets();

        let vols: HashMap<String, Decimal> = long_assets
            .iter()
            .chain(short_assets.iter())
            .map(|symbol| {
                let vol = volatilities
                    .get(*symbol)
                    .copied()
                    .unwrap_or_else(|| self.volatility.baseline(self.universe.class_of(symbol)));
                (symbol.to_string(), vol)
            })
            .collect();

        let policy = WeightingPolicy::InverseVolatility(vols);
        debug!(preset = %preset, "Suggesting baskets");

        (self.build(long_assets, &policy), self.build(short_assets, &policy))
    }
}

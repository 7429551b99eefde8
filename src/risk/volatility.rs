//! Cross-asset volatility normalization.
//!
//! Produces a single multiplier on the risk budget so that pair trades across
//! asset classes with very different native volatility (metals vs crypto) are
//! sized comparably to same-class trades.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::assets::{AssetClass, AssetUniverse};
use crate::basket::Basket;
use crate::config::VolatilityConfig;
use crate::utils::decimal::mean;

/// Same-class volatility bands: `(avg_vol above, multiplier)`, checked in order.
const HIGH_VOL_BANDS: [(Decimal, Decimal); 2] = [(dec!(10), dec!(0.6)), (dec!(7), dec!(0.8))];

/// Same-class average volatility below which size is increased.
const LOW_VOL_THRESHOLD: Decimal = dec!(2);
const LOW_VOL_MULTIPLIER: Decimal = dec!(1.2);

/// Volatility profile of a long/short pair and the resulting multiplier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityAdjustment {
    pub long_vol: Decimal,
    pub short_vol: Decimal,
    pub avg_vol: Decimal,
    pub cross_asset: bool,
    pub multiplier: Decimal,
}

/// Computes volatility adjustments from per-symbol volatility readings.
#[derive(Debug, Clone)]
pub struct VolatilityNormalizer {
    config: VolatilityConfig,
    universe: AssetUniverse,
}

impl VolatilityNormalizer {
    /// Create a new volatility normalizer.
    pub fn new(config: VolatilityConfig, universe: AssetUniverse) -> Self {
        Self { config, universe }
    }

    /// Unweighted mean volatility of a basket, using class baselines for missing symbols.
    pub fn basket_volatility(
        &self,
        basket: &Basket,
        volatilities: &HashMap<String, Decimal>,
    ) -> Decimal {
        let vols: Vec<Decimal> = basket
            .symbols()
            .map(|symbol| {
                volatilities
                    .get(symbol)
                    .copied()
                    .unwrap_or_else(|| self.config.baseline(self.universe.class_of(symbol)))
            })
            .collect();

        mean(&vols).unwrap_or(self.config.unknown_baseline)
    }

    /// Adjustment multiplier for a long/short pair.
    pub fn adjustment(
        &self,
        long: &Basket,
        short: &Basket,
        volatilities: &HashMap<String, Decimal>,
    ) -> VolatilityAdjustment {
        let long_vol = self.basket_volatility(long, volatilities);
        let short_vol = self.basket_volatility(short, volatilities);
        let avg_vol = long_vol / dec!(2) + short_vol / dec!(2);

        let cross_asset =
            self.universe.classes_of(long.symbols()) != self.universe.classes_of(short.symbols());

        let multiplier = if cross_asset {
            self.cross_asset_multiplier(avg_vol)
        } else {
            same_class_multiplier(avg_vol)
        };

        debug!(
            %long_vol,
            %short_vol,
            %avg_vol,
            cross_asset,
            %multiplier,
            "Volatility adjustment"
        );

        VolatilityAdjustment {
            long_vol,
            short_vol,
            avg_vol,
            cross_asset,
            multiplier,
        }
    }

    /// Normalize to crypto-equivalent risk: boost low-vol pairs, shrink high-vol pairs.
    fn cross_asset_multiplier(&self, avg_vol: Decimal) -> Decimal {
        let baseline = self.config.baseline(Some(AssetClass::Crypto));

        if avg_vol <= Decimal::ZERO {
            return self.config.max_cross_asset_boost;
        }

        let Some(ratio) = baseline.checked_div(avg_vol) else {
            return self.config.max_cross_asset_boost;
        };
        if avg_vol < baseline {
            ratio.min(self.config.max_cross_asset_boost)
        } else {
            ratio.max(self.config.min_cross_asset_scale)
        }
    }
}

fn same_class_multiplier(avg_vol: Decimal) -> Decimal {
    for (threshold, multiplier) in HIGH_VOL_BANDS {
        if avg_vol > threshold {
            return multiplier;
        }
    }
    if avg_vol < LOW_VOL_THRESHOLD {
        return LOW_VOL_MULTIPLIER;
    }
    Decimal::ONE
}

//! Structural checks on constructed baskets.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::types::Basket;
use crate::assets::AssetUniverse;
use crate::config::BasketConfig;

/// Outcome of validating a basket. Lists every violated rule, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasketValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl BasketValidation {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validates baskets against size, weight-sum, symbol and minimum-weight rules.
#[derive(Debug, Clone)]
pub struct BasketValidator {
    config: BasketConfig,
    universe: AssetUniverse,
}

impl BasketValidator {
    /// Create a new basket validator.
    pub fn new(config: BasketConfig, universe: AssetUniverse) -> Self {
        Self { config, universe }
    }

    /// Check a basket. An empty basket short-circuits; all other problems are collected.
    pub fn validate(&self, basket: &Basket) -> BasketValidation {
        let mut errors = Vec::new();

        if basket.is_empty() {
            errors.push("Basket is empty".to_string());
            return BasketValidation::from_errors(errors);
        }

        let max_assets = self.config.max_assets_per_side;
        if basket.len() > max_assets {
            errors.push(format!(
                "Basket has {} assets (max {})",
                basket.len(),
                max_assets
            ));
        }

        let total_weight = basket.total_weight();
        if (total_weight - Decimal::ONE).abs() > self.config.weight_sum_tolerance {
            errors.push(format!("Weights sum to {:.4}, not 1.0", total_weight));
        }

        let min_weight = self.config.min_weight_per_asset;
        for asset in basket.assets() {
            let symbol = asset.symbol.as_str();

            if symbol.is_empty() {
                errors.push("Basket item missing symbol".to_string());
            } else if !self.universe.is_tradeable(symbol) {
                errors.push(format!("Invalid symbol: {}", symbol));
            }

            if asset.weight <= Decimal::ZERO {
                errors.push(format!("Invalid weight for {}: {}", symbol, asset.weight));
            } else if asset.weight < min_weight {
                errors.push(format!(
                    "Weight for {} ({:.2}%) below minimum ({:.2}%)",
                    symbol,
                    asset.weight * dec!(100),
                    min_weight * dec!(100)
                ));
            }
        }

        BasketValidation::from_errors(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::AssetWeight;

    fn validator() -> BasketValidator {
        BasketValidator::new(BasketConfig::default(), AssetUniverse::default())
    }

    #[test]
    fn test_valid_basket() {
        let basket = Basket::from_pairs([("XAU", dec!(0.5)), ("XAG", dec!(0.5))]);
        let result = validator().validate(&basket);

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_rounded_equal_thirds_are_valid() {
        let basket = Basket::from_pairs([
            ("BTC", dec!(0.3333)),
            ("ETH", dec!(0.3333)),
            ("SOL", dec!(0.3333)),
        ]);
        assert!(validator().validate(&basket).is_valid);
    }

    #[test]
    fn test_empty_basket_short_circuits() {
        let result = validator().validate(&Basket::default());

        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Basket is empty".to_string()]);
    }

    #[test]
    fn test_six_assets_rejected() {
        let basket = Basket::from_pairs(
            ["BTC", "ETH", "SOL", "ARB", "OP", "DOGE"]
                .into_iter()
                .map(|s| (s, Decimal::ONE / dec!(6))),
        );
        let result = validator().validate(&basket);

        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e == "Basket has 6 assets (max 5)"));
    }

    #[test]
    fn test_weights_summing_to_point_eight_rejected() {
        let basket = Basket::from_pairs([("XAU", dec!(0.4)), ("XAG", dec!(0.4))]);
        let result = validator().validate(&basket);

        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Weights sum to 0.8000, not 1.0".to_string()]);
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let basket = Basket::from_pairs([("BTC", dec!(0.5)), ("FAKECOIN", dec!(0.5))]);
        let result = validator().validate(&basket);

        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Invalid symbol: FAKECOIN".to_string()]);
    }

    #[test]
    fn test_zero_weight_rejected() {
        let basket = Basket::from_pairs([("BTC", dec!(1.0)), ("ETH", dec!(0))]);
        let result = validator().validate(&basket);

        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e == "Invalid weight for ETH: 0"));
    }

    #[test]
    fn test_below_minimum_weight_rejected() {
        let basket = Basket::from_pairs([("BTC", dec!(0.95)), ("ETH", dec!(0.05))]);
        let result = validator().validate(&basket);

        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["Weight for ETH (5.00%) below minimum (10.00%)".to_string()]
        );
    }

    #[test]
    fn test_missing_symbol_rejected() {
        let basket = Basket::new(vec![
            AssetWeight::new("", dec!(0.5)),
            AssetWeight::new("BTC", dec!(0.5)),
        ]);
        let result = validator().validate(&basket);

        assert_eq!(result.errors, vec!["Basket item missing symbol".to_string()]);
    }

    #[test]
    fn test_errors_are_collected() {
        let basket = Basket::from_pairs([("FOO", dec!(0.05)), ("BAR", dec!(0.05))]);
        let result = validator().validate(&basket);

        // Sum, two symbols and two below-minimum weights
        assert_eq!(result.errors.len(), 5);
    }

    #[test]
    fn test_narrowed_universe_rejects_metals() {
        let universe = AssetUniverse::default().with_tradeable(["BTC", "ETH"]);
        let validator = BasketValidator::new(BasketConfig::default(), universe);
        let basket = Basket::from_pairs([("XAU", dec!(1.0))]);

        assert!(!validator.validate(&basket).is_valid);
    }
}

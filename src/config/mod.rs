//! Configuration management for the basket sizer.
//!
//! Loads settings from environment variables and config files.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::AssetClass;

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Account and risk-budget parameters for position sizing
    #[serde(default)]
    pub sizing: SizingConfig,
    /// Basket construction limits
    #[serde(default)]
    pub basket: BasketConfig,
    /// Volatility baselines and adjustment bounds
    #[serde(default)]
    pub volatility: VolatilityConfig,
    /// Pre-trade rule thresholds
    #[serde(default)]
    pub trade_rules: TradeRulesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Total account balance in USD
    #[serde(default = "default_account_balance")]
    pub account_balance: Decimal,
    /// Fraction of the account risked per trade (0.0-1.0)
    #[serde(default = "default_risk_per_trade")]
    pub risk_per_trade: Decimal,
    /// Maximum number of concurrent open positions
    #[serde(default = "default_max_open_positions")]
    pub max_open_positions: u32,
    /// Maximum leverage reported for a position
    #[serde(default = "default_max_leverage")]
    pub max_leverage: Decimal,
    /// Maximum notional of a single position as a fraction of the account (0.0-1.0)
    #[serde(default = "default_max_position_fraction")]
    pub max_position_fraction: Decimal,
    /// Trades risking less than this many USD are rejected
    #[serde(default = "default_min_risk_usd")]
    pub min_risk_usd: Decimal,
    /// Size reduction applied per already-open position
    #[serde(default = "default_position_penalty_step")]
    pub position_penalty_step: Decimal,
    /// Floor for the open-position penalty multiplier
    #[serde(default = "default_min_position_penalty")]
    pub min_position_penalty: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketConfig {
    /// Maximum assets on one side of a trade
    #[serde(default = "default_max_assets_per_side")]
    pub max_assets_per_side: usize,
    /// Minimum weight of any asset in a basket (0.0-1.0)
    #[serde(default = "default_min_weight_per_asset")]
    pub min_weight_per_asset: Decimal,
    /// Allowed deviation of the weight sum from 1.0
    #[serde(default = "default_weight_sum_tolerance")]
    pub weight_sum_tolerance: Decimal,
    /// Decimal places kept on published weights
    #[serde(default = "default_weight_decimals")]
    pub weight_decimals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityConfig {
    /// Baseline volatility (%) for crypto assets
    #[serde(default = "default_crypto_baseline")]
    pub crypto_baseline: Decimal,
    /// Baseline volatility (%) for metals
    #[serde(default = "default_metals_baseline")]
    pub metals_baseline: Decimal,
    /// Baseline volatility (%) for stocks
    #[serde(default = "default_stocks_baseline")]
    pub stocks_baseline: Decimal,
    /// Baseline volatility (%) for symbols outside every class table
    #[serde(default = "default_unknown_baseline")]
    pub unknown_baseline: Decimal,
    /// Volatility floor used by inverse-volatility weighting
    #[serde(default = "default_min_weighting_volatility")]
    pub min_weighting_volatility: Decimal,
    /// Upper bound on the cross-asset boost
    #[serde(default = "default_max_cross_asset_boost")]
    pub max_cross_asset_boost: Decimal,
    /// Lower bound on the cross-asset reduction
    #[serde(default = "default_min_cross_asset_scale")]
    pub min_cross_asset_scale: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRulesConfig {
    /// Minimum signal confidence (0-10) to allow a trade
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: Decimal,
    /// Smallest accepted stop loss, in percent
    #[serde(default = "default_min_stop_loss_percent")]
    pub min_stop_loss_percent: Decimal,
    /// Largest accepted stop loss, in percent
    #[serde(default = "default_max_stop_loss_percent")]
    pub max_stop_loss_percent: Decimal,
}

// Default value functions
fn default_account_balance() -> Decimal {
    Decimal::new(20_000, 0) // $20k
}

fn default_risk_per_trade() -> Decimal {
    Decimal::new(1, 2) // 0.01 = 1% of account
}

fn default_max_open_positions() -> u32 {
    3
}

fn default_max_leverage() -> Decimal {
    Decimal::new(4, 0) // 4x
}

fn default_max_position_fraction() -> Decimal {
    Decimal::new(25, 2) // 0.25 of account
}

fn default_min_risk_usd() -> Decimal {
    Decimal::new(50, 0) // $50
}

fn default_position_penalty_step() -> Decimal {
    Decimal::new(2, 1) // 20% reduction per open position
}

fn default_min_position_penalty() -> Decimal {
    Decimal::new(4, 1) // never below 40% of base size
}

fn default_max_assets_per_side() -> usize {
    5
}

fn default_min_weight_per_asset() -> Decimal {
    Decimal::new(10, 2) // 0.10
}

fn default_weight_sum_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_weight_decimals() -> u32 {
    4
}

fn default_crypto_baseline() -> Decimal {
    Decimal::new(50, 1) // 5.0%
}

fn default_metals_baseline() -> Decimal {
    Decimal::new(15, 1) // 1.5%
}

fn default_stocks_baseline() -> Decimal {
    Decimal::new(25, 1) // 2.5%
}

fn default_unknown_baseline() -> Decimal {
    Decimal::new(30, 1) // 3.0%
}

fn default_min_weighting_volatility() -> Decimal {
    Decimal::new(1, 1) // 0.1
}

fn default_max_cross_asset_boost() -> Decimal {
    Decimal::new(3, 0) // 3x
}

fn default_min_cross_asset_scale() -> Decimal {
    Decimal::new(5, 1) // 0.5x
}

fn default_confidence_threshold() -> Decimal {
    Decimal::new(5, 0)
}

fn default_min_stop_loss_percent() -> Decimal {
    Decimal::new(3, 0) // 3%
}

fn default_max_stop_loss_percent() -> Decimal {
    Decimal::new(10, 0) // 10%
}

impl VolatilityConfig {
    /// Baseline volatility for an asset class (`None` = unknown symbol).
    pub fn baseline(&self, class: Option<AssetClass>) -> Decimal {
        match class {
            Some(AssetClass::Crypto) => self.crypto_baseline,
            Some(AssetClass::Metals) => self.metals_baseline,
            Some(AssetClass::Stocks) => self.stocks_baseline,
            None => self.unknown_baseline,
        }
    }
}

impl Config {
    /// Load configuration from environment variables and config files.
    pub fn load() -> Result<Self> {
        Self::load_from("basket_sizer")
    }

    /// Load configuration using a specific config file stem (extension optional).
    pub fn load_from(file_stem: &str) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(config::Environment::default().separator("__").prefix("BASKET"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.sizing.account_balance > Decimal::ZERO,
            "account_balance must be positive"
        );

        anyhow::ensure!(
            self.sizing.risk_per_trade > Decimal::ZERO && self.sizing.risk_per_trade <= Decimal::ONE,
            "risk_per_trade must be between 0 and 1"
        );

        anyhow::ensure!(
            self.sizing.max_position_fraction > Decimal::ZERO
                && self.sizing.max_position_fraction <= Decimal::ONE,
            "max_position_fraction must be between 0 and 1"
        );

        anyhow::ensure!(
            self.sizing.max_leverage >= Decimal::ONE,
            "max_leverage must be >= 1"
        );

        anyhow::ensure!(
            self.basket.max_assets_per_side >= 1,
            "max_assets_per_side must be >= 1"
        );

        anyhow::ensure!(
            self.basket.min_weight_per_asset >= Decimal::ZERO
                && self.basket.min_weight_per_asset < Decimal::ONE,
            "min_weight_per_asset must be in [0, 1)"
        );

        anyhow::ensure!(
            self.volatility.crypto_baseline > Decimal::ZERO
                && self.volatility.metals_baseline > Decimal::ZERO
                && self.volatility.stocks_baseline > Decimal::ZERO
                && self.volatility.unknown_baseline > Decimal::ZERO,
            "volatility baselines must be positive"
        );

        anyhow::ensure!(
            self.volatility.min_weighting_volatility > Decimal::ZERO,
            "min_weighting_volatility must be positive"
        );

        anyhow::ensure!(
            self.trade_rules.min_stop_loss_percent > Decimal::ZERO
                && self.trade_rules.min_stop_loss_percent <= self.trade_rules.max_stop_loss_percent,
            "min_stop_loss_percent must be > 0 and <= max_stop_loss_percent"
        );

        Ok(())
    }
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            account_balance: default_account_balance(),
            risk_per_trade: default_risk_per_trade(),
            max_open_positions: default_max_open_positions(),
            max_leverage: default_max_leverage(),
            max_position_fraction: default_max_position_fraction(),
            min_risk_usd: default_min_risk_usd(),
            position_penalty_step: default_position_penalty_step(),
            min_position_penalty: default_min_position_penalty(),
        }
    }
}

impl Default for BasketConfig {
    fn default() -> Self {
        Self {
            max_assets_per_side: default_max_assets_per_side(),
            min_weight_per_asset: default_min_weight_per_asset(),
            weight_sum_tolerance: default_weight_sum_tolerance(),
            weight_decimals: default_weight_decimals(),
        }
    }
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            crypto_baseline: default_crypto_baseline(),
            metals_baseline: default_metals_baseline(),
            stocks_baseline: default_stocks_baseline(),
            unknown_baseline: default_unknown_baseline(),
            min_weighting_volatility: default_min_weighting_volatility(),
            max_cross_asset_boost: default_max_cross_asset_boost(),
            min_cross_asset_scale: default_min_cross_asset_scale(),
        }
    }
}

impl Default for TradeRulesConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            min_stop_loss_percent: default_min_stop_loss_percent(),
            max_stop_loss_percent: default_max_stop_loss_percent(),
        }
    }
}

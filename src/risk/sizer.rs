//! Risk-adjusted position sizing for long/short basket trades.
//!
//! size = risk budget / stop loss, where the risk budget is
//! `balance × risk_per_trade × confidence × volatility × open-position penalty`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::volatility::VolatilityNormalizer;
use crate::basket::Basket;
use crate::config::SizingConfig;
use crate::utils::decimal::{round_to_precision, round_usd};

/// Everything needed to size one trade.
#[derive(Debug, Clone)]
pub struct SizingInput {
    /// Signal confidence (0-10)
    pub confidence: Decimal,
    pub long_basket: Basket,
    pub short_basket: Basket,
    /// Volatility (%) per symbol; missing symbols use class baselines
    pub volatilities: HashMap<String, Decimal>,
    /// Positions currently open on the account, read fresh by the caller
    pub open_positions: u32,
    /// Stop loss distance in percent (5.0 = 5%)
    pub stop_loss_percent: Decimal,
}

/// Sizing of an approved trade. USD amounts and ratios are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSize {
    pub size_usd: Decimal,
    pub long_size_usd: Decimal,
    pub short_size_usd: Decimal,
    pub risk_usd: Decimal,
    pub leverage: Decimal,
    pub vol_adjustment: Decimal,
    pub confidence_used: Decimal,
    pub sl_percent_used: Decimal,
}

/// Approve-or-reject outcome of a sizing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SizingResult {
    Approved(PositionSize),
    Rejected { reason: String },
}

impl SizingResult {
    pub fn is_approved(&self) -> bool {
        matches!(self, SizingResult::Approved(_))
    }

    pub fn approved(&self) -> Option<&PositionSize> {
        match self {
            SizingResult::Approved(size) => Some(size),
            SizingResult::Rejected { .. } => None,
        }
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            SizingResult::Approved(_) => None,
            SizingResult::Rejected { reason } => Some(reason),
        }
    }

    fn rejected(reason: String) -> Self {
        warn!(%reason, "Trade sizing rejected");
        SizingResult::Rejected { reason }
    }
}

/// Converts signal confidence and market volatility into a bounded position size.
#[derive(Debug, Clone)]
pub struct PositionSizer {
    config: SizingConfig,
    normalizer: VolatilityNormalizer,
}

impl PositionSizer {
    /// Create a new position sizer.
    pub fn new(config: SizingConfig, normalizer: VolatilityNormalizer) -> Self {
        Self { config, normalizer }
    }

    /// Confidence multiplier: 0 → 0.5, 10 → 1.0. Confidence is clamped to 0-10.
    pub fn confidence_multiplier(confidence: Decimal) -> Decimal {
        dec!(0.5) + confidence.clamp(Decimal::ZERO, dec!(10)) / dec!(20)
    }

    /// Size reduction for already-open positions, floored at `min_position_penalty`.
    pub fn position_penalty(&self, open_positions: u32) -> Decimal {
        let penalty = Decimal::ONE - Decimal::from(open_positions) * self.config.position_penalty_step;
        penalty.max(self.config.min_position_penalty)
    }

    /// Size a trade.
    pub fn size(&self, input: &SizingInput) -> SizingResult {
        let config = &self.config;
        let balance = config.account_balance;

        info!(confidence = %input.confidence, "Calculating position size");

        if input.open_positions >= config.max_open_positions {
            return SizingResult::rejected(format!(
                "Position limit reached ({}/{})",
                input.open_positions, config.max_open_positions
            ));
        }

        if balance <= Decimal::ZERO {
            return SizingResult::rejected(format!("Invalid account balance ${}", balance));
        }

        if input.stop_loss_percent <= Decimal::ZERO {
            return SizingResult::rejected(format!(
                "Invalid stop loss {}% (must be positive)",
                input.stop_loss_percent
            ));
        }

        let base_risk = balance * config.risk_per_trade;
        let confidence_mult = Self::confidence_multiplier(input.confidence);
        let vol = self
            .normalizer
            .adjustment(&input.long_basket, &input.short_basket, &input.volatilities);
        let position_penalty = self.position_penalty(input.open_positions);

        debug!(
            %base_risk,
            %confidence_mult,
            vol_adjustment = %vol.multiplier,
            %position_penalty,
            "Risk factors"
        );

        let mut risk_usd = base_risk * confidence_mult * vol.multiplier * position_penalty;
        let sl_fraction = input.stop_loss_percent / dec!(100);
        let max_size = balance * config.max_position_fraction;

        // A stop loss tight enough to overflow the division is always over the cap
        let mut size_usd = match risk_usd.checked_div(sl_fraction) {
            Some(size) => size,
            None => {
                warn!(%risk_usd, %sl_fraction, "Position size overflowed, capping");
                Decimal::MAX
            }
        };

        info!(%risk_usd, %size_usd, "Calculated risk and position size");

        if size_usd > max_size {
            warn!(from = %size_usd, to = %max_size, "Position size capped");
            size_usd = max_size;
            risk_usd = size_usd.checked_mul(sl_fraction).unwrap_or(Decimal::MAX);
        }

        // Leverage assumes half the account backs the position
        let leverage = (size_usd / (balance / dec!(2))).min(config.max_leverage);

        if risk_usd < config.min_risk_usd {
            return SizingResult::rejected(format!(
                "Risk amount ${:.2} below minimum ${}",
                risk_usd, config.min_risk_usd
            ));
        }

        let side_size = size_usd / dec!(2);

        SizingResult::Approved(PositionSize {
            size_usd: round_usd(size_usd),
            long_size_usd: round_usd(side_size),
            short_size_usd: round_usd(side_size),
            risk_usd: round_usd(risk_usd),
            leverage: round_to_precision(leverage, 2),
            vol_adjustment: round_to_precision(vol.multiplier, 2),
            confidence_used: input.confidence,
            sl_percent_used: input.stop_loss_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetUniverse;
    use crate::config::VolatilityConfig;

    // =========================================================================
    // Test Helpers
    // =========================================================================

    fn sizer_with(config: SizingConfig) -> PositionSizer {
        PositionSizer::new(
            config,
            VolatilityNormalizer::new(VolatilityConfig::default(), AssetUniverse::default()),
        )
    }

    fn sizer() -> PositionSizer {
        sizer_with(SizingConfig {
            account_balance: dec!(20000),
            ..Default::default()
        })
    }

    fn basket(symbols: &[&str]) -> Basket {
        let weight = Decimal::ONE / Decimal::from(symbols.len());
        Basket::from_pairs(symbols.iter().map(|s| (*s, weight)))
    }

    fn vols(entries: &[(&str, Decimal)]) -> HashMap<String, Decimal> {
        entries.iter().map(|(s, v)| (s.to_string(), *v)).collect()
    }

    fn crypto_input(confidence: Decimal, open_positions: u32, stop_loss_percent: Decimal) -> SizingInput {
        SizingInput {
            confidence,
            long_basket: basket(&["BTC", "ETH"]),
            short_basket: basket(&["SOL", "AVAX"]),
            volatilities: vols(&[
                ("BTC", dec!(3.0)),
                ("ETH", dec!(4.0)),
                ("SOL", dec!(7.0)),
                ("AVAX", dec!(8.0)),
            ]),
            open_positions,
            stop_loss_percent,
        }
    }

    fn metals_vs_crypto_input(confidence: Decimal, stop_loss_percent: Decimal) -> SizingInput {
        SizingInput {
            confidence,
            long_basket: basket(&["XAU", "XAG"]),
            short_basket: basket(&["BTC", "ETH"]),
            volatilities: vols(&[
                ("XAU", dec!(0.8)),
                ("XAG", dec!(1.5)),
                ("BTC", dec!(3.0)),
                ("ETH", dec!(4.0)),
            ]),
            open_positions: 0,
            stop_loss_percent,
        }
    }

    // =========================================================================
    // Factor Tests
    // =========================================================================

    #[test]
    fn test_confidence_multiplier_bounds() {
        assert_eq!(PositionSizer::confidence_multiplier(dec!(0)), dec!(0.5));
        assert_eq!(PositionSizer::confidence_multiplier(dec!(5)), dec!(0.75));
        assert_eq!(PositionSizer::confidence_multiplier(dec!(10)), dec!(1.0));
        assert_eq!(PositionSizer::confidence_multiplier(dec!(14)), dec!(1.0));
    }

    #[test]
    fn test_position_penalty_floor() {
        let sizer = sizer();
        assert_eq!(sizer.position_penalty(0), dec!(1.0));
        assert_eq!(sizer.position_penalty(1), dec!(0.8));
        assert_eq!(sizer.position_penalty(2), dec!(0.6));
        assert_eq!(sizer.position_penalty(3), dec!(0.4));
        assert_eq!(sizer.position_penalty(5), dec!(0.4));
    }

    // =========================================================================
    // Sizing Scenario Tests
    // =========================================================================

    #[test]
    fn test_worked_crypto_scenario() {
        let result = sizer().size(&crypto_input(dec!(7.5), 0, dec!(5.0)));

        let size = result.approved().expect("approved");
        assert_eq!(size.risk_usd, dec!(175));
        assert_eq!(size.size_usd, dec!(3500));
        assert_eq!(size.long_size_usd, dec!(1750));
        assert_eq!(size.short_size_usd, dec!(1750));
        assert_eq!(size.leverage, dec!(0.35));
        assert_eq!(size.vol_adjustment, dec!(1.0));
    }

    #[test]
    fn test_confidence_extremes_scale_risk() {
        let low = sizer().size(&crypto_input(dec!(0), 0, dec!(1.0)));
        let high = sizer().size(&crypto_input(dec!(10), 0, dec!(1.0)));

        // 200 × 0.5 and 200 × 1.0
        assert_eq!(low.approved().unwrap().risk_usd, dec!(50));
        assert_eq!(high.approved().unwrap().size_usd, dec!(5000));
    }

    #[test]
    fn test_position_limit_always_rejects() {
        for confidence in [dec!(0), dec!(5), dec!(10)] {
            let result = sizer().size(&crypto_input(confidence, 3, dec!(5.0)));
            assert_eq!(result.rejection_reason(), Some("Position limit reached (3/3)"));
        }
    }

    #[test]
    fn test_cross_asset_sized_larger_than_same_class() {
        let cross = sizer().size(&metals_vs_crypto_input(dec!(8.0), dec!(8.0)));
        let cross = cross.approved().unwrap();

        // avg_vol 2.325 -> 5 / 2.325 ≈ 2.15
        assert_eq!(cross.vol_adjustment, dec!(2.15));
        assert!(cross.vol_adjustment > Decimal::ONE);

        let same = sizer().size(&crypto_input(dec!(8.0), 0, dec!(8.0)));
        let same = same.approved().unwrap();

        assert!(cross.risk_usd > same.risk_usd);
        assert!(cross.size_usd > same.size_usd);
    }

    #[test]
    fn test_size_cap_recomputes_risk_from_clamped_size() {
        // 200 × 1.0 × 3.0 / 3% = 20000 -> clamped to 25% of 20000
        let mut input = metals_vs_crypto_input(dec!(10), dec!(3.0));
        input.volatilities = vols(&[("XAU", dec!(0.5)), ("XAG", dec!(0.5)), ("BTC", dec!(1)), ("ETH", dec!(1))]);

        let result = sizer().size(&input);
        let size = result.approved().unwrap();

        assert_eq!(size.size_usd, dec!(5000));
        assert_eq!(size.risk_usd, dec!(150));
        assert_eq!(size.risk_usd, size.size_usd * dec!(3.0) / dec!(100));
        assert_eq!(size.leverage, dec!(0.5));
    }

    #[test]
    fn test_risk_below_minimum_rejected() {
        let small = sizer_with(SizingConfig {
            account_balance: dec!(5000),
            ..Default::default()
        });
        // 50 × 0.75 = 37.5 risk
        let result = small.size(&crypto_input(dec!(5), 0, dec!(5.0)));

        assert!(!result.is_approved());
        assert_eq!(
            result.rejection_reason(),
            Some("Risk amount $37.50 below minimum $50")
        );
    }

    #[test]
    fn test_open_positions_reduce_size() {
        let none_open = sizer().size(&crypto_input(dec!(9), 0, dec!(5.0)));
        let two_open = sizer().size(&crypto_input(dec!(9), 2, dec!(5.0)));

        let none_open = none_open.approved().unwrap();
        let two_open = two_open.approved().unwrap();
        assert_eq!(two_open.risk_usd, none_open.risk_usd * dec!(0.6));
    }

    #[test]
    fn test_leverage_capped_at_max() {
        let sizer = sizer_with(SizingConfig {
            account_balance: dec!(20000),
            max_position_fraction: Decimal::ONE,
            max_leverage: dec!(1.5),
            ..Default::default()
        });
        let result = sizer.size(&crypto_input(dec!(10), 0, dec!(1.0)));

        // size 20000 against 10000 backing would be 2x
        assert_eq!(result.approved().unwrap().leverage, dec!(1.5));
    }

    #[test]
    fn test_invalid_stop_loss_rejected() {
        let result = sizer().size(&crypto_input(dec!(7), 0, Decimal::ZERO));
        assert!(result.rejection_reason().unwrap().starts_with("Invalid stop loss"));
    }

    #[test]
    fn test_tiny_stop_loss_capped_then_below_min_risk() {
        // 175 / 1e-27 does not fit in a Decimal; the size is capped at 5000
        // and the recomputed risk falls under the $50 floor
        let result = sizer().size(&crypto_input(
            dec!(7.5),
            0,
            dec!(0.0000000000000000000000001),
        ));

        assert_eq!(
            result,
            SizingResult::Rejected {
                reason: "Risk amount $0.00 below minimum $50".to_string()
            }
        );
    }

    #[test]
    fn test_small_stop_loss_capped_then_below_min_risk() {
        // Fits in a Decimal but is far over the cap: 5000 × 0.0001 = $0.50 risk
        let result = sizer().size(&crypto_input(dec!(7.5), 0, dec!(0.01)));

        assert_eq!(
            result.rejection_reason(),
            Some("Risk amount $0.50 below minimum $50")
        );
    }

    #[test]
    fn test_result_serializes_with_status_tag() {
        let result = sizer().size(&crypto_input(dec!(7.5), 0, dec!(5.0)));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "approved");

        let rejected = sizer().size(&crypto_input(dec!(7.5), 3, dec!(5.0)));
        let json = serde_json::to_value(&rejected).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["reason"], "Position limit reached (3/3)");
    }
}

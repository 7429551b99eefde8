//! Exposure summary over currently open positions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SizingConfig;
use crate::utils::decimal::percent_of;

/// An open position as reported by the execution venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    #[serde(default)]
    pub size_usd: Decimal,
    #[serde(default)]
    pub risk_usd: Decimal,
}

/// Aggregate exposure and risk relative to the account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSummary {
    pub account_balance: Decimal,
    pub total_exposure_usd: Decimal,
    pub total_risk_usd: Decimal,
    pub exposure_percent: Decimal,
    pub risk_percent: Decimal,
    pub open_positions: u32,
    pub max_positions: u32,
    pub positions_available: u32,
}

impl RiskSummary {
    /// Summarize open positions against the sizing configuration.
    pub fn from_positions(positions: &[OpenPosition], config: &SizingConfig) -> Self {
        let total_exposure_usd: Decimal = positions.iter().map(|p| p.size_usd).sum();
        let total_risk_usd: Decimal = positions.iter().map(|p| p.risk_usd).sum();
        let open_positions = u32::try_from(positions.len()).unwrap_or(u32::MAX);

        Self {
            account_balance: config.account_balance,
            total_exposure_usd,
            total_risk_usd,
            exposure_percent: percent_of(total_exposure_usd, config.account_balance),
            risk_percent: percent_of(total_risk_usd, config.account_balance),
            open_positions,
            max_positions: config.max_open_positions,
            positions_available: config.max_open_positions.saturating_sub(open_positions),
        }
    }
}

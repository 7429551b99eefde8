//! Named long/short strategy presets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy preset naming a long and a short asset list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasketPreset {
    /// Long metals, short crypto
    RiskOff,
    /// Long crypto, short metals
    RiskOn,
    /// Long tech stocks, short crypto
    TechVsCrypto,
    /// Gold against silver
    GoldSilverRatio,
    /// Majors against alt layer-1s
    L1Rotation,
    /// Crypto majors against memes/payments
    Balanced,
}

impl BasketPreset {
    /// `(long, short)` symbols for the preset.
    pub fn assets(&self) -> (&'static [&'static str], &'static [&'static str]) {
        const METALS: &[&str] = &["XAU", "XAG", "XPT"];
        const CRYPTO_MAJORS: &[&str] = &["BTC", "ETH", "SOL"];
        const TECH: &[&str] = &["NVDA", "TSLA", "AMD"];
        const ALT_L1S: &[&str] = &["SOL", "AVAX"];
        const PRECIOUS: &[&str] = &["XAU", "XAG"];
        const MAJORS: &[&str] = &["BTC", "ETH"];
        const PAYMENTS: &[&str] = &["DOGE", "XRP"];

        match self {
            Self::RiskOff => (METALS, CRYPTO_MAJORS),
            Self::RiskOn => (CRYPTO_MAJORS, PRECIOUS),
            Self::TechVsCrypto => (TECH, ALT_L1S),
            Self::GoldSilverRatio => (&PRECIOUS[..1], &PRECIOUS[1..]),
            Self::L1Rotation => (MAJORS, ALT_L1S),
            Self::Balanced => (MAJORS, PAYMENTS),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RiskOff => "risk_off",
            Self::RiskOn => "risk_on",
            Self::TechVsCrypto => "tech_vs_crypto",
            Self::GoldSilverRatio => "gold_silver_ratio",
            Self::L1Rotation => "l1_rotation",
            Self::Balanced => "balanced",
        }
    }
}

impl FromStr for BasketPreset {
    type Err = std::convert::Infallible;

    /// Unknown names map to [`BasketPreset::Balanced`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "risk_off" => Self::RiskOff,
            "risk_on" => Self::RiskOn,
            "tech_vs_crypto" => Self::TechVsCrypto,
            "gold_silver_ratio" => Self::GoldSilverRatio,
            "l1_rotation" => Self::L1Rotation,
            _ => Self::Balanced,
        })
    }
}

impl fmt::Display for BasketPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

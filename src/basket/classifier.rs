//! Long/short basket pair classification.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::types::Basket;
use crate::assets::{AssetClass, AssetUniverse};

/// Category of a long/short pair. Directional: swapping sides changes the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BasketCategory {
    MetalsVsCrypto,
    CryptoVsMetals,
    StocksVsCrypto,
    CryptoVsStocks,
    MetalsVsStocks,
    StocksVsMetals,
    CryptoVsCrypto,
    MetalsVsMetals,
    StocksVsStocks,
    MixedBasket,
}

impl BasketCategory {
    /// Category for a single-class long side against a single-class short side.
    pub fn from_classes(long: AssetClass, short: AssetClass) -> Self {
        use AssetClass::*;
        match (long, short) {
            (Metals, Crypto) => Self::MetalsVsCrypto,
            (Crypto, Metals) => Self::CryptoVsMetals,
            (Stocks, Crypto) => Self::StocksVsCrypto,
            (Crypto, Stocks) => Self::CryptoVsStocks,
            (Metals, Stocks) => Self::MetalsVsStocks,
            (Stocks, Metals) => Self::StocksVsMetals,
            (Crypto, Crypto) => Self::CryptoVsCrypto,
            (Metals, Metals) => Self::MetalsVsMetals,
            (Stocks, Stocks) => Self::StocksVsStocks,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MetalsVsCrypto => "METALS_VS_CRYPTO",
            Self::CryptoVsMetals => "CRYPTO_VS_METALS",
            Self::StocksVsCrypto => "STOCKS_VS_CRYPTO",
            Self::CryptoVsStocks => "CRYPTO_VS_STOCKS",
            Self::MetalsVsStocks => "METALS_VS_STOCKS",
            Self::StocksVsMetals => "STOCKS_VS_METALS",
            Self::CryptoVsCrypto => "CRYPTO_VS_CRYPTO",
            Self::MetalsVsMetals => "METALS_VS_METALS",
            Self::StocksVsStocks => "STOCKS_VS_STOCKS",
            Self::MixedBasket => "MIXED_BASKET",
        }
    }

    /// Default execution slippage tolerance for the category (0.0-1.0).
    pub fn default_slippage(&self) -> Decimal {
        match self {
            Self::CryptoVsCrypto => dec!(0.01),
            Self::MetalsVsMetals
            | Self::StocksVsStocks
            | Self::MetalsVsStocks
            | Self::StocksVsMetals => dec!(0.02),
            _ => dec!(0.015),
        }
    }
}

impl fmt::Display for BasketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labels basket pairs by the asset classes on each side.
#[derive(Debug, Clone)]
pub struct BasketClassifier {
    universe: AssetUniverse,
}

impl BasketClassifier {
    pub fn new(universe: AssetUniverse) -> Self {
        Self { universe }
    }

    /// Classify a long/short pair. Only one known class per side yields a
    /// specific category; anything else is `MixedBasket`.
    pub fn classify(&self, long: &Basket, short: &Basket) -> BasketCategory {
        let long_classes = self.universe.classes_of(long.symbols());
        let short_classes = self.universe.classes_of(short.symbols());

        match (single_class(&long_classes), single_class(&short_classes)) {
            (Some(l), Some(s)) => BasketCategory::from_classes(l, s),
            _ => BasketCategory::MixedBasket,
        }
    }
}

fn single_class(classes: &HashSet<Option<AssetClass>>) -> Option<AssetClass> {
    if classes.len() != 1 {
        return None;
    }
    classes.iter().next().copied().flatten()
}

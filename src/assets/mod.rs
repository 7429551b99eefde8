//! Asset universe: asset-class membership, tradeable symbols and reference market caps.
//!
//! The tables live in an explicit [`AssetUniverse`] value that callers build once
//! and hand to the builder, validator, classifier and sizer.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Coarse asset category used for classification and volatility baselines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetClass {
    Crypto,
    Metals,
    Stocks,
}

impl AssetClass {
    /// Upper-case label used in category names ("CRYPTO", "METALS", "STOCKS").
    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::Crypto => "CRYPTO",
            AssetClass::Metals => "METALS",
            AssetClass::Stocks => "STOCKS",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for an optional class; symbols outside every table are "UNKNOWN".
pub fn class_label(class: Option<AssetClass>) -> &'static str {
    class.map(|c| c.label()).unwrap_or("UNKNOWN")
}

const CRYPTO_SYMBOLS: &[&str] = &["BTC", "ETH", "SOL", "ARB", "OP", "DOGE", "MATIC", "XRP", "AVAX", "LINK"];
const METAL_SYMBOLS: &[&str] = &["XAU", "XAG", "XPT", "XPD", "HG"];
const STOCK_SYMBOLS: &[&str] = &["AAPL", "NVDA", "TSLA", "MSFT", "GOOGL", "AMZN", "META", "AMD"];

/// Symbol tables for one trading venue.
#[derive(Debug, Clone)]
pub struct AssetUniverse {
    classes: HashMap<String, AssetClass>,
    tradeable: HashSet<String>,
    reference_caps: HashMap<String, Decimal>,
}

impl AssetUniverse {
    /// Build a universe from explicit class tables.
    ///
    /// Every classified symbol is tradeable unless narrowed with [`Self::with_tradeable`].
    pub fn new(tables: &[(AssetClass, &[&str])]) -> Self {
        let mut classes = HashMap::new();
        for (class, symbols) in tables {
            for symbol in symbols.iter() {
                // First table wins for a symbol listed twice
                classes.entry(symbol.to_string()).or_insert(*class);
            }
        }
        let tradeable = classes.keys().cloned().collect();

        Self {
            classes,
            tradeable,
            reference_caps: default_reference_caps(),
        }
    }

    /// Restrict the tradeable set (e.g. to what a venue actually lists).
    pub fn with_tradeable<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tradeable = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Asset class of a symbol, `None` when the symbol is unknown.
    pub fn class_of(&self, symbol: &str) -> Option<AssetClass> {
        self.classes.get(symbol).copied()
    }

    /// Whether the symbol may appear in a basket.
    pub fn is_tradeable(&self, symbol: &str) -> bool {
        self.tradeable.contains(symbol)
    }

    /// Rough market caps (billions USD) used when live cap data is unavailable.
    pub fn reference_caps(&self) -> &HashMap<String, Decimal> {
        &self.reference_caps
    }

    /// Set of classes present in a list of symbols (`None` stands for UNKNOWN).
    pub fn classes_of<'a, I>(&self, symbols: I) -> HashSet<Option<AssetClass>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        symbols.into_iter().map(|s| self.class_of(s)).collect()
    }
}

impl Default for AssetUniverse {
    fn default() -> Self {
        Self::new(&[
            (AssetClass::Crypto, CRYPTO_SYMBOLS),
            (AssetClass::Metals, METAL_SYMBOLS),
            (AssetClass::Stocks, STOCK_SYMBOLS),
        ])
    }
}

fn default_reference_caps() -> HashMap<String, Decimal> {
    [
        ("BTC", dec!(800)),
        ("ETH", dec!(300)),
        ("SOL", dec!(50)),
        ("XRP", dec!(30)),
        ("DOGE", dec!(20)),
        ("AVAX", dec!(15)),
        ("LINK", dec!(10)),
        ("MATIC", dec!(8)),
        ("ARB", dec!(5)),
        ("OP", dec!(4)),
        ("XAU", dec!(500)),
        ("XAG", dec!(30)),
        ("XPT", dec!(5)),
        ("XPD", dec!(5)),
        ("HG", dec!(10)),
        ("AAPL", dec!(3000)),
        ("MSFT", dec!(2800)),
        ("NVDA", dec!(1200)),
        ("GOOGL", dec!(1800)),
        ("AMZN", dec!(1600)),
        ("META", dec!(800)),
        ("TSLA", dec!(700)),
        ("AMD", dec!(200)),
    ]
    .into_iter()
    .map(|(symbol, cap)| (symbol.to_string(), cap))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_universe_classes() {
        let universe = AssetUniverse::default();

        assert_eq!(universe.class_of("BTC"), Some(AssetClass::Crypto));
        assert_eq!(universe.class_of("XAU"), Some(AssetClass::Metals));
        assert_eq!(universe.class_of("NVDA"), Some(AssetClass::Stocks));
        assert_eq!(universe.class_of("FOO"), None);
        assert_eq!(class_label(universe.class_of("FOO")), "UNKNOWN");
        assert_eq!(class_label(universe.class_of("XAG")), "METALS");
    }

    #[test]
    fn test_tradeable_can_be_narrowed() {
        let universe = AssetUniverse::default().with_tradeable(CRYPTO_SYMBOLS.iter().copied());

        assert!(universe.is_tradeable("ETH"));
        assert!(!universe.is_tradeable("XAU"));
        // Classification is unaffected by the tradeable set
        assert_eq!(universe.class_of("XAU"), Some(AssetClass::Metals));
    }

    #[test]
    fn test_classes_of_is_a_set() {
        let universe = AssetUniverse::default();
        let classes = universe.classes_of(["BTC", "ETH", "SOL"]);

        assert_eq!(classes.len(), 1);
        assert!(classes.contains(&Some(AssetClass::Crypto)));
    }
}

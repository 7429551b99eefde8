//! # Basket Sizer
//!
//! Multi-asset basket construction and risk-adjusted position sizing for
//! long/short pair trades across crypto, metals and stocks.
//!
//! ## Architecture
//!
//! - `assets`: Asset-class tables, tradeable symbols, reference market caps
//! - `config`: Configuration management and validation
//! - `basket`: Weighting policies, minimum-weight redistribution, validation, classification
//! - `risk`: Volatility normalization, position sizing, pre-trade checks, exposure summary
//! - `strategy`: Proposal-to-order-plan pipeline
//! - `utils`: Shared utilities and decimal arithmetic

pub mod assets;
pub mod basket;
pub mod config;
pub mod risk;
pub mod strategy;
pub mod utils;

pub use config::Config;

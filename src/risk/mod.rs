//! Risk management for basket pair trades.
//!
//! Provides:
//! - Cross-asset volatility normalization
//! - Confidence- and volatility-adjusted position sizing
//! - Pre-trade rule checks
//! - Exposure summaries over open positions

mod sizer;
mod summary;
mod trade_gate;
mod volatility;

pub use sizer::{PositionSize, PositionSizer, SizingInput, SizingResult};
pub use summary::{OpenPosition, RiskSummary};
pub use trade_gate::{TradeCheck, TradeGate};
pub use volatility::{VolatilityAdjustment, VolatilityNormalizer};

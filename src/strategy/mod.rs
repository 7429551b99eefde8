//! Trade planning.
//!
//! Combines basket construction, validation, classification and risk sizing
//! into a single proposal-to-order-plan pipeline.

mod planner;

pub use planner::{OrderPlan, TradePlan, TradePlanner, TradeProposal};

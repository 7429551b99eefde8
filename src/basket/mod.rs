//! Basket construction.
//!
//! Contains the logic for:
//! - Weighting policies (equal, inverse volatility, conviction, market cap)
//! - Minimum-weight redistribution
//! - Building, validating and classifying long/short baskets
//! - Named strategy presets

mod builder;
mod classifier;
mod presets;
mod redistribute;
mod types;
mod validator;
mod weighting;

pub use builder::BasketBuilder;
pub use classifier::{BasketCategory, BasketClassifier};
pub use presets::BasketPreset;
pub use redistribute::{enforce_min_weight, equal_weights};
pub use types::{AssetWeight, Basket};
pub use validator::{BasketValidation, BasketValidator};
pub use weighting::{UnknownWeightingMethod, WeightingMethod, WeightingPolicy};

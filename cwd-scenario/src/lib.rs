//! Scenario codes for the California water delivery model runs.
//!
//! Every simulated scenario is a combination of five policy settings
//! (demand, carryover, priority, regulations, minimum flow). The model
//! exports name each run with a compact integer code; this crate maps
//! those codes to setting indices and to the canonical `explNNNN` keys
//! used throughout the dataset.

pub mod codec;
pub mod error;
pub mod setting;

pub use codec::{
    format_code_key, parse_code_key, ScenarioCodec, SettingIndices, BASELINE_CODE,
    CODE_KEY_PREFIX,
};
pub use error::{Result, ScenarioError};
pub use setting::Setting;

/// Canonical key of the all-default baseline scenario.
pub const BASELINE_KEY: &str = "expl0000";

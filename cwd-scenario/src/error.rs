/// Error types for the scenario codec
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    /// Code is outside `[0, product of option counts)`
    #[error("Invalid scenario code {code} (valid codes: 0..{limit})")]
    InvalidScenarioCode { code: u32, limit: u32 },

    /// A setting index is outside its dimension's option count
    #[error("Invalid index {index} for setting {setting} ({count} options)")]
    InvalidSettingIndex {
        setting: &'static str,
        index: usize,
        count: usize,
    },

    /// A dimension was configured with zero options
    #[error("Setting {0} must have at least one option")]
    InvalidOptionCount(&'static str),

    /// The product of the option counts does not fit a `u32` code
    #[error("Option counts {0:?} give more scenario codes than fit in a u32")]
    TooManyCodes([usize; 5]),

    /// Key is not of the form `expl` followed by digits
    #[error("Invalid scenario key: {0}")]
    InvalidCodeKey(String),
}

/// Type alias for Results using ScenarioError
pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Error types for waterdrop aggregation
use cwd_data::DataError;
use cwd_layout::LayoutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WaterdropError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// The packer returned a layout without a requested circle
    #[error("Layout has no placement for circle {0}")]
    MissingPlacement(usize),

    /// A datum's objective has no baseline to normalize against
    #[error("No normalization domain for objective {0}")]
    MissingDomain(String),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Results using WaterdropError
pub type Result<T> = std::result::Result<T, WaterdropError>;

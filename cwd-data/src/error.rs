/// Error types for dataset construction and ranking
use crate::dataset::DatumId;
use crate::grouping::Grouping;
use cwd_scenario::ScenarioError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    /// The objective list was empty
    #[error("Dataset contains no objectives")]
    EmptyDataset,

    /// Scenario stride of zero
    #[error("Scenario stride must be at least 1")]
    InvalidStride,

    /// The baseline scenario is absent from the reference objective
    #[error("Baseline scenario {baseline} not found for objective {objective}")]
    MissingBaseline { objective: String, baseline: String },

    /// An objective lacks scenarios present in the canonical set
    #[error("Objective {objective} is missing scenarios: {}", missing.join(", "))]
    InconsistentScenarioSet {
        objective: String,
        missing: Vec<String>,
    },

    /// A kept scenario has an empty delivery series
    #[error("Objective {objective}, scenario {scenario} has no deliveries")]
    EmptyDeliveries { objective: String, scenario: String },

    /// Rank lookup for a group or member the index does not know
    #[error("No rank entry for {grouping} group {group} (member: {member:?})")]
    MissingRankEntry {
        grouping: Grouping,
        group: String,
        member: Option<DatumId>,
    },

    /// Grouping criterion other than `objective` or `scenario`
    #[error("Unknown grouping criterion: {0}")]
    UnknownGrouping(String),

    /// Datum id not present in the dataset arena
    #[error("Unknown datum id: {0}")]
    UnknownDatum(DatumId),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// Type alias for Results using DataError
pub type Result<T> = std::result::Result<T, DataError>;

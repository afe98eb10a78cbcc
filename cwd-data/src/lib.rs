//! Data processing for the water delivery scenario exports.
//!
//! This crate turns the raw objective/scenario delivery series into the
//! forms the waterdrop layout consumes: a flattened, normalized dataset,
//! rank orderings per grouping criterion, and quantile interpolators for
//! fill levels.

pub mod dataset;
pub mod error;
pub mod grouping;
pub mod interpolation;
pub mod preprocess;
pub mod ranking;

pub use dataset::{
    parse_objectives, DatumId, DeliveryDataset, FlattenedDatum, NormalizeOptions, ObjectiveRecord,
    ScenarioRecord,
};
pub use error::{DataError, Result};
pub use grouping::Grouping;
pub use interpolation::QuantileInterpolator;
pub use ranking::{GroupRanking, NormalizationPolicy, RankingIndex, RankingPolicy};

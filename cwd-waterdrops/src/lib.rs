//! Waterdrop graph aggregation.
//!
//! Combines the normalized delivery dataset, its rankings and two nested
//! circle layouts into positioned glyphs with fill levels, grouped by
//! objective or by scenario.

pub mod builder;
pub mod descriptions;
pub mod error;
pub mod levels;
pub mod model;
pub mod settings;

pub use builder::WaterdropBuilder;
pub use descriptions::{Description, Descriptions};
pub use error::{Result, WaterdropError};
pub use levels::{calc_dom_level, fill_levels};
pub use model::{WaterdropGroup, WaterdropNode, Waterdrops};
pub use settings::WaterdropSettings;

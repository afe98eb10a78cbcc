use crate::dataset::FlattenedDatum;
use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primary grouping criterion for the waterdrop graph.
///
/// Grouping by objective makes objectives the groups and scenarios their
/// members; grouping by scenario swaps the roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    #[default]
    Objective,
    Scenario,
}

impl Grouping {
    pub const ALL: [Grouping; 2] = [Grouping::Objective, Grouping::Scenario];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grouping::Objective => "objective",
            Grouping::Scenario => "scenario",
        }
    }

    /// Key of the group a datum belongs to under this criterion.
    pub fn group_key<'a>(&self, datum: &'a FlattenedDatum) -> &'a str {
        match self {
            Grouping::Objective => &datum.objective,
            Grouping::Scenario => &datum.scenario,
        }
    }

    /// Key identifying a datum within its group.
    pub fn member_key<'a>(&self, datum: &'a FlattenedDatum) -> &'a str {
        match self {
            Grouping::Objective => &datum.scenario,
            Grouping::Scenario => &datum.objective,
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grouping {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "objective" => Ok(Grouping::Objective),
            "scenario" => Ok(Grouping::Scenario),
            _ => Err(DataError::UnknownGrouping(s.to_string())),
        }
    }
}

//! Output of a waterdrop build, handed as-is to the rendering layer.

use cwd_data::{DatumId, Grouping};
use serde::Serialize;

/// One glyph: an (objective, scenario) record placed inside its group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterdropNode {
    pub id: DatumId,
    /// Band heights, outermost first.
    pub levs: Vec<f64>,
    pub max_lev: f64,
    pub dom_level: f64,
    /// Cosmetic rotation in degrees.
    pub tilt: f64,
    pub local_x: f64,
    pub local_y: f64,
    pub global_x: f64,
    pub global_y: f64,
    pub global_tilt: f64,
    pub group_key: String,
    pub member_key: String,
    pub member_rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterdropGroup {
    pub key: String,
    pub rank: usize,
    pub x: f64,
    pub y: f64,
    pub tilt: f64,
    /// Height of the member arrangement inside the group.
    pub height: f64,
    pub nodes: Vec<WaterdropNode>,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waterdrops {
    pub grouping: Grouping,
    pub nodes: Vec<WaterdropNode>,
    pub groups: Vec<WaterdropGroup>,
    /// Height of the group arrangement.
    pub height: f64,
    /// False if either layout kept overlap above tolerance.
    pub converged: bool,
}

impl Waterdrops {
    pub fn group(&self, key: &str) -> Option<&WaterdropGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn node(&self, id: DatumId) -> Option<&WaterdropNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

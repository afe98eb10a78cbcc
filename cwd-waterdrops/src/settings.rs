use crate::error::Result;
use cwd_data::{NormalizeOptions, RankingPolicy};
use cwd_layout::RelaxConfig;
use serde::{Deserialize, Serialize};

/// Tunables for a waterdrop build. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterdropSettings {
    /// Fill bands per glyph; each glyph gets `levels + 1` level heights.
    pub levels: usize,
    /// Glyph radius in pixels.
    pub rad_px: f64,
    /// Floor for the outermost level, as a fraction of `rad_px`.
    pub min_lev: f64,
    /// Spacing factor around each member glyph.
    pub small_drop_pad: f64,
    /// Extra spacing factor around each group.
    pub large_drop_pad: f64,
    /// Member tilts are drawn from `[-tilt_range, tilt_range]` degrees.
    pub tilt_range: f64,
    /// Group tilts are drawn from `[-group_tilt_range, group_tilt_range]` degrees.
    pub group_tilt_range: f64,
    pub layout: RelaxConfig,
    pub ranking: RankingPolicy,
    pub normalize: NormalizeOptions,
}

impl Default for WaterdropSettings {
    fn default() -> Self {
        Self {
            levels: 5,
            rad_px: 1.0,
            min_lev: 0.1,
            small_drop_pad: 1.3,
            large_drop_pad: 1.2,
            tilt_range: 25.0,
            group_tilt_range: 25.0,
            layout: RelaxConfig::default(),
            ranking: RankingPolicy::default(),
            normalize: NormalizeOptions::default(),
        }
    }
}

impl WaterdropSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Radius of the circle that holds one group of `member_count` glyphs.
    pub fn group_radius(&self, member_count: usize) -> f64 {
        (member_count as f64 / std::f64::consts::PI).sqrt()
            * self.rad_px
            * 2.0
            * self.small_drop_pad
            * self.large_drop_pad
    }

    /// Radius reserved for one member glyph.
    pub fn member_radius(&self) -> f64 {
        self.rad_px * self.small_drop_pad
    }
}

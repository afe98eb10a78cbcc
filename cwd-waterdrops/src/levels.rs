//! Fill levels of a single glyph.

use crate::settings::WaterdropSettings;
use cwd_data::QuantileInterpolator;

/// `levels + 1` band heights in pixels, sampled from the delivery quantiles
/// from the largest delivery down. The outermost band never drops below
/// `min_lev` so an empty drop stays visible.
pub fn fill_levels(interpolator: &QuantileInterpolator, settings: &WaterdropSettings) -> Vec<f64> {
    interpolator
        .sample(settings.levels + 1)
        .into_iter()
        .enumerate()
        .map(|(i, w)| {
            let floor = if i == 0 { settings.min_lev } else { 0.0 };
            w.max(floor) * settings.rad_px
        })
        .collect()
}

/// Weighted index of the band holding most of the fill, for the simplified
/// single-color rendering. The levels are framed by a full band on top and
/// an empty one at the bottom before weighting each drop by its position.
pub fn calc_dom_level(levs: &[f64]) -> f64 {
    let framed: Vec<f64> = std::iter::once(1.0)
        .chain(levs.iter().copied())
        .chain(std::iter::once(0.0))
        .collect();
    let denom = (framed.len() + 4) as f64;
    framed
        .windows(2)
        .enumerate()
        .map(|(i, pair)| (pair[0] - pair[1]) * (i as f64 - 1.0) / denom)
        .sum()
}

//! Quantile interpolation of sorted delivery series.

use cwd_utils::math::{clamp, ticks_exact};

/// Piecewise-linear map from a fraction in `[0, 1]` to a normalized delivery.
///
/// Built from a series sorted descending, so fraction 0 is the largest
/// delivery and fraction 1 the smallest. Inputs outside `[0, 1]` clamp to
/// the endpoint values.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileInterpolator {
    values: Vec<f64>,
}

impl QuantileInterpolator {
    /// Normalize `deliveries` against `domain = (min, max)`, clamping to `[0, 1]`.
    ///
    /// A degenerate domain (`max <= min`) maps values above `min` to 1 and
    /// everything else to 0.
    pub fn new(deliveries: &[f64], domain: (f64, f64)) -> Self {
        let (min, max) = domain;
        let span = max - min;
        let values = deliveries
            .iter()
            .map(|&v| {
                if span > 0.0 {
                    clamp((v - min) / span, 0.0, 1.0)
                } else if v > min {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        Self { values }
    }

    /// Normalized value at fraction `t`.
    pub fn at(&self, t: f64) -> f64 {
        let n = self.values.len();
        match n {
            0 => 0.0,
            1 => self.values[0],
            _ => {
                let t = if t.is_nan() { 0.0 } else { clamp(t, 0.0, 1.0) };
                let pos = t * (n - 1) as f64;
                let lo = (pos.floor() as usize).min(n - 2);
                let frac = pos - lo as f64;
                self.values[lo] + (self.values[lo + 1] - self.values[lo]) * frac
            }
        }
    }

    /// `count` samples at evenly spaced fractions from 0 to 1 inclusive.
    pub fn sample(&self, count: usize) -> Vec<f64> {
        ticks_exact(0.0, 1.0, count)
            .into_iter()
            .map(|t| self.at(t))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

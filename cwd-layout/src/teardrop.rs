//! The waterdrop outline used both to seed circles and to cage them.
//!
//! Screen coordinates (y grows downward). The drop is a disc of radius
//! `radius` centered on the origin, closed off at the top by two tangent
//! lines meeting at the tip `(0, -sqrt(2) * radius)`. The shape is convex,
//! and shrinking it inward by `r` gives the drop of radius `radius - r`,
//! which is where a circle of radius `r` may keep its center.

use rand::Rng;
use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teardrop {
    pub radius: f64,
}

impl Teardrop {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn tip(&self) -> (f64, f64) {
        (0.0, -SQRT_2 * self.radius)
    }

    /// Tip to bottom of the round part.
    pub fn height(&self) -> f64 {
        self.radius * (1.0 + SQRT_2)
    }

    /// `(min, max)` corners of the bounding box.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let r = self.radius;
        ((-r, -SQRT_2 * r), (r, r))
    }

    /// Teardrop shrunk inward by `r`; empty shapes collapse to the origin.
    pub fn inset(&self, r: f64) -> Self {
        Self::new((self.radius - r).max(0.0))
    }

    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        let r = self.radius;
        if x * x + y * y <= r * r {
            return true;
        }
        // triangle between the tip and the two tangent points
        y >= -SQRT_2 * r && y <= -FRAC_1_SQRT_2 * r && x.abs() <= y + SQRT_2 * r
    }

    /// Closest point of the shape to `p`.
    pub fn project(&self, p: (f64, f64)) -> (f64, f64) {
        if self.radius <= 0.0 {
            return (0.0, 0.0);
        }
        if self.contains(p) {
            return p;
        }

        let r = self.radius;
        let tangent_y = -FRAC_1_SQRT_2 * r;
        let tip = self.tip();
        let mut best = closest_on_segment(p, tip, (FRAC_1_SQRT_2 * r, tangent_y));
        let left = closest_on_segment(p, tip, (-FRAC_1_SQRT_2 * r, tangent_y));
        if dist_sq(p, left) < dist_sq(p, best) {
            best = left;
        }

        let len = (p.0 * p.0 + p.1 * p.1).sqrt();
        let on_circle = (p.0 * r / len, p.1 * r / len);
        // only the lower arc is boundary; the upper cap is inside the triangle
        if on_circle.1 >= tangent_y && dist_sq(p, on_circle) < dist_sq(p, best) {
            best = on_circle;
        }
        best
    }

    /// Uniformly random points inside the drop, by rejection sampling
    /// against the bounding box.
    pub fn random_points<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<(f64, f64)> {
        if self.radius <= 0.0 {
            return vec![(0.0, 0.0); count];
        }
        let ((min_x, min_y), (max_x, max_y)) = self.bounds();
        let mut points = Vec::with_capacity(count);
        while points.len() < count {
            let p = (rng.gen_range(min_x..max_x), rng.gen_range(min_y..max_y));
            if self.contains(p) {
                points.push(p);
            }
        }
        points
    }
}

fn dist_sq(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)
}

fn closest_on_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return a;
    }
    let t = (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len_sq).clamp(0.0, 1.0);
    (a.0 + abx * t, a.1 + aby * t)
}

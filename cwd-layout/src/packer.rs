use crate::error::Result;
use serde::Serialize;
use std::collections::HashMap;

/// A circle to place: caller-chosen id and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub id: usize,
    pub r: f64,
}

impl Circle {
    pub fn new(id: usize, r: f64) -> Self {
        Self { id, r }
    }
}

/// A placed circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PackedCircle {
    pub id: usize,
    pub r: f64,
    pub x: f64,
    pub y: f64,
}

/// Packing result, in input order, with O(1) lookup by id.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedLayout {
    pub circles: Vec<PackedCircle>,
    /// Tip-to-bottom extent of the cage the circles were settled in.
    pub height: f64,
    /// False when overlap above tolerance survived the tick budget and the extension.
    pub converged: bool,
    /// Largest remaining overlap as a fraction of the smaller radius of the pair.
    pub max_overlap: f64,
    index: HashMap<usize, usize>,
}

impl PackedLayout {
    pub fn new(circles: Vec<PackedCircle>, height: f64, converged: bool, max_overlap: f64) -> Self {
        let index = circles
            .iter()
            .enumerate()
            .map(|(slot, c)| (c.id, slot))
            .collect();
        Self {
            circles,
            height,
            converged,
            max_overlap,
            index,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0.0, true, 0.0)
    }

    pub fn get(&self, id: usize) -> Option<&PackedCircle> {
        self.index.get(&id).map(|&slot| &self.circles[slot])
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackedCircle> {
        self.circles.iter()
    }

    /// Radius of the smallest circle around `center` that covers every
    /// placed circle. Rotating the layout about `center` keeps it covered.
    pub fn enclosing_radius(&self, center: (f64, f64)) -> f64 {
        self.circles
            .iter()
            .map(|c| (c.x - center.0).hypot(c.y - center.1) + c.r)
            .fold(0.0, f64::max)
    }

    /// Same layout moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let circles = self
            .circles
            .iter()
            .map(|c| PackedCircle {
                x: c.x + dx,
                y: c.y + dy,
                ..*c
            })
            .collect();
        Self::new(circles, self.height, self.converged, self.max_overlap)
    }
}

/// Places circles without overlap around an origin.
///
/// Implementations should keep earlier circles nearer the bottom of the
/// drop and must be stable enough across calls of the same cardinality
/// that `reuse` can hand back a cached arrangement.
pub trait Packer {
    fn pack(&mut self, origin: (f64, f64), circles: &[Circle], reuse: bool)
        -> Result<PackedLayout>;
}

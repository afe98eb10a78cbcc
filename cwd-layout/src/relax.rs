//! Circle packing by physical relaxation.
//!
//! Circles are dropped at random seed points inside a waterdrop-shaped
//! cage and left to settle for a fixed number of fixed-timestep ticks.
//! Each tick integrates gravity (toward the round bottom of the drop),
//! then alternates cage containment with pairwise separation, and finally
//! derives velocities from the corrected positions, which gives zero
//! restitution. Speeds are capped so the short run cannot blow up.
//!
//! If overlap above tolerance survives the tick budget the run is extended
//! once with separation-only sweeps; whatever is left after that is
//! reported on the result and logged, never raised as an error.

use crate::cache::LayoutCache;
use crate::error::{LayoutError, Result};
use crate::packer::{Circle, PackedCircle, PackedLayout, Packer};
use crate::teardrop::Teardrop;
use log::{debug, warn};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Configuration for the relaxation packer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaxConfig {
    /// Fixed ticks per run (0.1 s at 60 fps).
    pub ticks: usize,
    /// Seconds per tick
    pub timestep: f64,
    /// Containment + separation sweeps per tick
    pub constraint_iterations: usize,
    /// Downward acceleration in cage radii per second squared
    pub gravity: f64,
    /// Speed cap in cage radii per second
    pub max_speed: f64,
    /// Cage radius as a multiple of sqrt(sum of r^2)
    pub cage_slack: f64,
    /// Independent seed point sets cached per circle count
    pub seed_sets: usize,
    /// Allowed overlap as a fraction of the smaller radius of a pair
    pub overlap_tolerance: f64,
    /// Separation-only sweeps allowed when the tick budget leaves overlap
    pub extension_iterations: usize,
}

impl Default for RelaxConfig {
    fn default() -> Self {
        Self {
            ticks: 6,
            timestep: 1.0 / 60.0,
            constraint_iterations: 8,
            gravity: 1.0,
            max_speed: 2.0,
            cage_slack: 1.25,
            seed_sets: 4,
            overlap_tolerance: 1e-3,
            extension_iterations: 1000,
        }
    }
}

impl RelaxConfig {
    /// Radius of the cage for a set of circles: the radius of a disc with
    /// their combined area, widened by `cage_slack`.
    pub fn cage_radius(&self, circles: &[Circle]) -> f64 {
        circles.iter().map(|c| c.r * c.r).sum::<f64>().sqrt() * self.cage_slack
    }
}

#[derive(Debug, Clone, Copy)]
struct Body {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    r: f64,
    inv_mass: f64,
}

struct World<'a> {
    bodies: Vec<Body>,
    cage: Teardrop,
    cell: f64,
    config: &'a RelaxConfig,
}

impl<'a> World<'a> {
    fn new(
        circles: &[Circle],
        seeds: &[(f64, f64)],
        cage: Teardrop,
        config: &'a RelaxConfig,
    ) -> Self {
        let bodies = circles
            .iter()
            .zip(seeds)
            .map(|(c, &(x, y))| Body {
                x,
                y,
                vx: 0.0,
                vy: 0.0,
                r: c.r,
                inv_mass: 1.0 / (c.r * c.r),
            })
            .collect();
        let max_r = circles.iter().map(|c| c.r).fold(0.0, f64::max);
        Self {
            bodies,
            cage,
            cell: 2.0 * max_r,
            config,
        }
    }

    fn tick(&mut self) {
        let dt = self.config.timestep;
        let gravity = self.config.gravity * self.cage.radius;
        let max_speed = self.config.max_speed * self.cage.radius;

        let previous: Vec<(f64, f64)> = self.bodies.iter().map(|b| (b.x, b.y)).collect();
        for body in self.bodies.iter_mut() {
            body.vy += gravity * dt;
            cap_speed(body, max_speed);
            body.x += body.vx * dt;
            body.y += body.vy * dt;
        }

        for _ in 0..self.config.constraint_iterations {
            self.contain();
            self.separate();
        }

        for (body, (px, py)) in self.bodies.iter_mut().zip(previous) {
            body.vx = (body.x - px) / dt;
            body.vy = (body.y - py) / dt;
            cap_speed(body, max_speed);
        }
    }

    fn contain(&mut self) {
        for body in self.bodies.iter_mut() {
            let (x, y) = self.cage.inset(body.r).project((body.x, body.y));
            body.x = x;
            body.y = y;
        }
    }

    fn separate(&mut self) {
        for (i, j) in self.candidate_pairs() {
            let (a, b) = (self.bodies[i], self.bodies[j]);
            let (dx, dy) = (b.x - a.x, b.y - a.y);
            let d = (dx * dx + dy * dy).sqrt();
            let min = a.r + b.r;
            if d >= min {
                continue;
            }
            let (nx, ny) = if d > 1e-12 {
                (dx / d, dy / d)
            } else {
                // coincident centers: any fixed direction will do
                let angle = (i * 31 + j * 17) as f64;
                (angle.cos(), angle.sin())
            };
            let overlap = min - d;
            let total = a.inv_mass + b.inv_mass;
            let (wa, wb) = (a.inv_mass / total, b.inv_mass / total);
            self.bodies[i].x -= nx * overlap * wa;
            self.bodies[i].y -= ny * overlap * wa;
            self.bodies[j].x += nx * overlap * wb;
            self.bodies[j].y += ny * overlap * wb;
        }
    }

    /// Uniform-grid broad phase. Cells are one max diameter wide, so any
    /// overlapping pair sits in the same or adjacent cells.
    fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let cell_of = |b: &Body| {
            (
                (b.x / self.cell).floor() as i64,
                (b.y / self.cell).floor() as i64,
            )
        };
        let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, body) in self.bodies.iter().enumerate() {
            grid.entry(cell_of(body)).or_default().push(i);
        }

        let mut pairs = Vec::new();
        for (i, body) in self.bodies.iter().enumerate() {
            let (cx, cy) = cell_of(body);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    if let Some(others) = grid.get(&(cx + dx, cy + dy)) {
                        pairs.extend(others.iter().filter(|&&j| j > i).map(|&j| (i, j)));
                    }
                }
            }
        }
        pairs
    }

    fn max_overlap(&self) -> f64 {
        self.candidate_pairs()
            .into_iter()
            .map(|(i, j)| {
                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                let d = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
                ((a.r + b.r - d) / a.r.min(b.r)).max(0.0)
            })
            .fold(0.0, f64::max)
    }
}

fn cap_speed(body: &mut Body, max_speed: f64) {
    let speed = (body.vx * body.vx + body.vy * body.vy).sqrt();
    if speed > max_speed {
        let k = max_speed / speed;
        body.vx *= k;
        body.vy *= k;
    }
}

fn validate(circles: &[Circle]) -> Result<()> {
    let mut ids = HashSet::with_capacity(circles.len());
    for c in circles {
        if !c.r.is_finite() || c.r <= 0.0 {
            return Err(LayoutError::InvalidRadius { id: c.id, r: c.r });
        }
        if !ids.insert(c.id) {
            return Err(LayoutError::DuplicateId(c.id));
        }
    }
    Ok(())
}

/// [`Packer`] backed by the relaxation simulation.
///
/// Owns its random source and its caches: seed point sets per circle count
/// and, for `reuse` calls, the settled layout per circle count.
pub struct RelaxationPacker<R: Rng = ChaCha8Rng> {
    config: RelaxConfig,
    rng: R,
    seeds: LayoutCache<usize, Vec<Vec<(f64, f64)>>>,
    settled: LayoutCache<usize, PackedLayout>,
}

impl<R: Rng> RelaxationPacker<R> {
    pub fn new(config: RelaxConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            seeds: LayoutCache::new(),
            settled: LayoutCache::new(),
        }
    }

    pub fn config(&self) -> &RelaxConfig {
        &self.config
    }

    pub fn clear_cache(&mut self) {
        self.seeds.clear();
        self.settled.clear();
    }

    /// Seed points for `count` circles inside a drop of radius `cage_radius`,
    /// sorted bottom first.
    fn seed_points(&mut self, count: usize, cage_radius: f64) -> Vec<(f64, f64)> {
        let sets = self.config.seed_sets.max(1);
        let rng = &mut self.rng;
        let cached = self.seeds.get_or_compute(count, || {
            let unit = Teardrop::new(1.0);
            (0..sets).map(|_| unit.random_points(&mut *rng, count)).collect()
        });
        let pick = self.rng.gen_range(0..cached.len());

        let mut points: Vec<(f64, f64)> = cached[pick]
            .iter()
            .map(|&(x, y)| (x * cage_radius, y * cage_radius))
            .collect();
        points.sort_by(|a, b| b.1.total_cmp(&a.1));
        points
    }

    fn simulate(&mut self, circles: &[Circle]) -> PackedLayout {
        let cage = Teardrop::new(self.config.cage_radius(circles));
        if circles.len() == 1 {
            let c = circles[0];
            return PackedLayout::new(
                vec![PackedCircle {
                    id: c.id,
                    r: c.r,
                    x: 0.0,
                    y: 0.0,
                }],
                cage.height(),
                true,
                0.0,
            );
        }

        let seeds = self.seed_points(circles.len(), cage.radius);
        let config = self.config.clone();
        let mut world = World::new(circles, &seeds, cage, &config);
        for _ in 0..config.ticks {
            world.tick();
        }

        let mut max_overlap = world.max_overlap();
        if max_overlap > config.overlap_tolerance {
            debug!(
                "layout: overlap {:.4} after {} ticks, extending",
                max_overlap, config.ticks
            );
            for _ in 0..config.extension_iterations {
                world.separate();
                max_overlap = world.max_overlap();
                if max_overlap <= config.overlap_tolerance {
                    break;
                }
            }
        }
        let converged = max_overlap <= config.overlap_tolerance;
        if !converged {
            warn!(
                "layout: {} circles did not converge, max overlap {:.4} of radius",
                circles.len(),
                max_overlap
            );
        }

        let placed = circles
            .iter()
            .zip(&world.bodies)
            .map(|(c, b)| PackedCircle {
                id: c.id,
                r: c.r,
                x: b.x,
                y: b.y,
            })
            .collect();
        PackedLayout::new(placed, cage.height(), converged, max_overlap)
    }
}

impl<R: Rng> Packer for RelaxationPacker<R> {
    fn pack(
        &mut self,
        origin: (f64, f64),
        circles: &[Circle],
        reuse: bool,
    ) -> Result<PackedLayout> {
        validate(circles)?;
        if circles.is_empty() {
            return Ok(PackedLayout::empty());
        }

        if reuse {
            if let Some(cached) = self.settled.get(&circles.len()) {
                let same_input = cached
                    .iter()
                    .zip(circles)
                    .all(|(p, c)| p.id == c.id && p.r == c.r);
                if same_input {
                    debug!("layout: reusing settled layout for {} circles", circles.len());
                    return Ok(cached.translated(origin.0, origin.1));
                }
            }
        }

        let layout = self.simulate(circles);
        debug!(
            "layout: packed {} circles, height {:.3}",
            layout.len(),
            layout.height
        );
        if reuse {
            self.settled.insert(circles.len(), layout.clone());
        }
        Ok(layout.translated(origin.0, origin.1))
    }
}

//! Assembles the waterdrop graph from a normalized dataset.
//!
//! Two layouts are composed. The inner one places one circle per member
//! and is shared by every group, since all groups have the same members.
//! The outer one places one circle per group, large enough to cover the
//! settled inner arrangement at any tilt, so glyphs of different groups
//! never overlap.
//! A glyph ends up at `group position + rotate(member position, group tilt)`.
//! Circles are identified by rank, so the best group and the best member
//! of each group take the first seed, nearest the round end of the drop.

use crate::descriptions::Descriptions;
use crate::error::{Result, WaterdropError};
use crate::levels::{calc_dom_level, fill_levels};
use crate::model::{WaterdropGroup, WaterdropNode, Waterdrops};
use crate::settings::WaterdropSettings;
use cwd_data::{DeliveryDataset, Grouping, QuantileInterpolator, RankingIndex};
use cwd_layout::{Circle, PackedCircle, PackedLayout, Packer};
use cwd_utils::math::rotate_point;
use log::{debug, info, warn};
use rand::Rng;
use std::collections::HashMap;
use std::time::Instant;

pub struct WaterdropBuilder<'a> {
    dataset: &'a DeliveryDataset,
    rankings: &'a RankingIndex,
    descriptions: &'a Descriptions,
    settings: &'a WaterdropSettings,
}

impl<'a> WaterdropBuilder<'a> {
    pub fn new(
        dataset: &'a DeliveryDataset,
        rankings: &'a RankingIndex,
        descriptions: &'a Descriptions,
        settings: &'a WaterdropSettings,
    ) -> Self {
        Self {
            dataset,
            rankings,
            descriptions,
            settings,
        }
    }

    /// Full rebuild for one grouping criterion.
    pub fn build<P, R>(&self, grouping: Grouping, packer: &mut P, rng: &mut R) -> Result<Waterdrops>
    where
        P: Packer + ?Sized,
        R: Rng + ?Sized,
    {
        let started = Instant::now();
        let group_keys = self.dataset.group_keys(grouping);
        let member_keys = self.dataset.member_keys(grouping);

        let member_radius = self.settings.member_radius();
        let member_circles: Vec<Circle> = (0..member_keys.len())
            .map(|rank| Circle::new(rank, member_radius))
            .collect();
        let member_layout = packer.pack((0.0, 0.0), &member_circles, true)?;

        // Group circles must cover the member arrangement at any tilt, and
        // the slack absorbs the overlap the group packing may leave.
        let enclosing = member_layout.enclosing_radius((0.0, 0.0));
        let group_radius = self.settings.group_radius(member_keys.len()).max(enclosing)
            * (1.0 + self.settings.layout.overlap_tolerance);
        let group_circles: Vec<Circle> = (0..group_keys.len())
            .map(|rank| Circle::new(rank, group_radius))
            .collect();
        let group_layout = packer.pack((0.0, 0.0), &group_circles, false)?;
        let converged = group_layout.converged && member_layout.converged;
        if !converged {
            warn!("waterdrops: layout left residual overlap, rendering anyway");
        }

        let group_tilts: Vec<f64> = (0..group_keys.len())
            .map(|_| random_tilt(rng, self.settings.group_tilt_range))
            .collect();

        let mut nodes = Vec::with_capacity(self.dataset.len());
        let mut by_group: HashMap<&str, Vec<WaterdropNode>> = HashMap::new();
        for datum in self.dataset.data() {
            let group_key = grouping.group_key(datum);
            let group_rank = self.rankings.group_rank(grouping, group_key)?;
            let member_rank = self.rankings.rank(grouping, group_key, datum.id)?;
            let group = placement(&group_layout, group_rank)?;
            let member = placement(&member_layout, member_rank)?;
            let group_tilt = group_tilts[group_rank];

            let domain = self
                .dataset
                .normalization_domain(&datum.objective)
                .ok_or_else(|| WaterdropError::MissingDomain(datum.objective.clone()))?;
            let interpolator = QuantileInterpolator::new(&datum.deliveries, domain);
            let levs = fill_levels(&interpolator, self.settings);
            let dom_level = calc_dom_level(&levs);

            let tilt = random_tilt(rng, self.settings.tilt_range);
            let (rx, ry) = rotate_point(member.x, member.y, group_tilt);
            let node = WaterdropNode {
                id: datum.id,
                levs,
                max_lev: self.settings.rad_px,
                dom_level,
                tilt,
                local_x: member.x,
                local_y: member.y,
                global_x: group.x + rx,
                global_y: group.y + ry,
                global_tilt: group_tilt + tilt,
                group_key: group_key.to_string(),
                member_key: grouping.member_key(datum).to_string(),
                member_rank,
            };
            by_group.entry(group_key).or_default().push(node.clone());
            nodes.push(node);
        }

        let mut groups = Vec::with_capacity(group_keys.len());
        for key in group_keys {
            let rank = self.rankings.group_rank(grouping, key)?;
            let placed = placement(&group_layout, rank)?;
            groups.push(WaterdropGroup {
                key: key.clone(),
                rank,
                x: placed.x,
                y: placed.y,
                tilt: group_tilts[rank],
                height: member_layout.height,
                nodes: by_group.remove(key.as_str()).unwrap_or_default(),
                display_name: self.descriptions.display_name(key).to_string(),
            });
        }

        info!(
            "waterdrops: built {} nodes in {} {} groups in {:?}",
            nodes.len(),
            groups.len(),
            grouping,
            started.elapsed()
        );
        debug!(
            "waterdrops: group radius {:.2} (members reach {:.2}), group layout height {:.2}, \
             member layout height {:.2}",
            group_radius, enclosing, group_layout.height, member_layout.height
        );

        Ok(Waterdrops {
            grouping,
            nodes,
            groups,
            height: group_layout.height,
            converged,
        })
    }
}

fn placement(layout: &PackedLayout, id: usize) -> Result<&PackedCircle> {
    layout.get(id).ok_or(WaterdropError::MissingPlacement(id))
}

fn random_tilt<R: Rng + ?Sized>(rng: &mut R, range: f64) -> f64 {
    if range > 0.0 {
        rng.gen_range(-range..=range)
    } else {
        0.0
    }
}

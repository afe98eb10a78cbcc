//! Mean-delivery rankings of groups and of members within each group.
//!
//! Two means are in play and kept apart on purpose:
//!
//! - **group desirability** pools every delivery of a group, each divided
//!   by its objective's baseline maximum, so objectives of very different
//!   magnitude compare fairly;
//! - **member mean** is the plain mean of one record's deliveries, used to
//!   order members inside a group.
//!
//! Either site can be switched through [`RankingPolicy`].

use crate::dataset::{DatumId, DeliveryDataset, FlattenedDatum};
use crate::error::{DataError, Result};
use crate::grouping::Grouping;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How deliveries are scaled before averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationPolicy {
    /// Raw TAF values.
    Raw,
    /// Each value divided by its objective's baseline maximum.
    BaselineMax,
}

impl NormalizationPolicy {
    fn scale(&self, dataset: &DeliveryDataset, datum: &FlattenedDatum) -> Option<f64> {
        match self {
            NormalizationPolicy::Raw => Some(1.0),
            NormalizationPolicy::BaselineMax => match dataset.baseline_max(&datum.objective) {
                Some(max) if max > 0.0 => Some(max),
                _ => None,
            },
        }
    }

    /// Mean over the pooled deliveries of `ids`.
    ///
    /// Series may differ in length; every delivery weighs the same. A
    /// record whose objective has a zero baseline maximum contributes
    /// zeros under [`NormalizationPolicy::BaselineMax`].
    pub fn pooled_mean(&self, dataset: &DeliveryDataset, ids: &[DatumId]) -> Result<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for &id in ids {
            let datum = dataset.datum(id)?;
            count += datum.deliveries.len();
            if let Some(scale) = self.scale(dataset, datum) {
                sum += datum.deliveries.iter().sum::<f64>() / scale;
            }
        }
        Ok(if count == 0 { 0.0 } else { sum / count as f64 })
    }
}

/// Normalization policy per ranking site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingPolicy {
    pub groups: NormalizationPolicy,
    pub members: NormalizationPolicy,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            groups: NormalizationPolicy::BaselineMax,
            members: NormalizationPolicy::Raw,
        }
    }
}

/// Ranking of one group and of its members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRanking {
    pub key: String,
    /// 0 is the most desirable group.
    pub rank: usize,
    pub mean: f64,
    /// Member ids, best first.
    pub members: Vec<DatumId>,
    #[serde(skip)]
    member_ranks: HashMap<DatumId, usize>,
}

impl GroupRanking {
    pub fn member_rank(&self, id: DatumId) -> Option<usize> {
        self.member_ranks.get(&id).copied()
    }
}

#[derive(Debug, Clone, Default)]
struct CriterionRanking {
    groups: HashMap<String, GroupRanking>,
    order: Vec<String>,
}

/// Rank lookups for both grouping criteria, built once per dataset.
#[derive(Debug, Clone)]
pub struct RankingIndex {
    policy: RankingPolicy,
    criteria: HashMap<Grouping, CriterionRanking>,
}

impl RankingIndex {
    pub fn build(dataset: &DeliveryDataset, policy: RankingPolicy) -> Result<Self> {
        let mut criteria = HashMap::new();
        for grouping in Grouping::ALL {
            criteria.insert(grouping, rank_criterion(dataset, grouping, policy)?);
        }
        Ok(Self { policy, criteria })
    }

    pub fn policy(&self) -> RankingPolicy {
        self.policy
    }

    fn criterion(&self, grouping: Grouping) -> &CriterionRanking {
        // both criteria are always built
        &self.criteria[&grouping]
    }

    pub fn group(&self, grouping: Grouping, group_key: &str) -> Result<&GroupRanking> {
        self.criterion(grouping)
            .groups
            .get(group_key)
            .ok_or_else(|| DataError::MissingRankEntry {
                grouping,
                group: group_key.to_string(),
                member: None,
            })
    }

    pub fn group_rank(&self, grouping: Grouping, group_key: &str) -> Result<usize> {
        self.group(grouping, group_key).map(|g| g.rank)
    }

    pub fn rank(&self, grouping: Grouping, group_key: &str, member: DatumId) -> Result<usize> {
        self.group(grouping, group_key)?
            .member_rank(member)
            .ok_or_else(|| DataError::MissingRankEntry {
                grouping,
                group: group_key.to_string(),
                member: Some(member),
            })
    }

    /// Groups ordered best first.
    pub fn ordered_groups(&self, grouping: Grouping) -> impl Iterator<Item = &GroupRanking> {
        let criterion = self.criterion(grouping);
        criterion.order.iter().map(move |key| &criterion.groups[key])
    }
}

fn rank_criterion(
    dataset: &DeliveryDataset,
    grouping: Grouping,
    policy: RankingPolicy,
) -> Result<CriterionRanking> {
    let mut members: HashMap<&str, Vec<DatumId>> = HashMap::new();
    for datum in dataset.data() {
        members
            .entry(grouping.group_key(datum))
            .or_default()
            .push(datum.id);
    }

    let mut scored = Vec::with_capacity(dataset.group_keys(grouping).len());
    for key in dataset.group_keys(grouping) {
        let mut ids = members.remove(key.as_str()).unwrap_or_default();
        let mean = policy.groups.pooled_mean(dataset, &ids)?;

        let mut member_means = HashMap::with_capacity(ids.len());
        for &id in &ids {
            member_means.insert(id, policy.members.pooled_mean(dataset, &[id])?);
        }
        // stable: ties keep traversal order
        ids.sort_by(|a, b| member_means[b].total_cmp(&member_means[a]));

        scored.push((key.clone(), mean, ids));
    }
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut ranking = CriterionRanking::default();
    for (rank, (key, mean, ids)) in scored.into_iter().enumerate() {
        let member_ranks = ids.iter().enumerate().map(|(r, &id)| (id, r)).collect();
        ranking.order.push(key.clone());
        ranking.groups.insert(
            key.clone(),
            GroupRanking {
                key,
                rank,
                mean,
                members: ids,
                member_ranks,
            },
        );
    }
    debug!(
        "ranking: {} {} groups ranked",
        ranking.order.len(),
        grouping
    );

    Ok(ranking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{two_by_three, SAMPLE_OBJECTIVES};
    use crate::dataset::{NormalizeOptions, ObjectiveRecord, ScenarioRecord};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dataset(records: Vec<ObjectiveRecord>) -> DeliveryDataset {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        DeliveryDataset::normalize(records, &NormalizeOptions::default(), &mut rng).unwrap()
    }

    fn is_permutation(mut ranks: Vec<usize>) -> bool {
        ranks.sort_unstable();
        ranks.iter().enumerate().all(|(i, &r)| i == r)
    }

    #[test]
    fn test_ranks_are_permutations() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let dataset =
            DeliveryDataset::from_json(SAMPLE_OBJECTIVES, &NormalizeOptions::default(), &mut rng)
                .unwrap();
        let index = RankingIndex::build(&dataset, RankingPolicy::default()).unwrap();

        for grouping in Grouping::ALL {
            let keys = dataset.group_keys(grouping);
            let group_ranks = keys
                .iter()
                .map(|k| index.group_rank(grouping, k).unwrap())
                .collect();
            assert!(is_permutation(group_ranks));

            for key in keys {
                let member_ranks = dataset
                    .data()
                    .iter()
                    .filter(|d| grouping.group_key(d) == key)
                    .map(|d| index.rank(grouping, key, d.id).unwrap())
                    .collect::<Vec<_>>();
                assert_eq!(member_ranks.len(), dataset.member_keys(grouping).len());
                assert!(is_permutation(member_ranks));
            }
        }
    }

    #[test]
    fn test_groups_ranked_by_normalized_mean() {
        // A: raw mean 20, baseline max 40 -> normalized 0.5
        // B: raw mean 10, baseline max 10 -> normalized 1.0
        let records = vec![
            ObjectiveRecord {
                obj: "A".to_string(),
                scens: vec![
                    ScenarioRecord {
                        name: "expl0000".to_string(),
                        delivs: vec![40.0, 0.0],
                    },
                    ScenarioRecord {
                        name: "expl0001".to_string(),
                        delivs: vec![20.0, 20.0],
                    },
                ],
            },
            ObjectiveRecord {
                obj: "B".to_string(),
                scens: vec![
                    ScenarioRecord {
                        name: "expl0000".to_string(),
                        delivs: vec![10.0, 0.0],
                    },
                    ScenarioRecord {
                        name: "expl0001".to_string(),
                        delivs: vec![15.0, 15.0],
                    },
                ],
            },
        ];
        let dataset = dataset(records);

        let normalized = RankingIndex::build(&dataset, RankingPolicy::default()).unwrap();
        assert_eq!(normalized.group_rank(Grouping::Objective, "B").unwrap(), 0);
        assert_eq!(normalized.group_rank(Grouping::Objective, "A").unwrap(), 1);

        let raw = RankingIndex::build(
            &dataset,
            RankingPolicy {
                groups: NormalizationPolicy::Raw,
                members: NormalizationPolicy::Raw,
            },
        )
        .unwrap();
        assert_eq!(raw.group_rank(Grouping::Objective, "A").unwrap(), 0);
    }

    #[test]
    fn test_members_ranked_by_raw_mean() {
        let dataset = dataset(two_by_three());
        let index = RankingIndex::build(&dataset, RankingPolicy::default()).unwrap();

        // A: expl0000 mean 26.7, expl0001 mean 20, expl0002 mean 10
        let best = dataset.id_of("A", "expl0000").unwrap();
        let worst = dataset.id_of("A", "expl0002").unwrap();
        assert_eq!(index.rank(Grouping::Objective, "A", best).unwrap(), 0);
        assert_eq!(index.rank(Grouping::Objective, "A", worst).unwrap(), 2);

        let group = index.group(Grouping::Objective, "A").unwrap();
        assert_eq!(group.members.first(), Some(&best));
        assert_eq!(group.members.last(), Some(&worst));
    }

    #[test]
    fn test_ties_keep_traversal_order() {
        let records = vec![
            ObjectiveRecord {
                obj: "A".to_string(),
                scens: vec![ScenarioRecord {
                    name: "expl0000".to_string(),
                    delivs: vec![10.0],
                }],
            },
            ObjectiveRecord {
                obj: "B".to_string(),
                scens: vec![ScenarioRecord {
                    name: "expl0000".to_string(),
                    delivs: vec![10.0],
                }],
            },
        ];
        let dataset = dataset(records);
        let index = RankingIndex::build(&dataset, RankingPolicy::default()).unwrap();
        let order: Vec<&str> = index
            .ordered_groups(Grouping::Objective)
            .map(|g| g.key.as_str())
            .collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn test_unknown_keys_are_errors() {
        let dataset = dataset(two_by_three());
        let index = RankingIndex::build(&dataset, RankingPolicy::default()).unwrap();

        assert!(matches!(
            index.group_rank(Grouping::Objective, "C"),
            Err(DataError::MissingRankEntry { member: None, .. })
        ));
        // id 3 belongs to objective B
        assert!(matches!(
            index.rank(Grouping::Objective, "A", 3),
            Err(DataError::MissingRankEntry {
                member: Some(3),
                ..
            })
        ));
    }

    #[test]
    fn test_ragged_series_pool_by_delivery() {
        let records = vec![ObjectiveRecord {
            obj: "A".to_string(),
            scens: vec![
                ScenarioRecord {
                    name: "expl0000".to_string(),
                    delivs: vec![10.0],
                },
                ScenarioRecord {
                    name: "expl0001".to_string(),
                    delivs: vec![4.0, 4.0, 4.0],
                },
            ],
        }];
        let dataset = dataset(records);
        let ids: Vec<DatumId> = dataset.data().iter().map(|d| d.id).collect();
        let mean = NormalizationPolicy::Raw.pooled_mean(&dataset, &ids).unwrap();
        assert!((mean - 5.5).abs() < 1e-12);
    }
}

//! Delivery dataset normalization.
//!
//! Turns the nested objective → scenario → yearly delivery export into a
//! flat arena of [`FlattenedDatum`] records with dense ids. All objectives
//! are reduced to one canonical scenario set, every series is clamped and
//! sorted descending, and the baseline scenario's chronological series is
//! kept aside for year-by-year display.

use crate::error::{DataError, Result};
use crate::grouping::Grouping;
use cwd_scenario::{parse_code_key, ScenarioCodec, BASELINE_KEY};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Dense, 0-based identifier of a flattened (objective, scenario) record.
pub type DatumId = usize;

/// One objective as exported by the model runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveRecord {
    pub obj: String,
    pub scens: Vec<ScenarioRecord>,
}

/// One scenario's yearly deliveries (TAF), in export order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub name: String,
    pub delivs: Vec<f64>,
}

/// Parse the objectives export (`[{obj, scens: [{name, delivs}]}]`).
pub fn parse_objectives(json: &str) -> Result<Vec<ObjectiveRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// A single (objective, scenario) pair with its sorted deliveries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlattenedDatum {
    pub id: DatumId,
    pub objective: String,
    pub scenario: String,
    /// Deliveries sorted descending, not chronological.
    pub deliveries: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Keep every Nth scenario of the reference objective (1 keeps all).
    pub scenario_stride: usize,
    /// Scenario always kept and used as the normalization reference.
    pub baseline_key: String,
    /// Deliveries are clamped to `[0, max_deliveries]` when set.
    pub max_deliveries: Option<f64>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            scenario_stride: 1,
            baseline_key: BASELINE_KEY.to_string(),
            max_deliveries: Some(1200.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ObjectiveSummary {
    /// Baseline deliveries in their original (chronological) order.
    baseline_yearly: Vec<f64>,
    baseline_max: f64,
}

/// The normalized, read-only delivery dataset.
///
/// Records live in a dense vector; `index` maps ids to positions so
/// lookups never rely on an id happening to equal its slot.
#[derive(Debug, Clone)]
pub struct DeliveryDataset {
    objective_ids: Vec<String>,
    scenario_ids: Vec<String>,
    summaries: HashMap<String, ObjectiveSummary>,
    data: Vec<FlattenedDatum>,
    index: HashMap<DatumId, usize>,
    pairs: HashMap<(String, String), DatumId>,
    baseline_key: String,
}

impl DeliveryDataset {
    /// Normalize raw objective records into a flattened dataset.
    ///
    /// Scenario lists are shuffled with `rng` before the canonical subset is
    /// drawn, so runs of identical results don't cluster deterministically.
    pub fn normalize<R: Rng + ?Sized>(
        records: Vec<ObjectiveRecord>,
        options: &NormalizeOptions,
        rng: &mut R,
    ) -> Result<Self> {
        if options.scenario_stride == 0 {
            return Err(DataError::InvalidStride);
        }
        if records.is_empty() {
            return Err(DataError::EmptyDataset);
        }

        let baseline = options.baseline_key.as_str();
        let mut seen_objectives = HashSet::new();
        let mut prepared: Vec<(String, Vec<ScenarioRecord>, Option<Vec<f64>>)> = Vec::new();

        for record in records {
            if !seen_objectives.insert(record.obj.clone()) {
                warn!("dataset: duplicate objective {} ignored", record.obj);
                continue;
            }

            let mut scens = record.scens;
            scens.shuffle(rng);

            let mut seen_scenarios = HashSet::new();
            scens.retain(|scen| {
                let fresh = seen_scenarios.insert(scen.name.clone());
                if !fresh {
                    warn!(
                        "dataset: duplicate scenario {} in objective {} ignored",
                        scen.name, record.obj
                    );
                }
                fresh
            });

            let mut baseline_yearly = None;
            for scen in scens.iter_mut() {
                if let Some(ceiling) = options.max_deliveries {
                    for v in scen.delivs.iter_mut() {
                        *v = v.clamp(0.0, ceiling);
                    }
                }
                if scen.name == baseline {
                    baseline_yearly = Some(scen.delivs.clone());
                }
                scen.delivs.sort_by(|a, b| b.total_cmp(a));
            }

            prepared.push((record.obj, scens, baseline_yearly));
        }

        let scenario_ids = canonical_scenarios(&prepared[0].1, options);
        if !scenario_ids.iter().any(|s| s == baseline) {
            return Err(DataError::MissingBaseline {
                objective: prepared[0].0.clone(),
                baseline: baseline.to_string(),
            });
        }
        debug!(
            "dataset: {} canonical scenarios (stride {})",
            scenario_ids.len(),
            options.scenario_stride
        );

        let mut objective_ids = Vec::with_capacity(prepared.len());
        let mut summaries = HashMap::new();
        let mut data = Vec::with_capacity(prepared.len() * scenario_ids.len());
        let mut index = HashMap::new();
        let mut pairs = HashMap::new();

        for (objective, scens, baseline_yearly) in prepared {
            let mut by_name: HashMap<String, Vec<f64>> = scens
                .into_iter()
                .map(|scen| (scen.name, scen.delivs))
                .collect();

            let missing: Vec<String> = scenario_ids
                .iter()
                .filter(|key| !by_name.contains_key(*key))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(DataError::InconsistentScenarioSet { objective, missing });
            }
            let dropped = by_name.len() - scenario_ids.len();
            if dropped > 0 {
                debug!("dataset: {} scenarios filtered from {}", dropped, objective);
            }

            for scenario in &scenario_ids {
                let deliveries = by_name.remove(scenario).unwrap_or_default();
                if deliveries.is_empty() {
                    return Err(DataError::EmptyDeliveries {
                        objective,
                        scenario: scenario.clone(),
                    });
                }
                let id = data.len();
                index.insert(id, data.len());
                pairs.insert((objective.clone(), scenario.clone()), id);
                data.push(FlattenedDatum {
                    id,
                    objective: objective.clone(),
                    scenario: scenario.clone(),
                    deliveries,
                });
            }

            let baseline_yearly = baseline_yearly.unwrap_or_default();
            let baseline_max = baseline_yearly
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max)
                .max(0.0);
            summaries.insert(
                objective.clone(),
                ObjectiveSummary {
                    baseline_yearly,
                    baseline_max,
                },
            );
            objective_ids.push(objective);
        }

        info!(
            "dataset: loaded {} objectives x {} scenarios ({} records)",
            objective_ids.len(),
            scenario_ids.len(),
            data.len()
        );

        Ok(Self {
            objective_ids,
            scenario_ids,
            summaries,
            data,
            index,
            pairs,
            baseline_key: baseline.to_string(),
        })
    }

    /// Parse the JSON export and normalize it in one step.
    pub fn from_json<R: Rng + ?Sized>(
        json: &str,
        options: &NormalizeOptions,
        rng: &mut R,
    ) -> Result<Self> {
        Self::normalize(parse_objectives(json)?, options, rng)
    }

    pub fn objective_ids(&self) -> &[String] {
        &self.objective_ids
    }

    pub fn scenario_ids(&self) -> &[String] {
        &self.scenario_ids
    }

    pub fn baseline_key(&self) -> &str {
        &self.baseline_key
    }

    /// Keys of the groups under `grouping`, in dataset traversal order.
    pub fn group_keys(&self, grouping: Grouping) -> &[String] {
        match grouping {
            Grouping::Objective => &self.objective_ids,
            Grouping::Scenario => &self.scenario_ids,
        }
    }

    /// Keys of the members within each group under `grouping`.
    pub fn member_keys(&self, grouping: Grouping) -> &[String] {
        match grouping {
            Grouping::Objective => &self.scenario_ids,
            Grouping::Scenario => &self.objective_ids,
        }
    }

    /// All records, objective-major and scenario-minor.
    pub fn data(&self) -> &[FlattenedDatum] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, id: DatumId) -> Option<&FlattenedDatum> {
        self.index.get(&id).map(|&slot| &self.data[slot])
    }

    pub fn datum(&self, id: DatumId) -> Result<&FlattenedDatum> {
        self.get(id).ok_or(DataError::UnknownDatum(id))
    }

    pub fn id_of(&self, objective: &str, scenario: &str) -> Option<DatumId> {
        self.pairs
            .get(&(objective.to_string(), scenario.to_string()))
            .copied()
    }

    /// Baseline deliveries of an objective in chronological order.
    pub fn baseline_yearly(&self, objective: &str) -> Option<&[f64]> {
        self.summaries
            .get(objective)
            .map(|s| s.baseline_yearly.as_slice())
    }

    pub fn baseline_max(&self, objective: &str) -> Option<f64> {
        self.summaries.get(objective).map(|s| s.baseline_max)
    }

    /// `[0, baseline max]`, the domain fill levels are normalized against.
    pub fn normalization_domain(&self, objective: &str) -> Option<(f64, f64)> {
        self.baseline_max(objective).map(|max| (0.0, max))
    }

    /// Per-setting fractions `(index + 1) / option count` for a scenario key.
    pub fn settings_fractions(&self, codec: &ScenarioCodec, scenario: &str) -> Result<[f64; 5]> {
        Ok(codec.settings_fractions(parse_code_key(scenario)?)?)
    }
}

/// Every Nth scenario of the reference list by position, plus the baseline.
fn canonical_scenarios(reference: &[ScenarioRecord], options: &NormalizeOptions) -> Vec<String> {
    reference
        .iter()
        .enumerate()
        .filter(|(i, scen)| {
            i % options.scenario_stride == 0 || scen.name == options.baseline_key
        })
        .map(|(_, scen)| scen.name.clone())
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    pub(crate) const SAMPLE_OBJECTIVES: &str =
        include_str!("../../fixtures/objectives_sample.json");

    fn scen(name: &str, delivs: &[f64]) -> ScenarioRecord {
        ScenarioRecord {
            name: name.to_string(),
            delivs: delivs.to_vec(),
        }
    }

    pub(crate) fn two_by_three() -> Vec<ObjectiveRecord> {
        vec![
            ObjectiveRecord {
                obj: "A".to_string(),
                scens: vec![
                    scen("expl0000", &[40.0, 10.0, 30.0]),
                    scen("expl0001", &[20.0, 20.0, 20.0]),
                    scen("expl0002", &[5.0, 15.0, 10.0]),
                ],
            },
            ObjectiveRecord {
                obj: "B".to_string(),
                scens: vec![
                    scen("expl0000", &[10.0, 5.0, 15.0]),
                    scen("expl0001", &[12.0, 12.0, 12.0]),
                    scen("expl0002", &[25.0, 5.0, 15.0]),
                ],
            },
        ]
    }

    #[test]
    fn test_flatten_is_objective_major() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let dataset =
            DeliveryDataset::normalize(two_by_three(), &NormalizeOptions::default(), &mut rng)
                .unwrap();

        assert_eq!(dataset.len(), 6);
        let ids: Vec<DatumId> = dataset.data().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        for (i, datum) in dataset.data().iter().enumerate() {
            let objective = if i < 3 { "A" } else { "B" };
            assert_eq!(datum.objective, objective);
            assert_eq!(datum.scenario, dataset.scenario_ids()[i % 3]);
        }
    }

    #[test]
    fn test_flatten_is_stable_for_a_fixed_seed() {
        let options = NormalizeOptions::default();
        let a = DeliveryDataset::normalize(
            two_by_three(),
            &options,
            &mut ChaCha8Rng::seed_from_u64(9),
        )
        .unwrap();
        let b = DeliveryDataset::normalize(
            two_by_three(),
            &options,
            &mut ChaCha8Rng::seed_from_u64(9),
        )
        .unwrap();
        assert_eq!(a.data(), b.data());
        assert_eq!(a.scenario_ids(), b.scenario_ids());
    }

    #[test]
    fn test_deliveries_sorted_and_baseline_kept_chronological() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let dataset =
            DeliveryDataset::normalize(two_by_three(), &NormalizeOptions::default(), &mut rng)
                .unwrap();

        let id = dataset.id_of("A", "expl0000").unwrap();
        assert_eq!(dataset.datum(id).unwrap().deliveries, vec![40.0, 30.0, 10.0]);
        assert_eq!(dataset.baseline_yearly("A").unwrap(), &[40.0, 10.0, 30.0]);
        assert_eq!(dataset.baseline_max("B"), Some(15.0));
        assert_eq!(dataset.normalization_domain("A"), Some((0.0, 40.0)));
    }

    #[test]
    fn test_deliveries_are_clamped() {
        let records = vec![ObjectiveRecord {
            obj: "A".to_string(),
            scens: vec![scen("expl0000", &[-5.0, 2000.0, 100.0])],
        }];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let dataset =
            DeliveryDataset::normalize(records, &NormalizeOptions::default(), &mut rng).unwrap();
        assert_eq!(dataset.data()[0].deliveries, vec![1200.0, 100.0, 0.0]);
    }

    #[test]
    fn test_stride_keeps_baseline() {
        let records = vec![ObjectiveRecord {
            obj: "A".to_string(),
            scens: (0..10)
                .map(|i| scen(&format!("expl{:04}", i), &[i as f64]))
                .collect(),
        }];
        let options = NormalizeOptions {
            scenario_stride: 4,
            ..NormalizeOptions::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let dataset = DeliveryDataset::normalize(records, &options, &mut rng).unwrap();

        // positions 0, 4, 8 plus the baseline wherever it landed
        let kept = dataset.scenario_ids().len();
        assert!(kept == 3 || kept == 4);
        assert!(dataset.scenario_ids().iter().any(|s| s == BASELINE_KEY));
    }

    #[test]
    fn test_inconsistent_scenario_set_fails() {
        let mut records = two_by_three();
        records[1].scens.pop();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let err = DeliveryDataset::normalize(records, &NormalizeOptions::default(), &mut rng)
            .unwrap_err();
        match err {
            DataError::InconsistentScenarioSet { objective, missing } => {
                assert_eq!(objective, "B");
                assert_eq!(missing, vec!["expl0002".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extra_scenarios_are_filtered() {
        let mut records = two_by_three();
        records[1].scens.push(scen("expl0003", &[1.0]));
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let dataset =
            DeliveryDataset::normalize(records, &NormalizeOptions::default(), &mut rng).unwrap();
        assert_eq!(dataset.len(), 6);
        assert!(dataset.id_of("B", "expl0003").is_none());
    }

    #[test]
    fn test_missing_baseline_fails() {
        let mut records = two_by_three();
        for record in records.iter_mut() {
            record.scens.retain(|s| s.name != BASELINE_KEY);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(matches!(
            DeliveryDataset::normalize(records, &NormalizeOptions::default(), &mut rng),
            Err(DataError::MissingBaseline { .. })
        ));
    }

    #[test]
    fn test_duplicates_keep_first() {
        let mut records = two_by_three();
        records.push(records[0].clone());
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let dataset =
            DeliveryDataset::normalize(records, &NormalizeOptions::default(), &mut rng).unwrap();
        assert_eq!(dataset.objective_ids(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_empty_inputs_fail() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(matches!(
            DeliveryDataset::normalize(Vec::new(), &NormalizeOptions::default(), &mut rng),
            Err(DataError::EmptyDataset)
        ));
        let options = NormalizeOptions {
            scenario_stride: 0,
            ..NormalizeOptions::default()
        };
        assert!(matches!(
            DeliveryDataset::normalize(two_by_three(), &options, &mut rng),
            Err(DataError::InvalidStride)
        ));
    }

    #[test]
    fn test_sample_fixture_loads() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let dataset =
            DeliveryDataset::from_json(SAMPLE_OBJECTIVES, &NormalizeOptions::default(), &mut rng)
                .unwrap();
        assert_eq!(dataset.objective_ids().len(), 3);
        assert_eq!(dataset.scenario_ids().len(), 4);
        assert_eq!(dataset.len(), 12);
        assert_eq!(dataset.group_keys(Grouping::Scenario).len(), 4);
        assert_eq!(dataset.member_keys(Grouping::Scenario).len(), 3);
    }

    #[test]
    fn test_settings_fractions_for_key() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let dataset =
            DeliveryDataset::from_json(SAMPLE_OBJECTIVES, &NormalizeOptions::default(), &mut rng)
                .unwrap();
        let fractions = dataset
            .settings_fractions(&ScenarioCodec::default(), "expl0000")
            .unwrap();
        assert_eq!(fractions[0], 1.0);
        assert!(dataset
            .settings_fractions(&ScenarioCodec::default(), "baseline")
            .is_err());
    }
}

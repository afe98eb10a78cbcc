//! Conversion of raw model exports into the objectives JSON.
//!
//! Each export is one CSV per objective:
//!
//! ```text
//! ,expl0000,expl0001,...      <- scenario names (first column is a label)
//! <6 rows of unit/metadata>   <- skipped
//! 1921-10-31,312.4,298.0,...  <- one row per month, first column a date label
//! ```
//!
//! Monthly values are averaged per water year (October through September),
//! optionally reduced to evenly spaced percentiles, and truncated to whole TAF.

use crate::dataset::{ObjectiveRecord, ScenarioRecord};
use crate::error::{DataError, Result};
use csv::ReaderBuilder;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// Metadata rows between the header and the first monthly row.
    pub skip_rows: usize,
    /// Months from the start of the series to the first October.
    pub month_offset: usize,
    /// Reduce each yearly series to `n + 1` percentiles when set.
    pub percentiles: Option<usize>,
    pub objective_filter: Option<Vec<String>>,
    pub scenario_filter: Option<Vec<String>>,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            skip_rows: 6,
            month_offset: 3,
            percentiles: None,
            objective_filter: None,
            scenario_filter: None,
        }
    }
}

/// Average consecutive 12-month windows starting `offset` months in.
///
/// The trailing window may be shorter than 12 months; a window with no
/// months at all is dropped.
pub fn monthly_to_yearly(monthly: &[f64], offset: usize) -> Vec<f64> {
    let years = monthly.len().div_ceil(12);
    (0..years)
        .filter_map(|i| {
            let start = i * 12 + offset;
            let end = ((i + 1) * 12 + offset).min(monthly.len());
            if start >= end {
                return None;
            }
            let window = &monthly[start..end];
            Some(window.iter().sum::<f64>() / window.len() as f64)
        })
        .collect()
}

/// `slices + 1` linearly interpolated percentiles of an ordered series.
pub fn percentiles(values: &[f64], slices: usize) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    if slices == 0 {
        return vec![values[0]];
    }
    (0..=slices)
        .map(|i| {
            let x = i as f64 * (n - 1) as f64 / slices as f64;
            let lo = x.floor() as usize;
            let hi = x.ceil() as usize;
            if lo == hi {
                values[lo]
            } else {
                values[lo] + (values[hi] - values[lo]) * (x - lo as f64)
            }
        })
        .collect()
}

/// Parse one objective export. Returns `None` if the objective is filtered out.
pub fn parse_objective_csv(
    objective: &str,
    csv_data: &str,
    options: &PreprocessOptions,
) -> Result<Option<ObjectiveRecord>> {
    if let Some(filter) = &options.objective_filter {
        if !filter.iter().any(|o| o == objective) {
            return Ok(None);
        }
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_data.as_bytes());
    let mut records = rdr.records();

    let header = records
        .next()
        .ok_or_else(|| DataError::InvalidFormat(format!("{}: missing header row", objective)))??;
    // column index -> scenario name, for kept scenarios only
    let columns: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .skip(1)
        .map(|(col, name)| (col, name.trim().to_string()))
        .filter(|(_, name)| match &options.scenario_filter {
            Some(filter) => filter.iter().any(|s| s == name),
            None => true,
        })
        .collect();

    let mut monthly: Vec<Vec<f64>> = vec![Vec::new(); columns.len()];
    for (row, result) in records.enumerate().skip(options.skip_rows) {
        let record = result?;
        for (slot, (col, name)) in columns.iter().enumerate() {
            let raw = record.get(*col).unwrap_or("").trim();
            let value = raw.parse::<f64>().map_err(|_| {
                DataError::InvalidFormat(format!(
                    "{}: non-numeric value {:?} for {} on row {}",
                    objective,
                    raw,
                    name,
                    row + 2
                ))
            })?;
            monthly[slot].push(value);
        }
    }

    let scens = columns
        .into_iter()
        .zip(monthly)
        .map(|((_, name), months)| {
            let yearly = monthly_to_yearly(&months, options.month_offset);
            let simplified = match options.percentiles {
                Some(slices) => percentiles(&yearly, slices),
                None => yearly,
            };
            ScenarioRecord {
                name,
                delivs: simplified.into_iter().map(f64::trunc).collect(),
            }
        })
        .collect();

    Ok(Some(ObjectiveRecord {
        obj: objective.to_string(),
        scens,
    }))
}

/// Convert every CSV file in `dir` (sorted by file name) into objective records.
///
/// The objective id is the file name up to its first `.`. Filter entries
/// that match nothing are reported as warnings.
pub fn preprocess_dir(dir: &Path, options: &PreprocessOptions) -> Result<Vec<ObjectiveRecord>> {
    let mut files: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut objectives = Vec::new();
    for path in files {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let objective = file_name.split('.').next().unwrap_or(file_name);
        let csv_data = std::fs::read_to_string(&path)?;
        if let Some(record) = parse_objective_csv(objective, &csv_data, options)? {
            info!(
                "preprocess: {} ({} scenarios)",
                record.obj,
                record.scens.len()
            );
            objectives.push(record);
        }
    }

    report_unmatched_filters(&objectives, options);
    Ok(objectives)
}

fn report_unmatched_filters(objectives: &[ObjectiveRecord], options: &PreprocessOptions) {
    if let Some(filter) = &options.objective_filter {
        let found: HashSet<&str> = objectives.iter().map(|o| o.obj.as_str()).collect();
        let missing: Vec<&str> = filter
            .iter()
            .map(String::as_str)
            .filter(|o| !found.contains(o))
            .collect();
        if !missing.is_empty() {
            warn!(
                "preprocess: the following objectives were not found: {}",
                missing.join(", ")
            );
        }
    }
    if let Some(filter) = &options.scenario_filter {
        let found: HashSet<&str> = objectives
            .iter()
            .flat_map(|o| o.scens.iter().map(|s| s.name.as_str()))
            .collect();
        let missing: Vec<&str> = filter
            .iter()
            .map(String::as_str)
            .filter(|s| !found.contains(s))
            .collect();
        if !missing.is_empty() {
            warn!(
                "preprocess: the following scenarios were not found: {}",
                missing.join(", ")
            );
        }
    }
}

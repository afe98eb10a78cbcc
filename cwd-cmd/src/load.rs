//! Loading helpers shared by the commands.

use anyhow::Context;
use cwd_data::{DeliveryDataset, Grouping};
use cwd_waterdrops::{Descriptions, WaterdropSettings};
use log::info;
use rand::Rng;
use std::path::Path;

/// Settings from `path`, or the defaults.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<WaterdropSettings> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let settings = WaterdropSettings::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?;
            info!("Loaded settings from {}", path.display());
            Ok(settings)
        }
        None => Ok(WaterdropSettings::default()),
    }
}

pub fn load_dataset<R: Rng + ?Sized>(
    path: &Path,
    settings: &WaterdropSettings,
    rng: &mut R,
) -> anyhow::Result<DeliveryDataset> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading objectives {}", path.display()))?;
    let dataset = DeliveryDataset::from_json(&json, &settings.normalize, rng)
        .with_context(|| format!("normalizing objectives {}", path.display()))?;
    info!(
        "Loaded {} objectives x {} scenarios from {}",
        dataset.objective_ids().len(),
        dataset.scenario_ids().len(),
        path.display()
    );
    Ok(dataset)
}

/// Descriptions from `path`, or none (every label falls back to its key).
pub fn load_descriptions(path: Option<&Path>) -> anyhow::Result<Descriptions> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading descriptions {}", path.display()))?;
            Ok(Descriptions::from_json(&json)
                .with_context(|| format!("parsing descriptions {}", path.display()))?)
        }
        None => Ok(Descriptions::default()),
    }
}

pub fn parse_grouping(grouping: &str) -> anyhow::Result<Grouping> {
    Ok(grouping.parse::<Grouping>()?)
}

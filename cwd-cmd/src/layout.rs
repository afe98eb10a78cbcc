//! Waterdrop layout command.

use crate::load::{load_dataset, load_descriptions, load_settings, parse_grouping};
use cwd_data::RankingIndex;
use cwd_layout::RelaxationPacker;
use cwd_utils::rng::seeded;
use cwd_waterdrops::{WaterdropBuilder, Waterdrops};
use log::{info, warn};
use std::io::Write;
use std::path::PathBuf;

pub struct LayoutArgs {
    pub objectives: PathBuf,
    pub descriptions: Option<PathBuf>,
    pub grouping: String,
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub pretty: bool,
}

/// Load, normalize, rank and lay out the dataset.
///
/// The packer gets its own random stream so the seed points do not depend
/// on how many draws normalization made.
pub fn build_layout(args: &LayoutArgs) -> anyhow::Result<Waterdrops> {
    let grouping = parse_grouping(&args.grouping)?;
    let settings = load_settings(args.config.as_deref())?;
    let mut rng = seeded(args.seed);
    let dataset = load_dataset(&args.objectives, &settings, &mut rng)?;
    let rankings = RankingIndex::build(&dataset, settings.ranking)?;
    let descriptions = load_descriptions(args.descriptions.as_deref())?;

    let mut packer = RelaxationPacker::new(
        settings.layout.clone(),
        seeded(args.seed.map(|s| s.wrapping_add(1))),
    );
    let drops = WaterdropBuilder::new(&dataset, &rankings, &descriptions, &settings).build(
        grouping,
        &mut packer,
        &mut rng,
    )?;
    if !drops.converged {
        warn!("Layout finished with residual overlap");
    }
    Ok(drops)
}

pub fn write_layout<W: Write>(
    drops: &Waterdrops,
    pretty: bool,
    mut writer: W,
) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, drops)?;
    } else {
        serde_json::to_writer(&mut writer, drops)?;
    }
    writeln!(writer)?;
    Ok(())
}

pub fn run_layout(args: &LayoutArgs) -> anyhow::Result<()> {
    let drops = build_layout(args)?;
    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            write_layout(&drops, args.pretty, std::io::BufWriter::new(file))?;
            info!(
                "Wrote {} waterdrops in {} groups to {}",
                drops.nodes.len(),
                drops.groups.len(),
                path.display()
            );
        }
        None => write_layout(&drops, args.pretty, std::io::stdout().lock())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../fixtures")
            .join(name)
    }

    fn args(grouping: &str) -> LayoutArgs {
        LayoutArgs {
            objectives: fixture("objectives_sample.json"),
            descriptions: Some(fixture("descriptions_sample.json")),
            grouping: grouping.to_string(),
            seed: Some(42),
            config: None,
            output: None,
            pretty: false,
        }
    }

    #[test]
    fn test_build_layout() {
        let drops = build_layout(&args("objective")).unwrap();
        assert_eq!(drops.groups.len(), 3);
        assert_eq!(drops.nodes.len(), 12);
    }

    #[test]
    fn test_seeded_output_is_stable() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        write_layout(&build_layout(&args("scenario")).unwrap(), false, &mut first).unwrap();
        write_layout(&build_layout(&args("scenario")).unwrap(), false, &mut second).unwrap();
        assert_eq!(first, second);

        let json: serde_json::Value = serde_json::from_slice(&first).unwrap();
        assert_eq!(json["grouping"], "scenario");
        assert!(json["groups"][0]["displayName"].is_string());
        assert!(json["nodes"][0]["globalX"].is_number());
    }

    #[test]
    fn test_unknown_grouping() {
        assert!(build_layout(&args("reservoir")).is_err());
    }

    #[test]
    fn test_missing_input() {
        let mut args = args("objective");
        args.objectives = fixture("does_not_exist.json");
        assert!(build_layout(&args).is_err());
    }
}

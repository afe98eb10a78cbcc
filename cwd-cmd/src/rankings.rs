//! Rankings report.

use crate::load::{load_dataset, load_settings, parse_grouping};
use cwd_data::{DeliveryDataset, Grouping, RankingIndex};
use cwd_utils::rng::seeded;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct GroupRow<'a> {
    rank: usize,
    group: &'a str,
    mean: f64,
}

#[derive(Debug, Serialize)]
struct MemberRow<'a> {
    group_rank: usize,
    group: &'a str,
    member_rank: usize,
    member: &'a str,
    id: usize,
    mean: f64,
}

/// Write the ranking of `grouping` as CSV, one row per group or, with
/// `members`, one row per member in rank order.
pub fn write_rankings<W: Write>(
    dataset: &DeliveryDataset,
    rankings: &RankingIndex,
    grouping: Grouping,
    members: bool,
    writer: W,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for group in rankings.ordered_groups(grouping) {
        if !members {
            wtr.serialize(GroupRow {
                rank: group.rank,
                group: &group.key,
                mean: group.mean,
            })?;
            continue;
        }
        for (member_rank, &id) in group.members.iter().enumerate() {
            let datum = dataset.datum(id)?;
            wtr.serialize(MemberRow {
                group_rank: group.rank,
                group: &group.key,
                member_rank,
                member: grouping.member_key(datum),
                id,
                mean: rankings.policy().members.pooled_mean(dataset, &[id])?,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn run_rankings<W: Write>(
    objectives: &Path,
    grouping: &str,
    members: bool,
    seed: Option<u64>,
    config: Option<&Path>,
    writer: W,
) -> anyhow::Result<()> {
    let grouping = parse_grouping(grouping)?;
    let settings = load_settings(config)?;
    let mut rng = seeded(seed);
    let dataset = load_dataset(objectives, &settings, &mut rng)?;
    let rankings = RankingIndex::build(&dataset, settings.ranking)?;
    write_rankings(&dataset, &rankings, grouping, members, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn objectives() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../fixtures/objectives_sample.json")
    }

    #[test]
    fn test_group_report() {
        let mut out = Vec::new();
        run_rankings(&objectives(), "objective", false, Some(1), None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "rank,group,mean");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("0,"));
        assert!(lines[3].starts_with("2,"));
    }

    #[test]
    fn test_member_report() {
        let mut out = Vec::new();
        run_rankings(&objectives(), "scenario", true, Some(1), None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        // header plus 4 scenario groups x 3 objectives
        assert_eq!(text.lines().count(), 13);
        assert!(text.starts_with("group_rank,group,member_rank,member,id,mean"));
    }
}

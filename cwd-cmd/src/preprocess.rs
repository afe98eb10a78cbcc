//! CSV export preprocessing command.

use anyhow::Context;
use cwd_data::preprocess::{preprocess_dir, PreprocessOptions};
use log::info;
use std::path::Path;

/// Convert every CSV in `input_dir` and write the objectives JSON to `output`.
pub fn run_preprocess(
    input_dir: &Path,
    output: &Path,
    options: &PreprocessOptions,
) -> anyhow::Result<()> {
    let records = preprocess_dir(input_dir, options)
        .with_context(|| format!("preprocessing {}", input_dir.display()))?;
    let json = serde_json::to_string(&records)?;
    std::fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;
    info!("Wrote {} objectives to {}", records.len(), output.display());
    Ok(())
}

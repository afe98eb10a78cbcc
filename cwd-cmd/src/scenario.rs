//! Scenario code lookups.

use anyhow::Context;
use cwd_scenario::{
    format_code_key, parse_code_key, ScenarioCodec, Setting, SettingIndices, CODE_KEY_PREFIX,
};
use std::io::Write;

/// Accepts either a bare number (`20`) or a key (`expl0020`).
pub fn parse_code(code: &str) -> anyhow::Result<u32> {
    let code = code.trim();
    if code.starts_with(CODE_KEY_PREFIX) {
        Ok(parse_code_key(code)?)
    } else {
        code.parse::<u32>()
            .with_context(|| format!("not a scenario code or key: {code}"))
    }
}

/// Print the key, then one line per setting: name, index, model value, fraction.
pub fn run_decode<W: Write>(code: &str, mut writer: W) -> anyhow::Result<()> {
    let codec = ScenarioCodec::default();
    let code = parse_code(code)?;
    let indices = codec.decode(code)?;
    let fractions = codec.settings_fractions(code)?;

    writeln!(writer, "{}", format_code_key(code))?;
    for (dim, setting) in Setting::ALL.iter().enumerate() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{:.2}",
            setting.full_name(),
            indices[dim],
            setting.value_steps()[indices[dim]],
            fractions[dim]
        )?;
    }
    Ok(())
}

pub fn run_encode<W: Write>(indices: &[usize], mut writer: W) -> anyhow::Result<()> {
    let indices: SettingIndices = indices
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected 5 setting indices, got {}", indices.len()))?;
    let key = ScenarioCodec::default().encode_key(&indices)?;
    writeln!(writer, "{key}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("20").unwrap(), 20);
        assert_eq!(parse_code("expl0020").unwrap(), 20);
        assert!(parse_code("twenty").is_err());
        assert!(parse_code("explXX").is_err());
    }

    #[test]
    fn test_decode_baseline() {
        let mut out = Vec::new();
        run_decode("expl0000", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "expl0000");
        assert_eq!(lines[1], "Demand\t4\t1\t1.00");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_encode() {
        let mut out = Vec::new();
        run_encode(&[4, 0, 1, 0, 0], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "expl0020\n");
        assert!(run_encode(&[4, 0, 1], Vec::new()).is_err());
        assert!(run_encode(&[9, 0, 0, 0, 0], Vec::new()).is_err());
    }

    #[test]
    fn test_out_of_range_code() {
        assert!(run_decode("600", Vec::new()).is_err());
    }
}

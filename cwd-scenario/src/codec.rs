use crate::error::{Result, ScenarioError};
use crate::setting::Setting;

/// Prefix of every canonical scenario key, e.g. `expl0020`.
pub const CODE_KEY_PREFIX: &str = "expl";

/// Code of the all-default baseline scenario.
pub const BASELINE_CODE: u32 = 0;

/// One index per setting, in [`Setting::ALL`] order.
pub type SettingIndices = [usize; 5];

/// Mixed-radix codec between a compact scenario code and its setting indices.
///
/// Demand is the most significant digit and is stored reversed: the encoded
/// digit 0 is baseline demand, while the decoded index 0 is the deepest cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioCodec {
    option_counts: [usize; 5],
    code_count: u32,
}

impl Default for ScenarioCodec {
    fn default() -> Self {
        let option_counts = Setting::ALL.map(|s| s.option_count());
        Self {
            option_counts,
            code_count: option_counts.iter().map(|&c| c as u32).product(),
        }
    }
}

/// Product of the option counts, if it fits a `u32`.
fn count_codes(option_counts: &[usize; 5]) -> Result<u32> {
    option_counts
        .iter()
        .try_fold(1u32, |acc, &count| {
            u32::try_from(count).ok().and_then(|count| acc.checked_mul(count))
        })
        .ok_or(ScenarioError::TooManyCodes(*option_counts))
}

impl ScenarioCodec {
    pub fn new(option_counts: [usize; 5]) -> Result<Self> {
        for (setting, count) in Setting::ALL.iter().zip(option_counts) {
            if count == 0 {
                return Err(ScenarioError::InvalidOptionCount(setting.full_name()));
            }
        }
        let code_count = count_codes(&option_counts)?;
        Ok(Self {
            option_counts,
            code_count,
        })
    }

    pub fn option_counts(&self) -> [usize; 5] {
        self.option_counts
    }

    /// Number of representable codes.
    pub fn code_count(&self) -> u32 {
        self.code_count
    }

    pub fn decode(&self, code: u32) -> Result<SettingIndices> {
        let limit = self.code_count();
        if code >= limit {
            return Err(ScenarioError::InvalidScenarioCode { code, limit });
        }

        let mut rest = code as usize;
        let mut indices = [0usize; 5];
        // least significant digit first
        for dim in (0..5).rev() {
            let count = self.option_counts[dim];
            indices[dim] = rest % count;
            rest /= count;
        }
        indices[0] = self.option_counts[0] - 1 - indices[0];

        Ok(indices)
    }

    pub fn encode(&self, indices: &SettingIndices) -> Result<u32> {
        for (dim, setting) in Setting::ALL.iter().enumerate() {
            let count = self.option_counts[dim];
            if indices[dim] >= count {
                return Err(ScenarioError::InvalidSettingIndex {
                    setting: setting.full_name(),
                    index: indices[dim],
                    count,
                });
            }
        }

        let mut digits = *indices;
        digits[0] = self.option_counts[0] - 1 - digits[0];

        let code = digits
            .iter()
            .zip(self.option_counts)
            .fold(0usize, |acc, (digit, count)| acc * count + digit);

        u32::try_from(code).map_err(|_| ScenarioError::TooManyCodes(self.option_counts))
    }

    /// Each decoded index `v` mapped to `(v + 1) / option_count`, so every
    /// setting lands in `(0, 1]`.
    pub fn settings_fractions(&self, code: u32) -> Result<[f64; 5]> {
        let indices = self.decode(code)?;
        let mut fractions = [0.0; 5];
        for dim in 0..5 {
            fractions[dim] = (indices[dim] + 1) as f64 / self.option_counts[dim] as f64;
        }
        Ok(fractions)
    }

    pub fn decode_key(&self, key: &str) -> Result<SettingIndices> {
        self.decode(parse_code_key(key)?)
    }

    pub fn encode_key(&self, indices: &SettingIndices) -> Result<String> {
        self.encode(indices).map(format_code_key)
    }
}

/// Canonical scenario key for a code: the prefix plus the code zero-padded to 4 digits.
pub fn format_code_key(code: u32) -> String {
    format!("{}{:04}", CODE_KEY_PREFIX, code)
}

/// Inverse of [`format_code_key`].
pub fn parse_code_key(key: &str) -> Result<u32> {
    let digits = key
        .strip_prefix(CODE_KEY_PREFIX)
        .ok_or_else(|| ScenarioError::InvalidCodeKey(key.to_string()))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScenarioError::InvalidCodeKey(key.to_string()));
    }
    digits
        .parse::<u32>()
        .map_err(|_| ScenarioError::InvalidCodeKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_twenty() {
        let codec = ScenarioCodec::new([5, 3, 2, 4, 5]).unwrap();
        assert_eq!(codec.decode(20).unwrap(), [4, 0, 1, 0, 0]);
        assert_eq!(codec.encode(&[4, 0, 1, 0, 0]).unwrap(), 20);
    }

    #[test]
    fn test_baseline_is_highest_demand_index() {
        let codec = ScenarioCodec::default();
        assert_eq!(codec.decode(BASELINE_CODE).unwrap(), [4, 0, 0, 0, 0]);
    }

    #[test]
    fn test_every_code_round_trips() {
        let codec = ScenarioCodec::default();
        assert_eq!(codec.code_count(), 600);
        for code in 0..codec.code_count() {
            let indices = codec.decode(code).unwrap();
            assert_eq!(codec.encode(&indices).unwrap(), code);
        }
    }

    #[test]
    fn test_every_index_vector_round_trips() {
        let codec = ScenarioCodec::default();
        let [d, c, p, r, m] = codec.option_counts();
        for a in 0..d {
            for b in 0..c {
                for e in 0..p {
                    for f in 0..r {
                        for g in 0..m {
                            let v = [a, b, e, f, g];
                            assert_eq!(codec.decode(codec.encode(&v).unwrap()).unwrap(), v);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_code_fails() {
        let codec = ScenarioCodec::default();
        assert_eq!(
            codec.decode(600),
            Err(ScenarioError::InvalidScenarioCode {
                code: 600,
                limit: 600
            })
        );
    }

    #[test]
    fn test_out_of_range_index_fails() {
        let codec = ScenarioCodec::default();
        assert!(matches!(
            codec.encode(&[0, 3, 0, 0, 0]),
            Err(ScenarioError::InvalidSettingIndex { index: 3, .. })
        ));
    }

    #[test]
    fn test_zero_option_count_rejected() {
        assert!(ScenarioCodec::new([5, 0, 2, 4, 5]).is_err());
    }

    #[test]
    fn test_oversized_code_space_rejected() {
        assert_eq!(
            ScenarioCodec::new([70_000, 70_000, 1, 1, 1]),
            Err(ScenarioError::TooManyCodes([70_000, 70_000, 1, 1, 1]))
        );
        assert!(ScenarioCodec::new([usize::MAX, 2, 1, 1, 1]).is_err());
    }

    #[test]
    fn test_largest_code_space_round_trips() {
        // 65536 * 65535 is just below u32::MAX
        let codec = ScenarioCodec::new([65_536, 65_535, 1, 1, 1]).unwrap();
        assert_eq!(codec.code_count(), 4_294_901_760);
        let last = codec.code_count() - 1;
        let indices = codec.decode(last).unwrap();
        assert_eq!(indices, [0, 65_534, 0, 0, 0]);
        assert_eq!(codec.encode(&indices).unwrap(), last);
    }

    #[test]
    fn test_format_and_parse_key() {
        assert_eq!(format_code_key(0), "expl0000");
        assert_eq!(format_code_key(20), "expl0020");
        assert_eq!(format_code_key(12345), "expl12345");
        assert_eq!(parse_code_key("expl0020").unwrap(), 20);
        assert!(parse_code_key("scen0020").is_err());
        assert!(parse_code_key("expl").is_err());
        assert!(parse_code_key("expl-1").is_err());
    }

    #[test]
    fn test_key_helpers() {
        let codec = ScenarioCodec::default();
        assert_eq!(codec.decode_key("expl0020").unwrap(), [4, 0, 1, 0, 0]);
        assert_eq!(codec.encode_key(&[4, 0, 1, 0, 0]).unwrap(), "expl0020");
    }

    #[test]
    fn test_settings_fractions() {
        let codec = ScenarioCodec::default();
        let fractions = codec.settings_fractions(20).unwrap();
        let expected = [1.0, 1.0 / 3.0, 1.0, 0.25, 0.2];
        for (actual, expected) in fractions.iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-12);
        }
    }
}

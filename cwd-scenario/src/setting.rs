use serde::{Deserialize, Serialize};

/// One of the five policy dimensions a scenario is composed of.
///
/// Declaration order is the encoding order, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Setting {
    /// Total agricultural demand. Decoded indices run from the deepest cut
    /// (0) up to baseline; the encoded digit is the complement.
    Demand,
    /// Balance of reservoir storage against delivery
    Carryover,
    /// How CVP cuts are distributed during shortage
    Priority,
    /// Selective removal of D1641 regulations
    Regulations,
    /// Minimum flow on Central Valley tributaries
    MinFlow,
}

impl Setting {
    pub const ALL: [Setting; 5] = [
        Setting::Demand,
        Setting::Carryover,
        Setting::Priority,
        Setting::Regulations,
        Setting::MinFlow,
    ];

    pub fn short_name(&self) -> &'static str {
        match self {
            Setting::Demand => "D",
            Setting::Carryover => "C",
            Setting::Priority => "P",
            Setting::Regulations => "R",
            Setting::MinFlow => "M",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Setting::Demand => "Demand",
            Setting::Carryover => "Carryover",
            Setting::Priority => "Priority",
            Setting::Regulations => "Regs.",
            Setting::MinFlow => "Min. Flow",
        }
    }

    /// Model input value for each option, ordered by setting index.
    pub fn value_steps(&self) -> &'static [f64] {
        match self {
            Setting::Demand => &[0.6, 0.7, 0.8, 0.9, 1.0],
            Setting::Carryover => &[1.0, 1.2, 1.3],
            Setting::Priority => &[0.0, 1.0],
            Setting::Regulations => &[1.0, 2.0, 3.0, 4.0],
            Setting::MinFlow => &[0.0, 0.4, 0.6, 0.7, 0.8],
        }
    }

    pub fn option_count(&self) -> usize {
        self.value_steps().len()
    }
}

impl std::fmt::Display for Setting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.full_name())
    }
}

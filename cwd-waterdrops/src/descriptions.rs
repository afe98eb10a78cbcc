use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of the descriptions export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
}

/// Group labels keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Descriptions {
    entries: HashMap<String, Description>,
}

impl Descriptions {
    /// Parse `[{id, display_name?, desc?}]`. Later duplicates win.
    pub fn from_json(json: &str) -> Result<Self> {
        let list: Vec<Description> = serde_json::from_str(json)?;
        Ok(list.into_iter().collect())
    }

    pub fn get(&self, id: &str) -> Option<&Description> {
        self.entries.get(id)
    }

    /// The display name for `id`, or `id` itself when none is given.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.entries
            .get(id)
            .and_then(|d| d.display_name.as_deref())
            .unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Description> for Descriptions {
    fn from_iter<I: IntoIterator<Item = Description>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|d| (d.id.clone(), d)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DESCRIPTIONS: &str = include_str!("../../fixtures/descriptions_sample.json");

    #[test]
    fn test_display_name_fallback() {
        let descriptions = Descriptions::from_json(SAMPLE_DESCRIPTIONS).unwrap();
        assert_eq!(descriptions.len(), 3);
        assert_ne!(descriptions.display_name("DEL_CVP_PAG_N"), "DEL_CVP_PAG_N");
        assert_eq!(descriptions.display_name("DEL_SWP_PMI"), "DEL_SWP_PMI");
        assert_eq!(descriptions.display_name("unknown"), "unknown");
    }

    #[test]
    fn test_minimal_entry() {
        let descriptions = Descriptions::from_json(r#"[{"id": "a"}]"#).unwrap();
        let entry = descriptions.get("a").unwrap();
        assert!(entry.display_name.is_none() && entry.desc.is_none());
    }
}

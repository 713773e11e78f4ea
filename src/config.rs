use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FieldMap – which source column feeds each logical role
// ---------------------------------------------------------------------------

/// Column bindings for the normalizer.
///
/// Omitted keys in a JSON override keep their defaults; a key set to `null`
/// unbinds the role:
///
/// ```json
/// { "identifier": "Item", "location": "Site", "planner": null }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    pub identifier: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub planner: Option<String>,
    pub start_count: Option<String>,
    pub end_count: Option<String>,
    pub difference: Option<String>,
    pub percent_change: Option<String>,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            identifier: "Part".into(),
            location: Some("Branch".into()),
            description: Some("Description".into()),
            planner: Some("Planner".into()),
            start_count: Some("StartCount".into()),
            end_count: Some("EndCount".into()),
            difference: Some("Difference".into()),
            // The source datasets name their percent-change column "Variance".
            percent_change: Some("Variance".into()),
        }
    }
}

impl FieldMap {
    /// Bind only the identifier column; every other column stays a plain
    /// metric column.
    pub fn identifier_only(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            location: None,
            description: None,
            planner: None,
            start_count: None,
            end_count: None,
            difference: None,
            percent_change: None,
        }
    }

    /// Read overrides from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading field map {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing field map {}", path.display()))
    }

    /// Columns that carry a descriptive role rather than a metric.
    pub fn descriptive_columns(&self) -> Vec<&str> {
        let mut cols = vec![self.identifier.as_str()];
        cols.extend(
            [&self.location, &self.description, &self.planner]
                .into_iter()
                .flatten()
                .map(String::as_str),
        );
        cols
    }
}

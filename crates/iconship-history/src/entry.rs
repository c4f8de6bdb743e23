use chrono::{DateTime, Utc};
use iconship_core::{ChangeCounts, UNRELEASED_SUFFIX};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One icon touched by an upstream sync.
///
/// Older ledgers store bare names; newer ones store objects carrying at least
/// a `name` and usually a `category`. Both shapes are preserved on rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconChange {
    Name(String),
    Detailed {
        name: String,
        #[serde(flatten)]
        details: Map<String, Value>,
    },
}

impl IconChange {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Detailed { name, .. } => name,
        }
    }
}

impl From<&str> for IconChange {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// A single upstream sync recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_package_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_version_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_version_to: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub added: Vec<IconChange>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub updated: Vec<IconChange>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub removed: Vec<IconChange>,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            package_version: None,
            upstream_package_name: None,
            upstream_version_from: None,
            upstream_version_to: None,
            added: Vec::new(),
            updated: Vec::new(),
            removed: Vec::new(),
        }
    }

    #[must_use]
    pub fn change_counts(&self) -> ChangeCounts {
        ChangeCounts::new(self.added.len(), self.updated.len(), self.removed.len())
    }

    /// True when the entry was recorded against a version carrying the
    /// unreleased marker.
    #[must_use]
    pub fn is_unreleased(&self) -> bool {
        self.package_version
            .as_deref()
            .is_some_and(|v| !v.is_empty() && v.ends_with(UNRELEASED_SUFFIX))
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.change_counts().is_empty()
    }
}

#[must_use]
pub fn compute_change_counts(entry: &HistoryEntry) -> ChangeCounts {
    entry.change_counts()
}

#[must_use]
pub fn is_unreleased(entry: &HistoryEntry) -> bool {
    entry.is_unreleased()
}

// Missing, null or non-array values read as empty; unrecognised items are skipped.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<IconChange>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<IconChange>(item).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> HistoryEntry {
        serde_json::from_str(json).expect("valid entry")
    }

    #[test]
    fn counts_each_list() {
        let entry = parse(
            r#"{"timestamp":"2024-03-01T10:00:00.000Z","added":["a","b"],"updated":[],"removed":["c"]}"#,
        );

        let counts = compute_change_counts(&entry);

        assert_eq!(counts, ChangeCounts::new(2, 0, 1));
        assert_eq!(counts.total, 3);
    }

    #[test]
    fn non_array_fields_count_as_empty() {
        let entry = parse(
            r#"{"timestamp":"2024-03-01T10:00:00Z","added":"oops","updated":null}"#,
        );

        assert_eq!(entry.change_counts(), ChangeCounts::default());
        assert!(!entry.has_changes());
    }

    #[test]
    fn accepts_object_items() {
        let entry = parse(
            r#"{"timestamp":"2024-03-01T10:00:00Z","added":[{"name":"home","category":"action"},"star"]}"#,
        );

        assert_eq!(entry.added.len(), 2);
        assert_eq!(entry.added[0].name(), "home");
        assert!(matches!(
            &entry.added[0],
            IconChange::Detailed { details, .. } if details["category"] == "action"
        ));
        assert_eq!(entry.added[1], IconChange::from("star"));
    }

    #[test]
    fn object_items_keep_their_fields_on_rewrite() {
        let entry = parse(
            r#"{"timestamp":"2024-03-01T10:00:00Z","added":[{"name":"home","category":"action"}]}"#,
        );

        let json = serde_json::to_value(&entry).expect("serialize");

        assert_eq!(json["added"][0]["name"], "home");
        assert_eq!(json["added"][0]["category"], "action");
    }

    #[test]
    fn unreleased_requires_marker_suffix() {
        let mut entry = HistoryEntry::new(Utc::now());
        assert!(!entry.is_unreleased());

        entry.package_version = Some(String::new());
        assert!(!is_unreleased(&entry));

        entry.package_version = Some("0.4.0".to_string());
        assert!(!entry.is_unreleased());

        entry.package_version = Some("0.4.0-unreleased".to_string());
        assert!(entry.is_unreleased());
    }
}

//! The persisted record of one installed feature.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State written after an install attempt completes.
///
/// Records are created or replaced wholesale, never partially updated: the
/// installer builds the full record after every stage has been attempted and
/// persists it in one call. `files` holds project-relative paths of the
/// artifacts the install produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledRecord {
    pub version: String,
    pub installed_at: DateTime<Utc>,
    pub files: Vec<String>,
}

impl InstalledRecord {
    /// Build a record stamped with the current time.
    pub fn new(version: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            version: version.into(),
            installed_at: Utc::now(),
            files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let record = InstalledRecord::new("1.0.0", vec!["schemas/users.sql".to_string()]);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("installedAt").is_some());
        assert!(json.get("installed_at").is_none());
        assert_eq!(json["version"], "1.0.0");
    }

    #[test]
    fn round_trips() {
        let record = InstalledRecord::new("2.1.0", vec!["seed.sql".to_string()]);
        let json = serde_json::to_string(&record).unwrap();
        let back: InstalledRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}

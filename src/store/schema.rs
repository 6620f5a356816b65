use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;

const SCHEMA_VERSION: u32 = 1;

/// Persisted per-template averages, keyed `"<title>.avg_time"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimingData {
    pub schema_version: u32,
    #[serde(default)]
    pub averages: BTreeMap<String, f64>,
}

impl Default for TimingData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            averages: BTreeMap::new(),
        }
    }
}

impl TimingData {
    pub fn new(averages: BTreeMap<String, f64>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            averages,
        }
    }

    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

pub const EXPORT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub quicklearn_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub config: Config,
    pub timings: TimingData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_schema_needs_reset() {
        let data: TimingData =
            serde_json::from_str(r#"{"schema_version": 0, "averages": {}}"#).unwrap();
        assert!(data.needs_reset());
        assert!(!TimingData::default().needs_reset());
    }

    #[test]
    fn test_missing_averages_defaults_empty() {
        let data: TimingData = serde_json::from_str(r#"{"schema_version": 1}"#).unwrap();
        assert!(data.averages.is_empty());
    }
}

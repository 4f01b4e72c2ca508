//! Conversion manifest: per-list outcomes and combined-output metadata,
//! written alongside the generated rule files.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Outcome for a single source list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResult {
    pub name: String,
    #[serde(rename = "source_url")]
    pub url: String,
    pub rules_count: usize,
    pub skipped_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedInfo {
    pub total_rules: usize,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Date-stamped version, `YYYY.MM.DD`.
    pub version: String,
    /// RFC 3339 generation time, UTC.
    pub generated_at: String,
    pub lists: BTreeMap<String, ListResult>,
    pub combined: CombinedInfo,
}

impl Manifest {
    pub fn new(lists: BTreeMap<String, ListResult>, combined: CombinedInfo) -> Manifest {
        let now = Utc::now();
        Manifest {
            version: now.format("%Y.%m.%d").to_string(),
            generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            lists,
            combined,
        }
    }
}

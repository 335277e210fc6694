//! Commit Object - immutable snapshot of a staged graph

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::graph::raw_title;

/// Author recorded when nobody is logged in
pub const DEFAULT_AUTHOR: &str = "user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub message: String,
    /// RFC3339
    pub timestamp: String,
    pub author: String,
    /// The staged document exactly as it was parsed
    pub graph: Value,
}

impl Commit {
    pub fn new(id: String, message: impl Into<String>, author: impl Into<String>, graph: Value) -> Self {
        Self {
            id,
            message: message.into(),
            timestamp: Utc::now().to_rfc3339(),
            author: author.into(),
            graph,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.id)
    }

    pub fn graph_title(&self) -> &str {
        raw_title(&self.graph)
    }
}

/// `commit_<unix-seconds>`, suffixed with `_<n>` when a commit with that id
/// already exists in `commits_dir`.
pub fn generate_commit_id(now: DateTime<Utc>, commits_dir: &Path) -> String {
    let base = format!("commit_{}", now.timestamp());
    if !commits_dir.join(format!("{}.json", base)).exists() {
        return base;
    }

    let mut n = 1u32;
    loop {
        let candidate = format!("{}_{}", base, n);
        if !commits_dir.join(format!("{}.json", candidate)).exists() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_commit_id_uses_unix_seconds() {
        let dir = tempdir().unwrap();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        assert_eq!(generate_commit_id(now, dir.path()), "commit_1700000000");
    }

    #[test]
    fn test_commit_id_avoids_existing_files() {
        let dir = tempdir().unwrap();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        std::fs::write(dir.path().join("commit_1700000000.json"), "{}").unwrap();
        assert_eq!(generate_commit_id(now, dir.path()), "commit_1700000000_1");

        std::fs::write(dir.path().join("commit_1700000000_1.json"), "{}").unwrap();
        assert_eq!(generate_commit_id(now, dir.path()), "commit_1700000000_2");
    }

    #[test]
    fn test_commit_timestamp_is_rfc3339() {
        let commit = Commit::new(
            "commit_1".to_string(),
            "first",
            DEFAULT_AUTHOR,
            serde_json::json!({"title": "T"}),
        );

        assert!(DateTime::parse_from_rfc3339(&commit.timestamp).is_ok());
        assert_eq!(commit.file_name(), "commit_1.json");
        assert_eq!(commit.graph_title(), "T");
    }
}

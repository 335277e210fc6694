//! Repository configuration (`.tribal/config.json`)
//!
//! The whole document is loaded at the start of a command and rewritten in
//! full at the end. Writes go through a temp file + rename, and state
//! transitions hold [`ConfigLock`] so two invocations cannot interleave.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{Result, TribalError};

pub const CONFIG_DIR: &str = ".tribal";
pub const CONFIG_FILE: &str = "config.json";
pub const LOCK_FILE: &str = "config.lock";
pub const CONFIG_VERSION: &str = "1.0.0";
pub const DEFAULT_REGISTRY_URL: &str = "http://localhost:8080";

/// Environment override for the registry URL
pub const REGISTRY_URL_ENV: &str = "TRIBAL_REGISTRY_URL";

/// Entry in the `graphs` map, keyed by graph title
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphEntry {
    #[serde(default)]
    pub file: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_out_at: Option<String>,
}

/// Repository state persisted between commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub remote: String,

    #[serde(default)]
    pub graphs: BTreeMap<String, GraphEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_graph: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_graph_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staged_graph: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staged_graph_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_commit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_commit_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_pushed_commit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_pushed_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            remote: String::new(),
            graphs: BTreeMap::new(),
            current_graph: None,
            current_graph_file: None,
            staged_graph: None,
            staged_graph_file: None,
            latest_commit: None,
            latest_commit_file: None,
            last_pushed_commit: None,
            last_pushed_file: None,
            registry_url: None,
            token: None,
            username: None,
            user_id: None,
        }
    }
}

impl RepoConfig {
    /// Default config, optionally pinned to a registry
    pub fn with_registry(registry_url: Option<String>) -> Self {
        Self {
            registry_url,
            ..Default::default()
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| TribalError::io("read", path, e))?;
        serde_json::from_str(&content).map_err(|e| TribalError::parse("config", e))
    }

    /// Atomically replace the config file with this document
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| TribalError::parse("config", e))?;
        replace_file(path, content.as_bytes(), None)
    }

    /// Registry URL in effect (stored value or the built-in default)
    pub fn registry_url(&self) -> &str {
        self.registry_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_REGISTRY_URL)
    }

    pub fn set_registry_url(&mut self, url: impl Into<String>) {
        self.registry_url = Some(url.into());
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(&self.token, Some(t) if !t.is_empty())
            && matches!(&self.username, Some(u) if !u.is_empty())
    }

    pub fn set_auth(&mut self, token: String, username: String, user_id: String) {
        self.token = Some(token);
        self.username = Some(username);
        self.user_id = Some(user_id);
    }

    pub fn clear_auth(&mut self) {
        self.token = None;
        self.username = None;
        self.user_id = None;
    }
}

/// Mode of graph, staging, commit and pushed files on unix. `config.json`
/// keeps the temp file's owner-only mode since it holds the registry token.
pub const SHARED_FILE_MODE: u32 = 0o644;

/// Write `bytes` to `path` via a sibling temp file and rename
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    replace_file(path, bytes, Some(SHARED_FILE_MODE))
}

fn replace_file(path: &Path, bytes: &[u8], mode: Option<u32>) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| TribalError::io("create directory", dir, e))?;

    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| TribalError::io("create temp file in", dir, e))?;
    if let Err(e) = tmp.write_all(bytes).and_then(|_| tmp.as_file_mut().sync_all()) {
        return Err(TribalError::io("write", tmp.path().to_path_buf(), e));
    }

    #[cfg(unix)]
    if let Some(mode) = mode {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(mode))
            .map_err(|e| TribalError::io("set permissions on", tmp.path().to_path_buf(), e))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    tmp.persist(path)
        .map_err(|e| TribalError::io("replace", path, e.error))?;
    Ok(())
}

/// Exclusive lock over `.tribal/config.json`, released on drop
#[derive(Debug)]
pub struct ConfigLock {
    path: PathBuf,
}

impl ConfigLock {
    pub fn acquire(tribal_dir: &Path) -> Result<Self> {
        let path = tribal_dir.join(LOCK_FILE);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                // Best effort: the pid only helps a human clean up a stale lock.
                let _ = writeln!(file, "{}", std::process::id());
                tracing::debug!(lock = %path.display(), "acquired config lock");
                Ok(Self { path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(TribalError::Locked(path))
            }
            Err(e) => Err(TribalError::io("create", path, e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ConfigLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(lock = %self.path.display(), error = %e, "failed to release config lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fresh_config_omits_unset_fields() {
        let config = RepoConfig::default();
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["version"], "1.0.0");
        assert_eq!(obj["remote"], "");
        assert!(obj["graphs"].as_object().unwrap().is_empty());
        assert!(!obj.contains_key("registry_url"));
        assert!(!obj.contains_key("token"));
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = RepoConfig::with_registry(Some("https://registry.example".to_string()));
        config.current_graph = Some("Auth Flow".to_string());
        config.current_graph_file = Some(".tribal/graphs/auth_flow.json".to_string());
        config.latest_commit = Some("commit_1".to_string());
        config.latest_commit_file = Some(".tribal/commits/commit_1.json".to_string());
        config.graphs.insert(
            "Auth Flow".to_string(),
            GraphEntry {
                file: ".tribal/graphs/auth_flow.json".to_string(),
                checked_out_at: Some("2024-01-01T00:00:00+00:00".to_string()),
            },
        );
        config.set_auth("tok".to_string(), "alice".to_string(), "u-1".to_string());

        config.save_to(&path).unwrap();
        let loaded = RepoConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_reads_legacy_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{"version": "1.0.0", "remote": "", "graphs": {}, "current_graph": "X", "unknown": 1}"#,
        )
        .unwrap();

        let config = RepoConfig::load_from(&path).unwrap();
        assert_eq!(config.current_graph.as_deref(), Some("X"));
        assert_eq!(config.registry_url(), DEFAULT_REGISTRY_URL);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();

        let err = RepoConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, TribalError::Parse { .. }));
    }

    #[test]
    fn test_authentication_requires_token_and_username() {
        let mut config = RepoConfig::default();
        assert!(!config.is_authenticated());

        config.token = Some("tok".to_string());
        assert!(!config.is_authenticated());

        config.username = Some("alice".to_string());
        assert!(config.is_authenticated());

        config.clear_auth();
        assert!(!config.is_authenticated());
        assert!(config.user_id.is_none());
    }

    #[test]
    fn test_lock_is_exclusive_and_released_on_drop() {
        let dir = tempdir().unwrap();

        let lock = ConfigLock::acquire(dir.path()).unwrap();
        assert!(lock.path().exists());

        let err = ConfigLock::acquire(dir.path()).unwrap_err();
        assert!(matches!(err, TribalError::Locked(_)));

        drop(lock);
        assert!(!dir.path().join(LOCK_FILE).exists());
        assert!(ConfigLock::acquire(dir.path()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_graph_files_are_world_readable_config_is_not() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let graph = dir.path().join("graphs").join("auth_flow.json");
        write_atomic(&graph, b"{}").unwrap();
        let mode = fs::metadata(&graph).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, SHARED_FILE_MODE);

        let config = dir.path().join(CONFIG_FILE);
        RepoConfig::default().save_to(&config).unwrap();
        let mode = fs::metadata(&config).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}

//! Repository - the local checkout → add → commit → push workflow
//!
//! Every transition follows the same shape: take the config lock, load
//! `.tribal/config.json`, copy or write graph/commit files, save the config.
//!
//! ```text
//! Initialized ──checkout──▶ GraphCheckedOut ──add -A──▶ Staged
//!                                 ▲                       │
//!                                 │                    commit
//!                                 │                       ▼
//!                                 └──────── Pushed ◀──push── Committed
//! ```
//!
//! Paths stored in the config are relative to the repository root
//! (`.tribal/graphs/auth_flow.json`). Nothing is ever deleted.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;

use super::commit::{generate_commit_id, Commit, DEFAULT_AUTHOR};
use super::graph::{graph_file_name, parse_raw, raw_len, raw_title, GraphDocument};
use super::templates;
use crate::config::{write_atomic, ConfigLock, GraphEntry, RepoConfig, CONFIG_DIR, CONFIG_FILE};
use crate::error::{Result, StateError, TribalError};

pub const GRAPHS_DIR: &str = "graphs";
pub const STAGING_DIR: &str = "staging";
pub const COMMITS_DIR: &str = "commits";
pub const PUSHED_DIR: &str = "pushed";

/// Position in the workflow, derived from which config fields are set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoState {
    Initialized,
    GraphCheckedOut,
    Staged,
    Committed,
    Pushed,
}

impl std::fmt::Display for RepoState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoState::Initialized => write!(f, "initialized"),
            RepoState::GraphCheckedOut => write!(f, "graph checked out"),
            RepoState::Staged => write!(f, "staged"),
            RepoState::Committed => write!(f, "committed"),
            RepoState::Pushed => write!(f, "pushed"),
        }
    }
}

impl RepoState {
    pub fn of(config: &RepoConfig) -> Self {
        if config.staged_graph.is_some() {
            RepoState::Staged
        } else if let Some(latest) = &config.latest_commit {
            if config.last_pushed_commit.as_ref() == Some(latest) {
                RepoState::Pushed
            } else {
                RepoState::Committed
            }
        } else if config.current_graph.is_some() {
            RepoState::GraphCheckedOut
        } else {
            RepoState::Initialized
        }
    }
}

#[derive(Debug, Clone)]
pub struct InitOutcome {
    pub config_path: PathBuf,
    pub reinitialized: bool,
}

#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub title: String,
    pub file: String,
    pub created: bool,
}

#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub graph: String,
    pub staged_file: String,
}

/// Node/edge counts of a graph snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphCounts {
    pub nodes: usize,
    pub edges: usize,
}

impl GraphCounts {
    pub fn of(graph: &Value) -> Self {
        Self {
            nodes: raw_len(graph, "nodes"),
            edges: raw_len(graph, "edges"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub commit: Commit,
    pub file: String,
    pub counts: GraphCounts,
    /// Counts from the previous commit of the same graph, if there is one
    pub previous: Option<GraphCounts>,
}

#[derive(Debug, Clone)]
pub struct PushOutcome {
    pub commit: Commit,
    pub pushed_file: String,
}

#[derive(Debug, Clone)]
pub struct RepoStatus {
    pub state: RepoState,
    pub config: RepoConfig,
    pub unpushed: bool,
}

/// Handle on a `.tribal/` directory under `root`
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
}

impl Repository {
    /// Open the repository in the current working directory
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| TribalError::io("read", "current directory", e))?;
        Self::open(cwd)
    }

    /// Open an existing repository rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let repo = Self { root: root.into() };
        if !repo.tribal_dir().is_dir() || !repo.config_path().is_file() {
            return Err(TribalError::NotARepository);
        }
        Ok(repo)
    }

    /// Write the template docs and a default config under `root`.
    ///
    /// Re-running overwrites the config with defaults.
    pub fn init(root: impl Into<PathBuf>, registry_url: Option<String>) -> Result<(Self, InitOutcome)> {
        let repo = Self { root: root.into() };
        let reinitialized = repo.config_path().exists();

        let tribal_md = repo.root.join(templates::TRIBAL_MD_FILE);
        fs::write(&tribal_md, templates::TRIBAL_MD)
            .map_err(|e| TribalError::io("write", &tribal_md, e))?;

        let claude_md = repo.root.join(templates::CLAUDE_MD_FILE);
        let existing = if claude_md.exists() {
            Some(fs::read_to_string(&claude_md).map_err(|e| TribalError::io("read", &claude_md, e))?)
        } else {
            None
        };
        fs::write(&claude_md, templates::claude_md_with_notice(existing.as_deref()))
            .map_err(|e| TribalError::io("write", &claude_md, e))?;

        let tribal_dir = repo.tribal_dir();
        fs::create_dir_all(&tribal_dir)
            .map_err(|e| TribalError::io("create directory", &tribal_dir, e))?;

        {
            let _lock = repo.lock()?;
            RepoConfig::with_registry(registry_url).save_to(&repo.config_path())?;
        }

        tracing::info!(root = %repo.root.display(), reinitialized, "initialized repository");

        let outcome = InitOutcome {
            config_path: repo.config_path(),
            reinitialized,
        };
        Ok((repo, outcome))
    }

    /// Open the repository at `root`, creating a bare `.tribal/config.json`
    /// (no template docs) when there is none
    pub fn open_or_create(root: impl Into<PathBuf>) -> Result<Self> {
        let repo = Self { root: root.into() };
        if !repo.config_path().is_file() {
            let tribal_dir = repo.tribal_dir();
            fs::create_dir_all(&tribal_dir)
                .map_err(|e| TribalError::io("create directory", &tribal_dir, e))?;
            let _lock = repo.lock()?;
            RepoConfig::default().save_to(&repo.config_path())?;
            tracing::debug!(root = %repo.root.display(), "created bare config");
        }
        Ok(repo)
    }

    pub fn tribal_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.tribal_dir().join(CONFIG_FILE)
    }

    pub fn graphs_dir(&self) -> PathBuf {
        self.tribal_dir().join(GRAPHS_DIR)
    }

    pub fn commits_dir(&self) -> PathBuf {
        self.tribal_dir().join(COMMITS_DIR)
    }

    /// Absolute location of a path stored in the config
    pub fn resolve(&self, stored: &str) -> PathBuf {
        let path = Path::new(stored);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn load_config(&self) -> Result<RepoConfig> {
        RepoConfig::load_from(&self.config_path())
    }

    pub fn save_config(&self, config: &RepoConfig) -> Result<()> {
        config.save_to(&self.config_path())
    }

    pub fn lock(&self) -> Result<ConfigLock> {
        ConfigLock::acquire(&self.tribal_dir())
    }

    /// Load, mutate and save the config while holding the lock
    pub fn update_config<T>(&self, f: impl FnOnce(&mut RepoConfig) -> Result<T>) -> Result<T> {
        let _lock = self.lock()?;
        let mut config = self.load_config()?;
        let value = f(&mut config)?;
        self.save_config(&config)?;
        Ok(value)
    }

    /// Create the graph file for `title` if needed and make it current
    pub fn checkout(&self, title: &str) -> Result<CheckoutOutcome> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TribalError::usage(
                "graph title is required. Use -g flag to specify graph title.",
            ));
        }

        let file_name = graph_file_name(title);
        if file_name.contains('/') || file_name.contains('\\') {
            return Err(TribalError::usage(format!(
                "graph title must not contain path separators: {}",
                title
            )));
        }

        self.update_config(|config| {
            let graphs_dir = self.graphs_dir();
            fs::create_dir_all(&graphs_dir)
                .map_err(|e| TribalError::io("create directory", &graphs_dir, e))?;

            let stored = stored_path(GRAPHS_DIR, &file_name);
            let graph_path = self.resolve(&stored);

            let created = !graph_path.exists();
            if created {
                let author = config.username.as_deref().unwrap_or(DEFAULT_AUTHOR);
                let graph = GraphDocument::new(title, author);
                let data = graph
                    .to_json_pretty()
                    .map_err(|e| TribalError::parse("graph", e))?;
                write_atomic(&graph_path, data.as_bytes())?;
                tracing::debug!(file = %stored, "created graph");
            }

            config.current_graph = Some(title.to_string());
            config.current_graph_file = Some(stored.clone());
            config.graphs.insert(
                title.to_string(),
                GraphEntry {
                    file: stored.clone(),
                    checked_out_at: Some(Utc::now().to_rfc3339()),
                },
            );

            Ok(CheckoutOutcome {
                title: title.to_string(),
                file: stored,
                created,
            })
        })
    }

    /// Copy the current graph file into `staging/`. Only `all = true` is supported.
    pub fn add(&self, all: bool) -> Result<AddOutcome> {
        if !all {
            return Err(TribalError::usage(
                "currently only supports -A flag to stage all changes",
            ));
        }

        self.update_config(|config| {
            let (graph, file) = match (&config.current_graph, &config.current_graph_file) {
                (Some(graph), Some(file)) => (graph.clone(), file.clone()),
                _ => return Err(StateError::NoCurrentGraph.into()),
            };

            let source = self.resolve(&file);
            if !source.is_file() {
                return Err(StateError::MissingGraphFile(file).into());
            }

            let data = fs::read(&source).map_err(|e| TribalError::io("read", &source, e))?;
            let staged = stored_path(STAGING_DIR, &base_name(&file)?);
            write_atomic(&self.resolve(&staged), &data)?;

            config.staged_graph = Some(graph.clone());
            config.staged_graph_file = Some(staged.clone());

            tracing::debug!(graph = %graph, file = %staged, "staged graph");
            Ok(AddOutcome {
                graph,
                staged_file: staged,
            })
        })
    }

    /// Snapshot the staged graph into a new commit and clear staging
    pub fn commit(&self, message: &str) -> Result<CommitOutcome> {
        if message.trim().is_empty() {
            return Err(TribalError::usage(
                "commit message is required. Use -m flag.",
            ));
        }

        self.update_config(|config| {
            let (graph_title, staged) = match (&config.staged_graph, &config.staged_graph_file) {
                (Some(title), Some(file)) => (title.clone(), file.clone()),
                _ => return Err(StateError::NoStagedChanges.into()),
            };

            let staged_path = self.resolve(&staged);
            if !staged_path.is_file() {
                return Err(StateError::MissingStagedFile(staged).into());
            }
            let data = fs::read_to_string(&staged_path)
                .map_err(|e| TribalError::io("read", &staged_path, e))?;
            let graph = parse_raw(&data)
                .map_err(|e| TribalError::parse(format!("staged graph {}", staged), e))?;

            let previous = config
                .latest_commit_file
                .as_deref()
                .and_then(|file| self.read_commit(file).ok())
                .filter(|prev| prev.graph_title() == raw_title(&graph))
                .map(|prev| GraphCounts::of(&prev.graph));

            let commits_dir = self.commits_dir();
            fs::create_dir_all(&commits_dir)
                .map_err(|e| TribalError::io("create directory", &commits_dir, e))?;

            let author = config.username.as_deref().unwrap_or(DEFAULT_AUTHOR);
            let id = generate_commit_id(Utc::now(), &commits_dir);
            let counts = GraphCounts::of(&graph);
            let commit = Commit::new(id, message, author, graph);

            let file = stored_path(COMMITS_DIR, &commit.file_name());
            let body = serde_json::to_string_pretty(&commit)
                .map_err(|e| TribalError::parse("commit", e))?;
            write_atomic(&self.resolve(&file), body.as_bytes())?;

            config.latest_commit = Some(commit.id.clone());
            config.latest_commit_file = Some(file.clone());
            config.staged_graph = None;
            config.staged_graph_file = None;

            tracing::info!(commit = %commit.id, graph = %graph_title, "committed graph");
            Ok(CommitOutcome {
                commit,
                file,
                counts,
                previous,
            })
        })
    }

    /// Archive the latest commit under `pushed/`. Nothing leaves the machine.
    pub fn push(&self) -> Result<PushOutcome> {
        self.update_config(|config| {
            let (commit_id, file) = match (&config.latest_commit, &config.latest_commit_file) {
                (Some(id), Some(file)) => (id.clone(), file.clone()),
                _ => return Err(StateError::NoCommits.into()),
            };

            let source = self.resolve(&file);
            if !source.is_file() {
                return Err(StateError::MissingCommitFile(file).into());
            }

            let data = fs::read(&source).map_err(|e| TribalError::io("read", &source, e))?;
            let commit: Commit = serde_json::from_slice(&data)
                .map_err(|e| TribalError::parse(format!("commit {}", file), e))?;

            let pushed = stored_path(PUSHED_DIR, &base_name(&file)?);
            write_atomic(&self.resolve(&pushed), &data)?;

            config.last_pushed_commit = Some(commit_id.clone());
            config.last_pushed_file = Some(pushed.clone());

            tracing::info!(commit = %commit_id, "pushed commit (local)");
            Ok(PushOutcome {
                commit,
                pushed_file: pushed,
            })
        })
    }

    pub fn status(&self) -> Result<RepoStatus> {
        let config = self.load_config()?;
        let unpushed = config.latest_commit.is_some()
            && config.latest_commit != config.last_pushed_commit;
        Ok(RepoStatus {
            state: RepoState::of(&config),
            config,
            unpushed,
        })
    }

    /// Parse a commit file given its stored path
    pub fn read_commit(&self, stored: &str) -> Result<Commit> {
        let path = self.resolve(stored);
        let data = fs::read_to_string(&path).map_err(|e| TribalError::io("read", &path, e))?;
        serde_json::from_str(&data).map_err(|e| TribalError::parse(format!("commit {}", stored), e))
    }

    /// The checked-out graph document
    pub fn current_graph(&self) -> Result<GraphDocument> {
        let config = self.load_config()?;
        let file = config
            .current_graph_file
            .ok_or(StateError::NoCurrentGraph)?;
        let path = self.resolve(&file);
        if !path.is_file() {
            return Err(StateError::MissingGraphFile(file).into());
        }
        let data = fs::read_to_string(&path).map_err(|e| TribalError::io("read", &path, e))?;
        GraphDocument::from_json(&data).map_err(|e| TribalError::parse(format!("graph {}", file), e))
    }
}

/// `.tribal/<dir>/<name>` with forward slashes, as stored in the config
fn stored_path(dir: &str, name: &str) -> String {
    format!("{}/{}/{}", CONFIG_DIR, dir, name)
}

fn base_name(stored: &str) -> Result<String> {
    Path::new(stored)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| TribalError::usage(format!("not a file path: {}", stored)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn init_repo() -> (TempDir, Repository) {
        let dir = tempdir().unwrap();
        let (repo, _) = Repository::init(dir.path(), None).unwrap();
        (dir, repo)
    }

    fn write_graph(repo: &Repository, stored: &str, graph: &GraphDocument) {
        fs::write(repo.resolve(stored), graph.to_json_pretty().unwrap()).unwrap();
    }

    fn graph_with_nodes(title: &str, ids: &[&str]) -> GraphDocument {
        let mut graph = GraphDocument::new(title, DEFAULT_AUTHOR);
        for id in ids {
            graph.nodes.push(
                serde_json::from_value(serde_json::json!({"id": id, "label": id})).unwrap(),
            );
        }
        graph
    }

    #[test]
    fn test_open_requires_tribal_dir() {
        let dir = tempdir().unwrap();
        let err = Repository::open(dir.path()).unwrap_err();
        assert!(matches!(err, TribalError::NotARepository));
    }

    #[test]
    fn test_open_or_create_writes_bare_config() {
        let dir = tempdir().unwrap();

        let repo = Repository::open_or_create(dir.path()).unwrap();
        assert!(repo.config_path().is_file());
        assert!(!dir.path().join("TRIBAL.md").exists());
        assert_eq!(repo.load_config().unwrap(), RepoConfig::default());

        repo.checkout("Auth Flow").unwrap();
        let reopened = Repository::open_or_create(dir.path()).unwrap();
        assert!(reopened.load_config().unwrap().current_graph.is_some());
    }

    #[test]
    fn test_init_writes_docs_and_default_config() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("CLAUDE.md"), "# existing\n").unwrap();

        let (repo, outcome) = Repository::init(dir.path(), None).unwrap();
        assert!(!outcome.reinitialized);
        assert!(dir.path().join("TRIBAL.md").exists());

        let claude = fs::read_to_string(dir.path().join("CLAUDE.md")).unwrap();
        assert!(claude.starts_with(templates::CLAUDE_MD_NOTICE));
        assert!(claude.ends_with("# existing\n"));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(repo.config_path()).unwrap()).unwrap();
        let obj = raw.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(!obj.contains_key("current_graph"));
        assert!(!obj.contains_key("registry_url"));
        assert!(!repo.tribal_dir().join(crate::config::LOCK_FILE).exists());
    }

    #[test]
    fn test_reinit_overwrites_config() {
        let (dir, repo) = init_repo();
        repo.checkout("Auth Flow").unwrap();

        let (repo, outcome) =
            Repository::init(dir.path(), Some("https://registry.example".to_string())).unwrap();
        assert!(outcome.reinitialized);

        let config = repo.load_config().unwrap();
        assert!(config.current_graph.is_none());
        assert_eq!(config.registry_url(), "https://registry.example");
    }

    #[test]
    fn test_checkout_creates_then_reuses_graph() {
        let (_dir, repo) = init_repo();

        let first = repo.checkout("Auth Flow").unwrap();
        assert!(first.created);
        assert_eq!(first.file, ".tribal/graphs/auth_flow.json");

        let path = repo.resolve(&first.file);
        let before = fs::read_to_string(&path).unwrap();

        repo.checkout("Other Graph").unwrap();
        let second = repo.checkout("Auth Flow").unwrap();
        assert!(!second.created);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);

        let config = repo.load_config().unwrap();
        assert_eq!(config.current_graph.as_deref(), Some("Auth Flow"));
        assert_eq!(config.current_graph_file.as_deref(), Some(".tribal/graphs/auth_flow.json"));
        assert_eq!(config.graphs.len(), 2);
        assert_eq!(RepoState::of(&config), RepoState::GraphCheckedOut);
    }

    #[test]
    fn test_checkout_rejects_empty_title() {
        let (_dir, repo) = init_repo();
        let err = repo.checkout("   ").unwrap_err();
        assert!(matches!(err, TribalError::Usage(_)));
    }

    #[test]
    fn test_add_requires_current_graph() {
        let (_dir, repo) = init_repo();
        let err = repo.add(true).unwrap_err();
        assert!(matches!(err, TribalError::State(StateError::NoCurrentGraph)));
    }

    #[test]
    fn test_add_requires_all_flag() {
        let (_dir, repo) = init_repo();
        repo.checkout("Auth Flow").unwrap();
        let err = repo.add(false).unwrap_err();
        assert!(matches!(err, TribalError::Usage(_)));
    }

    #[test]
    fn test_add_fails_when_graph_file_removed() {
        let (_dir, repo) = init_repo();
        let checkout = repo.checkout("Auth Flow").unwrap();
        fs::remove_file(repo.resolve(&checkout.file)).unwrap();

        let err = repo.add(true).unwrap_err();
        assert!(matches!(err, TribalError::State(StateError::MissingGraphFile(_))));
    }

    #[test]
    fn test_add_copies_graph_verbatim() {
        let (_dir, repo) = init_repo();
        let checkout = repo.checkout("Auth Flow").unwrap();
        fs::write(repo.resolve(&checkout.file), "{\"title\": \"Auth Flow\",  \"nodes\": []}").unwrap();

        let added = repo.add(true).unwrap();
        assert_eq!(added.staged_file, ".tribal/staging/auth_flow.json");
        assert_eq!(
            fs::read_to_string(repo.resolve(&added.staged_file)).unwrap(),
            "{\"title\": \"Auth Flow\",  \"nodes\": []}"
        );

        let config = repo.load_config().unwrap();
        assert_eq!(config.staged_graph.as_deref(), Some("Auth Flow"));
        assert_eq!(RepoState::of(&config), RepoState::Staged);
    }

    #[test]
    fn test_commit_without_add_fails() {
        let (_dir, repo) = init_repo();
        repo.checkout("Auth Flow").unwrap();

        let err = repo.commit("first").unwrap_err();
        assert!(matches!(err, TribalError::State(StateError::NoStagedChanges)));
        assert!(err.to_string().contains("no staged changes"));
    }

    #[test]
    fn test_commit_requires_message() {
        let (_dir, repo) = init_repo();
        let err = repo.commit("").unwrap_err();
        assert!(matches!(err, TribalError::Usage(_)));
    }

    #[test]
    fn test_commit_snapshots_staged_graph() {
        let (_dir, repo) = init_repo();
        let checkout = repo.checkout("Auth Flow").unwrap();

        let staged_graph = graph_with_nodes("Auth Flow", &["login", "session"]);
        write_graph(&repo, &checkout.file, &staged_graph);
        repo.add(true).unwrap();

        // Later edits to the working graph must not leak into the commit.
        write_graph(&repo, &checkout.file, &graph_with_nodes("Auth Flow", &["other"]));

        let outcome = repo.commit("add login nodes").unwrap();
        assert_eq!(outcome.commit.graph, serde_json::to_value(&staged_graph).unwrap());
        assert_eq!(outcome.counts, GraphCounts { nodes: 2, edges: 0 });
        assert!(outcome.previous.is_none());
        assert!(outcome.commit.id.starts_with("commit_"));

        let on_disk = repo.read_commit(&outcome.file).unwrap();
        assert_eq!(on_disk, outcome.commit);

        let config = repo.load_config().unwrap();
        assert_eq!(config.latest_commit.as_deref(), Some(outcome.commit.id.as_str()));
        assert!(config.staged_graph.is_none());
        assert!(config.staged_graph_file.is_none());
        assert_eq!(RepoState::of(&config), RepoState::Committed);
    }

    #[test]
    fn test_commit_rejects_malformed_staged_graph() {
        let (_dir, repo) = init_repo();
        let checkout = repo.checkout("Auth Flow").unwrap();
        fs::write(repo.resolve(&checkout.file), "{ nope").unwrap();
        repo.add(true).unwrap();

        let err = repo.commit("broken").unwrap_err();
        assert!(matches!(err, TribalError::Parse { .. }));

        // Staging survives a failed commit.
        let config = repo.load_config().unwrap();
        assert!(config.staged_graph.is_some());
    }

    #[test]
    fn test_commit_stores_staged_document_unchanged() {
        let documents = [
            r#"{"nodes":[{"id":"n1","position":{"x":1,"y":2}}],"edges":[{"id":"e1","source":"n1","target":"n1"}]}"#,
            r#"{"title":"Loose","nodes":[{"id":1}],"edges":[],"metadata":null}"#,
            r#"{"title":"Extra","nodes":[],"edges":[],"layout":{"rankdir":"LR"}}"#,
        ];

        for doc in documents {
            let (_dir, repo) = init_repo();
            let checkout = repo.checkout("Auth Flow").unwrap();
            fs::write(repo.resolve(&checkout.file), doc).unwrap();
            let added = repo.add(true).unwrap();

            let staged: Value =
                serde_json::from_str(&fs::read_to_string(repo.resolve(&added.staged_file)).unwrap())
                    .unwrap();
            let outcome = repo.commit("snapshot").unwrap();
            assert_eq!(outcome.commit.graph, staged, "commit altered {}", doc);
            assert_eq!(repo.read_commit(&outcome.file).unwrap().graph, staged);

            let pushed = repo.push().unwrap();
            assert_eq!(pushed.commit.graph, staged);
        }
    }

    #[test]
    fn test_commit_counts_raw_arrays() {
        let (_dir, repo) = init_repo();
        let checkout = repo.checkout("Auth Flow").unwrap();
        fs::write(
            repo.resolve(&checkout.file),
            r#"{"nodes":[{"id":1},{"id":"n2"},{}],"edges":[{"id":"e1","source":1,"target":"n2"}]}"#,
        )
        .unwrap();
        repo.add(true).unwrap();

        let outcome = repo.commit("loose").unwrap();
        assert_eq!(outcome.counts, GraphCounts { nodes: 3, edges: 1 });
    }

    #[test]
    fn test_commit_rejects_non_object_graph() {
        let (_dir, repo) = init_repo();
        let checkout = repo.checkout("Auth Flow").unwrap();
        fs::write(repo.resolve(&checkout.file), "[1, 2, 3]").unwrap();
        repo.add(true).unwrap();

        let err = repo.commit("array").unwrap_err();
        assert!(matches!(err, TribalError::Parse { .. }));
    }

    #[test]
    fn test_commits_in_same_second_do_not_collide() {
        let (_dir, repo) = init_repo();
        repo.checkout("Auth Flow").unwrap();

        repo.add(true).unwrap();
        let first = repo.commit("one").unwrap();
        repo.add(true).unwrap();
        let second = repo.commit("two").unwrap();

        assert_ne!(first.commit.id, second.commit.id);
        assert!(repo.resolve(&first.file).exists());
        assert!(repo.resolve(&second.file).exists());
        assert_eq!(second.previous, Some(GraphCounts { nodes: 0, edges: 0 }));
    }

    #[test]
    fn test_push_without_commit_fails() {
        let (_dir, repo) = init_repo();
        let err = repo.push().unwrap_err();
        assert!(matches!(err, TribalError::State(StateError::NoCommits)));
        assert!(err.to_string().contains("no commits to push"));
    }

    #[test]
    fn test_push_copies_commit_file() {
        let (_dir, repo) = init_repo();
        repo.checkout("Auth Flow").unwrap();
        repo.add(true).unwrap();
        let committed = repo.commit("first").unwrap();

        let pushed = repo.push().unwrap();
        assert_eq!(pushed.commit.id, committed.commit.id);
        assert_eq!(
            fs::read(repo.resolve(&pushed.pushed_file)).unwrap(),
            fs::read(repo.resolve(&committed.file)).unwrap()
        );

        let status = repo.status().unwrap();
        assert_eq!(status.state, RepoState::Pushed);
        assert!(!status.unpushed);
        assert_eq!(
            status.config.last_pushed_file.as_deref(),
            Some(pushed.pushed_file.as_str())
        );
    }

    #[test]
    fn test_push_fails_when_commit_file_missing() {
        let (_dir, repo) = init_repo();
        repo.checkout("Auth Flow").unwrap();
        repo.add(true).unwrap();
        let committed = repo.commit("first").unwrap();
        fs::remove_file(repo.resolve(&committed.file)).unwrap();

        let err = repo.push().unwrap_err();
        assert!(matches!(err, TribalError::State(StateError::MissingCommitFile(_))));
    }

    #[test]
    fn test_transition_fails_while_locked() {
        let (_dir, repo) = init_repo();
        let _held = repo.lock().unwrap();

        let err = repo.checkout("Auth Flow").unwrap_err();
        assert!(matches!(err, TribalError::Locked(_)));
    }

    #[test]
    fn test_author_follows_logged_in_user() {
        let (_dir, repo) = init_repo();
        repo.update_config(|config| {
            config.set_auth("tok".to_string(), "alice".to_string(), "u-1".to_string());
            Ok(())
        })
        .unwrap();

        repo.checkout("Auth Flow").unwrap();
        repo.add(true).unwrap();
        let outcome = repo.commit("first").unwrap();
        assert_eq!(outcome.commit.author, "alice");
        assert_eq!(outcome.commit.graph["metadata"]["author"], "alice");
    }
}

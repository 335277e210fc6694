//! Error taxonomy for repository and registry operations
//!
//! Library code returns [`TribalError`]; CLI handlers wrap it with
//! `anyhow` context before it reaches `main`.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = TribalError> = std::result::Result<T, E>;

/// Operation attempted out of sequence
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("no current graph checked out. Use 'tribal checkout -g \"<title>\"' first")]
    NoCurrentGraph,

    #[error("current graph file does not exist: {0}")]
    MissingGraphFile(String),

    #[error("no staged changes. Use 'tribal add -A' first")]
    NoStagedChanges,

    #[error("staged graph file does not exist: {0}")]
    MissingStagedFile(String),

    #[error("no commits to push. Use 'tribal commit -m \"<message>\"' first")]
    NoCommits,

    #[error("commit file does not exist: {0}")]
    MissingCommitFile(String),

    #[error("not logged in. Use 'tribal login' first")]
    NotLoggedIn,
}

#[derive(Debug, Error)]
pub enum TribalError {
    #[error("not a tribal repository. Run 'tribal init' first")]
    NotARepository,

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status}: {error} - {message}")]
    Api {
        status: u16,
        error: String,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("invalid registry URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("repository is locked by another tribal process (remove {} if stale)", .0.display())]
    Locked(PathBuf),
}

impl TribalError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            what: what.into(),
            source,
        }
    }

    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// HTTP status for registry failures, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_carries_server_fields() {
        let err = TribalError::Api {
            status: 404,
            error: "not_found".to_string(),
            message: "graph missing".to_string(),
            details: None,
        };

        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("not_found"));
        assert!(text.contains("graph missing"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_state_error_messages() {
        let err: TribalError = StateError::NoStagedChanges.into();
        assert!(err.to_string().contains("no staged changes"));

        let err: TribalError = StateError::NoCommits.into();
        assert!(err.to_string().contains("no commits to push"));
    }
}

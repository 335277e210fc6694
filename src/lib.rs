//! tribal - graph-based development workflow CLI
//!
//! Git-like lifecycle for graph documents, plus a client for the tribal
//! registry.
//!
//! ## Key Concepts
//!
//! - **Graph**: a titled document of nodes and edges under `.tribal/graphs/`
//! - **Staging**: `tribal add -A` copies the current graph into `.tribal/staging/`
//! - **Commit**: an immutable snapshot of a staged graph plus message and timestamp
//! - **Push**: archives the latest commit under `.tribal/pushed/` (local only)
//! - **Registry**: remote HTTP service holding accounts and published graphs

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod remote;

pub use config::RepoConfig;
pub use core::commit::Commit;
pub use core::graph::GraphDocument;
pub use core::repo::{RepoState, Repository};
pub use error::{StateError, TribalError};
pub use remote::RegistryClient;

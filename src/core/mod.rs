//! Core module - local repository logic
//!
//! Graph documents, commits, the checkout/add/commit/push workflow and
//! local search.

pub mod commit;
pub mod graph;
pub mod repo;
pub mod search;
pub mod templates;

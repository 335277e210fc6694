//! Local search - keyword overlap between a context string and graph titles
//!
//! Scoring, per graph:
//! - +1 for every (query word, title word) pair where either word contains
//!   the other
//! - +2 for every query word found in `metadata.description`
//!
//! Words are whitespace-separated and lowercased. Graphs scoring 0 are
//! dropped; the rest are ranked by descending score, keeping directory
//! order among ties.

use std::fs;
use std::path::Path;

use super::graph::{parse_raw, raw_description, raw_title};
use crate::error::{Result, TribalError};

/// Weight of a query word found in the description
const DESCRIPTION_WEIGHT: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch {
    pub title: String,
    pub file_name: String,
    pub description: Option<String>,
    pub score: u32,
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Score one graph against already-lowercased query words
pub fn score_graph(query_words: &[String], title: &str, description: Option<&str>) -> u32 {
    let title_words = words(title);

    let mut score = 0;
    for q in query_words {
        for t in &title_words {
            if t.contains(q.as_str()) || q.contains(t.as_str()) {
                score += 1;
            }
        }
    }

    if let Some(description) = description {
        let description = description.to_lowercase();
        for q in query_words {
            if description.contains(q.as_str()) {
                score += DESCRIPTION_WEIGHT;
            }
        }
    }

    score
}

/// Stable descending sort by score
pub fn rank(mut matches: Vec<SearchMatch>) -> Vec<SearchMatch> {
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

/// Score every `*.json` graph in `graphs_dir`.
///
/// Returns `Ok(None)` when the directory does not exist. Files that cannot
/// be read or parsed are skipped.
pub fn search_dir(graphs_dir: &Path, context: &str) -> Result<Option<Vec<SearchMatch>>> {
    if !graphs_dir.is_dir() {
        return Ok(None);
    }

    let entries =
        fs::read_dir(graphs_dir).map_err(|e| TribalError::io("read", graphs_dir, e))?;

    let mut file_names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".json"))
        .collect();
    file_names.sort();

    let query_words = words(context);
    let mut matches = Vec::new();

    for file_name in file_names {
        let path = graphs_dir.join(&file_name);
        let graph = match fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|data| parse_raw(&data).map_err(|e| e.to_string()))
        {
            Ok(graph) => graph,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping unreadable graph");
                continue;
            }
        };

        let title = raw_title(&graph);
        let description = raw_description(&graph);
        let score = score_graph(&query_words, title, description);
        tracing::debug!(file = %file_name, score, "scored graph");
        if score > 0 {
            matches.push(SearchMatch {
                title: title.to_string(),
                description: description.map(str::to_string),
                file_name,
                score,
            });
        }
    }

    Ok(Some(rank(matches)))
}

//! Graph Document - the unit of work checked out, staged and committed
//!
//! The on-disk format is plain JSON:
//!
//! ```json
//! {
//!   "title": "Auth Flow",
//!   "nodes": [{ "id": "n1", "label": "Login", "position": { "x": 0, "y": 0 } }],
//!   "edges": [],
//!   "metadata": { "description": "..." }
//! }
//! ```
//!
//! Staging, commits and local search work on the raw [`Value`] so a commit
//! stores exactly what was staged. [`GraphDocument`] is a typed view built
//! leniently from that value for counting and publishing: missing fields take
//! defaults, numeric ids become strings, and items that still do not fit are
//! skipped with a warning.
//!
//! Edge endpoints are not checked against node ids. Keys this crate does not
//! know about are kept in `extra` so a read/write cycle does not drop them.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub source: String,
    #[serde(deserialize_with = "string_or_number")]
    pub target: String,
    #[serde(default)]
    pub directed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {}",
            other
        ))),
    }
}

/// A titled document of nodes and edges
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphDocument {
    /// Fresh, empty graph stamped with creation time and author
    pub fn new(title: impl Into<String>, author: &str) -> Self {
        let mut metadata = Map::new();
        metadata.insert("created".to_string(), Value::String(Utc::now().to_rfc3339()));
        metadata.insert("author".to_string(), Value::String(author.to_string()));

        Self {
            title: title.into(),
            metadata,
            ..Default::default()
        }
    }

    /// Typed view of a raw graph value. Never fails.
    pub fn from_value_lenient(graph: &Value) -> Self {
        let Some(obj) = graph.as_object() else {
            return Self::default();
        };

        let mut extra = obj.clone();
        let title = match extra.remove("title") {
            Some(Value::String(title)) => title,
            _ => String::new(),
        };
        let nodes = lenient_items(extra.remove("nodes"), "node");
        let edges = lenient_items(extra.remove("edges"), "edge");
        let metadata = match extra.remove("metadata") {
            Some(Value::Object(metadata)) => metadata,
            _ => Map::new(),
        };

        Self {
            title,
            nodes,
            edges,
            metadata,
            extra,
        }
    }

    /// `metadata.description`, when it is a string
    pub fn description(&self) -> Option<&str> {
        self.metadata.get("description").and_then(Value::as_str)
    }

    /// Parse a graph file leniently; only a non-object document is an error
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        parse_raw(data).map(|graph| Self::from_value_lenient(&graph))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn lenient_items<T: DeserializeOwned>(items: Option<Value>, kind: &'static str) -> Vec<T> {
    let Some(Value::Array(items)) = items else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(kind, error = %e, "skipping malformed graph item");
                None
            }
        })
        .collect()
}

/// Parse a graph file as an untyped JSON object
pub fn parse_raw(data: &str) -> serde_json::Result<Value> {
    serde_json::from_str::<Map<String, Value>>(data).map(Value::Object)
}

/// `title` of a raw graph, or `""`
pub fn raw_title(graph: &Value) -> &str {
    graph.get("title").and_then(Value::as_str).unwrap_or_default()
}

/// `metadata.description` of a raw graph, when it is a string
pub fn raw_description(graph: &Value) -> Option<&str> {
    graph
        .get("metadata")
        .and_then(|m| m.get("description"))
        .and_then(Value::as_str)
}

/// Length of the `nodes`/`edges` array of a raw graph
pub fn raw_len(graph: &Value, key: &str) -> usize {
    graph.get(key).and_then(Value::as_array).map_or(0, Vec::len)
}

/// File stem for a graph title: lowercased, spaces replaced by underscores
pub fn slugify(title: &str) -> String {
    title.to_lowercase().replace(' ', "_")
}

/// File name (`<slug>.json`) under `.tribal/graphs/`
pub fn graph_file_name(title: &str) -> String {
    format!("{}.json", slugify(title))
}

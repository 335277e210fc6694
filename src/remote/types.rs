//! Remote API types
//!
//! DTOs for registry communication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::graph::{Edge, GraphDocument, Node};

// ============== Auth Types ==============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Response from register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

// ============== Graph Types ==============

/// Graph record owned by the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteGraph {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub owner_id: Uuid,
    #[serde(default)]
    pub owner: Option<User>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGraphRequest {
    pub title: String,
    pub description: Option<String>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub metadata: Map<String, Value>,
    pub is_public: bool,
}

impl CreateGraphRequest {
    /// Build from a local graph document
    pub fn from_document(graph: &GraphDocument, description: Option<String>, is_public: bool) -> Self {
        Self {
            title: graph.title.clone(),
            description: description.or_else(|| graph.description().map(str::to_string)),
            nodes: graph.nodes.clone(),
            edges: graph.edges.clone(),
            metadata: graph.metadata.clone(),
            is_public,
        }
    }
}

/// Partial update; unset fields are left untouched by the server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGraphRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<Node>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    pub message: String,
}

impl UpdateGraphRequest {
    /// Replace title, content and metadata with a local graph document
    pub fn from_document(graph: &GraphDocument, message: impl Into<String>) -> Self {
        Self {
            title: Some(graph.title.clone()),
            description: graph.description().map(str::to_string),
            nodes: Some(graph.nodes.clone()),
            edges: Some(graph.edges.clone()),
            metadata: Some(graph.metadata.clone()),
            is_public: None,
            message: message.into(),
        }
    }
}

// ============== Search Types ==============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// One page of graphs (list, public list and search responses)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphPage {
    #[serde(default)]
    pub graphs: Vec<RemoteGraph>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub has_more: bool,
}

// ============== Error Types ==============

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

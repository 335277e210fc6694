//! Registry HTTP client
//!
//! Async client for the tribal registry API. One request per call, no
//! retries; every request has a fixed 30 second timeout.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::types::*;
use crate::error::{Result, TribalError};

pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const HEALTH_PATH: &str = "/health";

/// Parse a registry URL, accepting only http and https
pub fn validate_registry_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| TribalError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(TribalError::InvalidUrl {
            url: url.to_string(),
            reason: format!("scheme must be http or https, got '{}'", other),
        }),
    }
}

/// HTTP client for the tribal registry
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RegistryClient {
    /// Create a client without credentials
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TribalError::Network {
                url: base_url.to_string(),
                source: e,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the base URL parses and uses http(s)
    pub fn validate_url(&self) -> Result<()> {
        validate_registry_url(&self.base_url).map(|_| ())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a request with the bearer token, if any
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        tracing::debug!(%method, %url, "registry request");

        let builder = self.client.request(method, url);
        if let Some(ref token) = self.token {
            builder.bearer_auth(token)
        } else {
            builder
        }
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Response> {
        builder.send().await.map_err(|e| TribalError::Network {
            url: self.endpoint(path),
            source: e,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let builder = self.request(Method::GET, path).query(query);
        let resp = self.send(builder, path).await?;
        self.handle_response(resp, path).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(method, path).json(body);
        let resp = self.send(builder, path).await?;
        self.handle_response(resp, path).await
    }

    // ============== Health ==============

    /// Expects HTTP 200 from `/health`
    pub async fn health_check(&self) -> Result<()> {
        let resp = self
            .send(self.request(Method::GET, HEALTH_PATH), HEALTH_PATH)
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(TribalError::Api {
                status: status.as_u16(),
                error: "health_check_failed".to_string(),
                message: format!("health check failed with status {}", status.as_u16()),
                details: None,
            });
        }
        Ok(())
    }

    // ============== Auth ==============

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse> {
        let req = RegisterRequest {
            username,
            email,
            password,
        };
        self.send_json(Method::POST, "/api/v1/auth/register", &req)
            .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse> {
        let req = LoginRequest { username, password };
        self.send_json(Method::POST, "/api/v1/auth/login", &req).await
    }

    /// The user the current token belongs to
    pub async fn me(&self) -> Result<User> {
        self.get("/api/v1/auth/me", &[]).await
    }

    // ============== Graphs ==============

    pub async fn create_graph(&self, req: &CreateGraphRequest) -> Result<RemoteGraph> {
        self.send_json(Method::POST, "/api/v1/graphs", req).await
    }

    /// Graphs owned by the current user
    pub async fn list_graphs(&self, limit: u32, offset: u32) -> Result<GraphPage> {
        self.get("/api/v1/graphs", &page_query(limit, offset)).await
    }

    pub async fn get_graph(&self, id: &str) -> Result<RemoteGraph> {
        self.get(&format!("/api/v1/graphs/{}", id), &[]).await
    }

    pub async fn update_graph(&self, id: &str, req: &UpdateGraphRequest) -> Result<RemoteGraph> {
        self.send_json(Method::PUT, &format!("/api/v1/graphs/{}", id), req)
            .await
    }

    pub async fn delete_graph(&self, id: &str) -> Result<()> {
        let path = format!("/api/v1/graphs/{}", id);
        let resp = self
            .send(self.request(Method::DELETE, &path), &path)
            .await?;
        self.check_status(resp).await.map(|_| ())
    }

    pub async fn search_graphs(&self, req: &SearchRequest) -> Result<GraphPage> {
        self.send_json(Method::POST, "/api/v1/search/graphs", req)
            .await
    }

    pub async fn list_public_graphs(&self, limit: u32, offset: u32) -> Result<GraphPage> {
        self.get("/api/v1/public/graphs", &page_query(limit, offset))
            .await
    }

    // ============== Helpers ==============

    /// Decode a 2xx body as `T`, or turn anything else into an API error
    async fn handle_response<T: DeserializeOwned>(&self, resp: Response, path: &str) -> Result<T> {
        let resp = self.check_status(resp).await?;
        let body = resp.bytes().await.map_err(|e| TribalError::Network {
            url: self.endpoint(path),
            source: e,
        })?;
        serde_json::from_slice(&body)
            .map_err(|e| TribalError::parse(format!("response from {}", path), e))
    }

    async fn check_status(&self, resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(api_error(status, &body))
    }
}

fn page_query(limit: u32, offset: u32) -> Vec<(&'static str, String)> {
    vec![("limit", limit.to_string()), ("offset", offset.to_string())]
}

/// Build an API error from a non-2xx response body
fn api_error(status: StatusCode, body: &str) -> TribalError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => TribalError::Api {
            status: status.as_u16(),
            error: err.error,
            message: err.message.unwrap_or_default(),
            details: err.details,
        },
        Err(_) => TribalError::Api {
            status: status.as_u16(),
            error: status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_lowercase()
                .replace(' ', "_"),
            message: if body.trim().is_empty() {
                "failed to decode error response".to_string()
            } else {
                body.trim().chars().take(200).collect()
            },
            details: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_registry_url() {
        assert!(validate_registry_url("http://localhost:8080").is_ok());
        assert!(validate_registry_url("https://registry.example/").is_ok());

        let err = validate_registry_url("ftp://registry.example").unwrap_err();
        assert!(err.to_string().contains("http or https"));

        assert!(matches!(
            validate_registry_url("not a url"),
            Err(TribalError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = RegistryClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.endpoint(HEALTH_PATH), "http://localhost:8080/health");
    }

    #[test]
    fn test_api_error_from_envelope() {
        let err = api_error(
            StatusCode::CONFLICT,
            r#"{"error": "conflict", "message": "username taken", "details": {"field": "username"}}"#,
        );

        match err {
            TribalError::Api {
                status,
                error,
                message,
                details,
            } => {
                assert_eq!(status, 409);
                assert_eq!(error, "conflict");
                assert_eq!(message, "username taken");
                assert_eq!(details.unwrap()["field"], "username");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_from_plain_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, "upstream down");
        let text = err.to_string();
        assert!(text.contains("502"));
        assert!(text.contains("bad_gateway"));
        assert!(text.contains("upstream down"));
    }
}

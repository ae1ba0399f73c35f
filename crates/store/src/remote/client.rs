//! Blocking HTTP transport for the Firestore REST API

use std::time::Duration;

use eventdesk_core::{Error, Result};
use tracing::{debug, warn};

use super::auth::{TokenProvider, TokenSource};

/// Production Firestore REST endpoint
pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// Status and body of a completed exchange.
#[derive(Debug)]
pub(crate) struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    /// Collect status and body of a finished request.
    pub fn read(
        result: std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error>,
    ) -> Result<Self> {
        let mut response = result.map_err(|e| Error::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| Error::Transport(format!("failed to read response: {}", e)))?;
        Ok(Self { status, body })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Parse the body as JSON, turning non-success statuses into errors.
    pub fn into_json(self) -> Result<serde_json::Value> {
        if !self.is_success() {
            return Err(self.into_status_error());
        }
        if self.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&self.body)
            .map_err(|e| Error::Protocol(format!("invalid JSON response: {}", e)))
    }

    pub fn into_status_error(self) -> Error {
        let message = serde_json::from_str::<serde_json::Value>(&self.body)
            .ok()
            .and_then(|json| {
                json.pointer("/error/message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| self.body.chars().take(200).collect());
        Error::Status {
            code: self.status,
            message,
        }
    }
}

/// Agent plus the document root of one database.
pub(crate) struct RestClient {
    agent: ureq::Agent,
    documents_root: String,
    tokens: TokenProvider,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("documents_root", &self.documents_root)
            .field("token_source", self.tokens.source())
            .finish()
    }
}

impl RestClient {
    pub fn new(
        base_url: &str,
        project_id: &str,
        token_source: TokenSource,
        timeout: Duration,
    ) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            documents_root: documents_root(base_url, project_id),
            tokens: TokenProvider::new(token_source),
        }
    }

    /// `{base}/projects/{p}/databases/(default)/documents`
    pub fn documents_root(&self) -> &str {
        &self.documents_root
    }

    /// Absolute URL of a slash-separated document or collection path.
    pub fn url(&self, path: &str) -> String {
        if path.is_empty() {
            self.documents_root.clone()
        } else {
            format!("{}/{}", self.documents_root, path)
        }
    }

    pub fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
    ) -> Result<Reply> {
        debug!(?method, url, "Firestore request");
        let bearer = self.tokens.token(&self.agent)?.map(|t| format!("Bearer {}", t));

        let result = match method {
            Method::Get | Method::Delete => {
                let mut request = if method == Method::Get {
                    self.agent.get(url)
                } else {
                    self.agent.delete(url)
                };
                if let Some(bearer) = &bearer {
                    request = request.header("Authorization", bearer);
                }
                request.query_pairs(query.iter().copied()).call()
            }
            Method::Post | Method::Patch => {
                let mut request = if method == Method::Post {
                    self.agent.post(url)
                } else {
                    self.agent.patch(url)
                };
                request = request.header("Content-Type", "application/json");
                if let Some(bearer) = &bearer {
                    request = request.header("Authorization", bearer);
                }
                let payload = match body {
                    Some(json) => serde_json::to_vec(json)?,
                    None => b"{}".to_vec(),
                };
                request.query_pairs(query.iter().copied()).send(&payload[..])
            }
        };

        Reply::read(result).map_err(|e| {
            warn!(url, error = %e, "Firestore request failed");
            e
        })
    }
}

fn documents_root(base_url: &str, project_id: &str) -> String {
    format!(
        "{}/projects/{}/databases/(default)/documents",
        base_url.trim_end_matches('/'),
        project_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_root() {
        let client = RestClient::new(
            "http://localhost:8081/v1/",
            "demo",
            TokenSource::Anonymous,
            Duration::from_secs(1),
        );
        assert_eq!(
            client.documents_root(),
            "http://localhost:8081/v1/projects/demo/databases/(default)/documents"
        );
        assert_eq!(
            client.url("clients/acme"),
            format!("{}/clients/acme", client.documents_root())
        );
        assert_eq!(client.url(""), client.documents_root());
    }

    #[test]
    fn test_reply_status_error_uses_api_message() {
        let reply = Reply {
            status: 403,
            body: r#"{"error":{"code":403,"message":"Missing or insufficient permissions."}}"#
                .to_string(),
        };
        match reply.into_json() {
            Err(Error::Status { code, message }) => {
                assert_eq!(code, 403);
                assert_eq!(message, "Missing or insufficient permissions.");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_reply_empty_body_is_null() {
        let reply = Reply {
            status: 200,
            body: String::new(),
        };
        assert_eq!(reply.into_json().unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn test_reply_invalid_json_is_protocol_error() {
        let reply = Reply {
            status: 200,
            body: "<html>".to_string(),
        };
        assert!(matches!(reply.into_json(), Err(Error::Protocol(_))));
    }
}

//! REST transport for the hosted backend (PostgREST-style API)

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use commenter_shared::{ApiErrorBody, ErrorCode};

use crate::ports::outbound::{RestApiPort, ServiceError};

/// Default base URL of a locally hosted backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:54321/rest/v1";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client that speaks the backend's REST dialect.
///
/// Reads go to `GET /<view>?<filters>`, stored procedures to
/// `POST /rpc/<fn>`. Every request carries the project key as both the
/// `apikey` header and a bearer token.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self::with_timeout(base_url, api_key, DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Create a client with a custom timeout (for testing).
    pub fn with_timeout(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create a client from environment variables.
    ///
    /// Uses `COMMENTER_API_URL`, `COMMENTER_API_KEY`, and
    /// `COMMENTER_REQUEST_TIMEOUT_SECS`, falling back to defaults if not set.
    pub fn from_env() -> Self {
        let base_url = std::env::var("COMMENTER_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let api_key = std::env::var("COMMENTER_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("COMMENTER_API_KEY is not set; requests will go out anonymous");
        }
        let timeout_secs = std::env::var("COMMENTER_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        Self::with_timeout(&base_url, &api_key, timeout_secs)
    }

    /// Replace the base URL, keeping the key and the underlying HTTP client.
    ///
    /// Used when a stored override points this device at a different backend
    /// than the environment default.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_request(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/{}", self.base_url, path))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn rpc_request(&self, function: &str, params: &Value) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/rpc/{}", self.base_url, function))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(params)
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, "")
    }
}

#[async_trait]
impl RestApiPort for RestClient {
    async fn get_json(&self, path: &str) -> Result<Value, ServiceError> {
        let response = self
            .get_request(path)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|err| ServiceError::Parse(err.to_string()))
    }

    async fn post_rpc(&self, function: &str, params: Value) -> Result<Value, ServiceError> {
        let response = self
            .rpc_request(function, &params)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        // Void functions answer 204 with no body; surface that as null
        // rather than a decode failure.
        let text = response
            .text()
            .await
            .map_err(|err| ServiceError::Network(err.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|err| ServiceError::Parse(err.to_string()))
    }

    async fn post_rpc_no_response(
        &self,
        function: &str,
        params: Value,
    ) -> Result<(), ServiceError> {
        let response = self
            .rpc_request(function, &params)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }
}

/// Request never reached the backend, or the connection dropped mid-flight.
fn transport_error(err: reqwest::Error) -> ServiceError {
    ServiceError::Network(err.to_string())
}

async fn error_from_response(response: reqwest::Response) -> ServiceError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    classify_error_body(status, &text)
}

/// Map a non-success response to a [`ServiceError`].
///
/// The backend's stored procedures raise structured [`ApiErrorBody`] JSON;
/// anything else (proxy pages, overload answers) falls back on the status
/// code, with 5xx treated as transient.
fn classify_error_body(status: StatusCode, text: &str) -> ServiceError {
    if let Ok(body) = serde_json::from_str::<ApiErrorBody>(text) {
        if body.code != ErrorCode::Unknown || !body.message.trim().is_empty() {
            return ServiceError::from(body);
        }
    }

    if status.is_server_error() {
        return ServiceError::Network(format!("server answered {status}"));
    }

    let snippet: String = text.trim().chars().take(160).collect();
    let message = if snippet.is_empty() {
        format!("request failed with {status}")
    } else {
        snippet
    };
    ServiceError::Backend {
        code: ErrorCode::Unknown,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = RestClient::new("http://localhost:54321/rest/v1/", "key");
        assert_eq!(client.base_url(), "http://localhost:54321/rest/v1");
    }

    #[test]
    fn test_with_base_url_replaces_and_trims() {
        let client = RestClient::new("http://localhost:54321/rest/v1", "key")
            .with_base_url("https://project.example.co/rest/v1/");
        assert_eq!(client.base_url(), "https://project.example.co/rest/v1");
    }

    #[test]
    fn test_structured_error_body_maps_to_semantic_kind() {
        let err = classify_error_body(
            StatusCode::CONFLICT,
            r#"{"code":"no_capacity","message":"Vagas esgotadas para esta empresa."}"#,
        );
        assert_eq!(
            err,
            ServiceError::NoCapacity("Vagas esgotadas para esta empresa.".to_string())
        );
    }

    #[test]
    fn test_unknown_code_with_message_becomes_backend_error() {
        let err = classify_error_body(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"JWT expired"}"#,
        );
        assert_eq!(
            err,
            ServiceError::Backend {
                code: ErrorCode::Unknown,
                message: "JWT expired".to_string(),
            }
        );
    }

    #[test]
    fn test_server_error_without_body_is_transient() {
        let err = classify_error_body(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(err, ServiceError::Network(_)));
    }

    #[test]
    fn test_plain_text_error_keeps_a_snippet() {
        let err = classify_error_body(StatusCode::BAD_REQUEST, "malformed query string");
        assert_eq!(
            err,
            ServiceError::Backend {
                code: ErrorCode::Unknown,
                message: "malformed query string".to_string(),
            }
        );
    }
}

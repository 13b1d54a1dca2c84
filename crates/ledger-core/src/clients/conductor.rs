//! HTTP request core for the Conductor gateway
//!
//! The one place that knows how requests are authenticated and how error
//! responses are normalized. No retries, no pagination, no audit writes
//! happen here; callers layer those on top.

use crate::config::ConductorConfig;
use crate::endpoints;
use crate::error::{LedgerError, Result};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde_json::{json, Value};

/// Header carrying the tenant identity on every call
pub const END_USER_HEADER: &str = "Conductor-End-User-Id";

/// Authenticated HTTP client for the gateway
pub struct ConductorClient {
    config: ConductorConfig,
    http_client: HttpClient,
}

impl ConductorClient {
    /// Create a client, failing fast when credentials are missing.
    /// No network traffic happens here.
    pub fn new(config: ConductorConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LedgerError::Config(
                "Conductor API key is required".to_string(),
            ));
        }

        if config.end_user_id.is_empty() {
            return Err(LedgerError::Config(
                "Conductor end-user id is required".to_string(),
            ));
        }

        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| LedgerError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Tenant id this client speaks for
    pub fn end_user_id(&self) -> &str {
        &self.config.end_user_id
    }

    /// Send one authenticated request and parse the JSON body.
    /// Non-2xx responses become [`LedgerError::Api`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.config.base_url, path);
        log::debug!("{} {}", method, url);

        let mut request = self
            .http_client
            .request(method, &url)
            .bearer_auth(&self.config.api_key)
            .header(END_USER_HEADER, &self.config.end_user_id);

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(error_from_response(status, &text));
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&text)?)
    }

    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.request(Method::GET, path, query, None).await
    }

    /// The gateway mutates through POST only, including updates.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, &[], None).await
    }

    /// Probe the connection by fetching the configured end-user.
    /// Any failure comes back as `false` rather than an error.
    pub async fn check_connection(&self) -> Result<bool> {
        let path = format!("{}/{}", endpoints::END_USERS, self.config.end_user_id);
        match self.get(&path, &[]).await {
            Ok(_) => Ok(true),
            Err(e) => {
                log::debug!("Connection check failed: {}", e);
                Ok(false)
            }
        }
    }
}

/// Normalize a non-success response into an [`LedgerError::Api`].
/// Unparseable bodies fall back to the HTTP status line so a broken
/// error payload cannot mask the failure itself.
fn error_from_response(status: StatusCode, text: &str) -> LedgerError {
    let status_line = status.canonical_reason().unwrap_or("Unknown error");

    let body: Value = serde_json::from_str(text)
        .unwrap_or_else(|_| json!({ "message": status_line }));

    let message = body
        .get("error")
        .and_then(|e| e.get("message"))
        .or_else(|| body.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| status_line.to_string());

    LedgerError::Api {
        status: status.as_u16(),
        message,
        body,
    }
}

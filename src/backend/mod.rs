//! Clients for the hosted backend: the REST table API and the authentication service.
//!
//! Both sit behind traits so the services can be driven by an in-memory double in tests.

pub mod auth;
pub mod table;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::{AdminError, AdminResult};

pub use auth::{AuthApi, RestAuthClient};
pub use table::{RestTableClient, TableApi};

/// Connection settings shared by the table and auth clients
#[derive(Debug, Clone)]
pub struct BackendSettings {
    base_url: String,
    anon_key: Option<String>,
    pub timeout: Duration,
    pub log_requests: bool,
}

impl BackendSettings {
    pub fn new(base_url: impl AsRef<str>) -> AdminResult<Self> {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| AdminError::config(format!("BACKEND_URL '{}' is not a valid URL: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AdminError::config(format!("BACKEND_URL '{}' must use http or https", base_url)));
        }

        Ok(Self {
            base_url,
            anon_key: None,
            timeout: Duration::from_secs(30),
            log_requests: false,
        })
    }

    pub fn from_config(config: &AppConfig) -> AdminResult<Self> {
        let mut settings = Self::new(config.backend_url()?)?;
        settings.anon_key = config.backend.anon_key.clone();
        settings.timeout = Duration::from_secs(config.backend.timeout_secs);
        settings.log_requests = config.logging.log_requests;
        Ok(settings)
    }

    pub fn with_anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = Some(key.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// HTTP client carrying the `apikey` and bearer headers on every request
    pub(crate) fn http_client(&self) -> AdminResult<reqwest::Client> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &self.anon_key {
            let invalid = |_| AdminError::config("BACKEND_ANON_KEY contains characters not allowed in a header");
            headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid)?);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", key)).map_err(invalid)?,
            );
        }

        Ok(reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?)
    }
}

/// Error body returned by the hosted service, in either the table or the auth flavour
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub code: Option<String>,
}

impl ErrorBody {
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Self::parse(status.as_u16(), &text, status.canonical_reason().unwrap_or("request failed"))
    }

    fn parse(status: u16, text: &str, fallback: &str) -> Self {
        let body: Value = serde_json::from_str(text).unwrap_or(Value::Null);

        let message = ["message", "msg", "error_description", "error"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty() && body.is_null()))
            .unwrap_or_else(|| fallback.to_string());

        let code = match body.get("code").or_else(|| body.get("error_code")) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        Self { status, message, code }
    }
}

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use reqwest::Method;
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Config, ConfigError};
use crate::fixtures::reader::lookup;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{method} {url} failed: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("response body is not JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

// ============================================================================
// ApiResponse
// ============================================================================

/// A completed HTTP exchange: status, raw body, headers and round-trip time.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
    pub headers: BTreeMap<String, String>,
    pub elapsed: Duration,
}

impl ApiResponse {
    pub fn json(&self) -> Result<Value, ApiError> {
        serde_json::from_str(&self.body).map_err(ApiError::Decode)
    }

    /// Node at a dotted path (`user.username`), if the body is JSON and
    /// the path exists.
    pub fn json_path(&self, path: &str) -> Option<Value> {
        let root = self.json().ok()?;
        lookup(&root, path).ok().cloned()
    }

    /// String at a dotted path; non-string nodes are ignored.
    pub fn string_at(&self, path: &str) -> Option<String> {
        match self.json_path(path)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

// ============================================================================
// ApiClient
// ============================================================================

enum Body {
    Json(Value),
    Raw(String),
}

/// JSON-over-HTTP client bound to one base URL.
///
/// Sends `Content-Type` and `Accept: application/json` on every request
/// plus any headers added with [`ApiClient::set_header`].
pub struct ApiClient {
    http: Client,
    base_url: String,
    headers: BTreeMap<String, String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ApiError::Transport {
                method: Method::GET,
                url: base_url.clone(),
                source,
            })?;
        info!(%base_url, "API client initialized");
        Ok(ApiClient {
            http,
            base_url,
            headers: BTreeMap::new(),
        })
    }

    /// Client for `api.base.url.<environment>`.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let base_url = config.api_base_url().ok_or_else(|| {
            ConfigError::Missing(format!("api.base.url.{}", config.environment()))
        })?;
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_auth_token(&mut self, token: &str) {
        info!("setting bearer token");
        self.headers
            .insert("Authorization".into(), format!("Bearer {}", token));
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        info!(header = name, "setting header");
        self.headers.insert(name.to_string(), value.to_string());
    }

    pub fn set_headers<'h>(&mut self, headers: impl IntoIterator<Item = (&'h str, &'h str)>) {
        for (name, value) in headers {
            self.set_header(name, value);
        }
    }

    /// Drop all custom headers and the auth token.
    pub fn reset(&mut self) {
        info!("resetting request headers");
        self.headers.clear();
    }

    pub fn get(&self, endpoint: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::GET, endpoint, &[], None)
    }

    pub fn get_with_query(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<ApiResponse, ApiError> {
        self.send(Method::GET, endpoint, query, None)
    }

    pub fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<ApiResponse, ApiError> {
        self.send(Method::POST, endpoint, &[], Some(encode(body)?))
    }

    /// POST a pre-serialized JSON document as-is.
    pub fn post_raw(&self, endpoint: &str, json: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::POST, endpoint, &[], Some(Body::Raw(json.to_string())))
    }

    pub fn put<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<ApiResponse, ApiError> {
        self.send(Method::PUT, endpoint, &[], Some(encode(body)?))
    }

    pub fn patch<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<ApiResponse, ApiError> {
        self.send(Method::PATCH, endpoint, &[], Some(encode(body)?))
    }

    pub fn delete(&self, endpoint: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::DELETE, endpoint, &[], None)
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn send(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<Body>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url(endpoint);
        info!(%method, %url, "sending request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match body {
            Some(Body::Json(value)) => request.body(value.to_string()),
            Some(Body::Raw(raw)) => request.body(raw),
            None => request,
        };

        let transport = |source| ApiError::Transport {
            method: method.clone(),
            url: url.clone(),
            source,
        };

        let start = Instant::now();
        let response = request.send().map_err(transport)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.text().map_err(transport)?;
        let elapsed = start.elapsed();

        info!(%method, %url, status, elapsed_ms = elapsed.as_millis() as u64, "response received");
        debug!(body = %body, "response body");

        Ok(ApiResponse {
            status,
            body,
            headers,
            elapsed,
        })
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Body, ApiError> {
    serde_json::to_value(body)
        .map(Body::Json)
        .map_err(ApiError::Encode)
}

//! HTTP client for the platform REST API
//!
//! Wraps a single `reqwest::Client` so the connection pool is shared by every
//! request of a run. Each call is sent exactly once: there is no retry, no
//! backoff and no rate limiting. Any status outside 200-299 becomes
//! [`Error::Api`], connection and timeout failures become [`Error::Transport`].

use crate::auth::ApiKey;
use crate::config::PlatformConfig;
use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Path prefix of every REST endpoint
pub const API_PREFIX: &str = "api/v1";

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (JSON)
    pub body: Option<Value>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP client bound to one platform and one API key
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
    default_headers: HeaderMap,
}

impl HttpClient {
    /// Create a client from resolved configuration
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            default_headers: header_map(&config.default_headers, "http.headers")?,
        })
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.request(Method::GET, path, RequestConfig::default())
            .await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, path: &str, body: Value) -> Result<Response> {
        self.request(Method::POST, path, RequestConfig::default().json(body))
            .await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, path: &str, body: Value) -> Result<Response> {
        self.request(Method::PUT, path, RequestConfig::default().json(body))
            .await
    }

    /// Send one request and classify the response status.
    ///
    /// Returns the response only for 2xx statuses. The body of a failed
    /// response is read and carried in the error verbatim.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let full_url = self.build_url(path);
        let request_headers = header_map(&config.headers, "headers")?;

        let mut req = self
            .client
            .request(method.clone(), &full_url)
            .header(CONTENT_TYPE, "application/json")
            .headers(self.default_headers.clone())
            .headers(request_headers);
        req = self.api_key.apply(req)?;
        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        if let Some(ref body) = config.body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Failed to read error body from {}: {e}", full_url);
                    format!("<unreadable response body: {e}>")
                }
            };
            debug!("Request failed: {} {} -> {}", method, full_url, status.as_u16());
            return Err(Error::api(status.as_u16(), body));
        }

        debug!("Request succeeded: {} {}", method, full_url);
        Ok(response)
    }

    /// Make a request and parse the JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let response = self.request(method, path, config).await?;
        decode_json(response).await
    }

    /// Make a GET request and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_json(Method::GET, path, RequestConfig::default())
            .await
    }

    /// Make a POST request and parse the JSON response
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        self.request_json(Method::POST, path, RequestConfig::default().json(body))
            .await
    }

    /// Make a PUT request and parse the JSON response
    pub async fn put_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        self.request_json(Method::PUT, path, RequestConfig::default().json(body))
            .await
    }

    /// Make a GET request and return the raw body
    pub async fn get_bytes(&self, path: &str) -> Result<Bytes> {
        let response = self.get(path).await?;
        Ok(response.bytes().await?)
    }

    /// Build the full URL for an API path.
    ///
    /// Relative paths are placed under `<base>/api/v1/`; absolute URLs are
    /// used unchanged.
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let path = path.trim_start_matches('/');
        format!("{}/{API_PREFIX}/{path}", self.base_url)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("default_headers", &self.default_headers.keys())
            .finish_non_exhaustive()
    }
}

/// Validate string headers into a `HeaderMap`
fn header_map(headers: &HashMap<String, String>, field: &str) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| Error::invalid_value(field, format!("header name '{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::invalid_value(field, format!("header '{key}' value: {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Read a response body and parse it as JSON.
///
/// A body that isn't valid JSON for `T` is a schema problem, not a transport
/// one.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| Error::schema(format!("response body is not the expected JSON: {e}")))
}

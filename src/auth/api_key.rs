//! API key credential

use crate::error::{Error, Result};
use reqwest::header::HeaderValue;
use reqwest::RequestBuilder;
use serde::Deserialize;
use std::fmt;

/// Header carrying the API key on every request
pub const API_KEY_HEADER: &str = "x-api-key";

/// Opaque API key attached to every request.
///
/// `Debug` and `Display` are redacted so the key can't leak through logs or
/// error messages.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a key, rejecting values that can't be sent as a header
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::missing_field("api_key"));
        }
        if HeaderValue::from_str(trimmed).is_err() {
            return Err(Error::invalid_value(
                "api_key",
                "contains characters that are not valid in an HTTP header",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw key. Only the HTTP layer should need this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Header value for the key, flagged sensitive so it is masked in
    /// reqwest's own debug output
    pub fn header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.0)
            .map_err(|e| Error::invalid_value("api_key", e.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Attach the key to a request
    pub fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        Ok(req.header(API_KEY_HEADER, self.header_value()?))
    }
}

impl TryFrom<String> for ApiKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

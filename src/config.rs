//! Platform configuration
//!
//! Configuration is read once at process start and then handed, immutable, to
//! the client constructors. Sources, lowest precedence first:
//!
//! 1. a config file (TOML or YAML) with a `platform` table, either given
//!    explicitly or found at `conf/config.toml`
//! 2. explicit overrides (CLI flags / `RISKSENSE_*` environment variables)
//!
//! ```toml
//! [platform]
//! url = "https://platform.risksense.com"
//! api_key = "..."
//! client_id = 123
//!
//! [http]
//! timeout_secs = 60
//! ```

use crate::auth::ApiKey;
use crate::error::{Error, Result};
use crate::types::ClientId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Platform URL used when none is configured
pub const DEFAULT_PLATFORM_URL: &str = "https://platform.risksense.com";

/// Config file looked up, relative to the working directory, when none is given
pub const DEFAULT_CONFIG_PATH: &str = "conf/config.toml";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// File Format
// ============================================================================

/// Raw contents of a config file. Every field is optional so that a file may
/// be completed by overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Platform connection settings
    #[serde(default)]
    pub platform: PlatformSection,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSection,
}

/// `[platform]` table
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PlatformSection {
    /// Base URL of the platform
    #[serde(default)]
    pub url: Option<String>,

    /// API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Client (tenant) to operate on
    #[serde(default)]
    pub client_id: Option<ClientId>,
}

impl std::fmt::Debug for PlatformSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformSection")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// `[http]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpSection {
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ConfigFile {
    /// Load a config file, picking the parser from the extension.
    ///
    /// `.yaml`/`.yml` are parsed as YAML, anything else as TOML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Load `conf/config.toml` under `dir` if it exists
    pub fn discover(dir: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = dir.as_ref().join(DEFAULT_CONFIG_PATH);
        if path.is_file() {
            Self::from_path(&path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Parse TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse YAML content
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

// ============================================================================
// Overrides
// ============================================================================

/// Values supplied outside the config file. Set fields win over the file.
#[derive(Default, Clone)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub client_id: Option<ClientId>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Resolved Config
// ============================================================================

/// Resolved, validated configuration
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Base URL of the platform (no `/api/v1` suffix)
    pub base_url: Url,
    /// API key sent with every request
    pub api_key: ApiKey,
    /// Client (tenant) operations are scoped to, when one is configured
    pub client_id: Option<ClientId>,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Extra headers sent with every request
    pub default_headers: HashMap<String, String>,
}

impl PlatformConfig {
    /// Create a config for the given platform URL and API key
    pub fn new(url: &str, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(url)?,
            api_key: ApiKey::new(api_key)?,
            client_id: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            default_headers: HashMap::new(),
        })
    }

    /// Set the client id
    #[must_use]
    pub fn with_client_id(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header sent with every request
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Merge an optional config file with overrides and validate the result
    pub fn resolve(file: Option<ConfigFile>, overrides: ConfigOverrides) -> Result<Self> {
        let file = file.unwrap_or_default();

        let url = overrides
            .url
            .or(file.platform.url)
            .unwrap_or_else(|| DEFAULT_PLATFORM_URL.to_string());
        let api_key = overrides
            .api_key
            .or(file.platform.api_key)
            .ok_or_else(|| Error::missing_field("api_key"))?;

        let mut config = Self::new(&url, api_key)?;
        config.client_id = overrides.client_id.or(file.platform.client_id);

        if let Some(secs) = overrides.timeout_secs.or(file.http.timeout_secs) {
            if secs == 0 {
                return Err(Error::invalid_value("timeout_secs", "must be greater than 0"));
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = file.http.user_agent {
            config.user_agent = agent;
        }
        config.default_headers = file.http.headers;

        Ok(config)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_value(
            "url",
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() {
        return Err(Error::invalid_value("url", "not a base URL"));
    }
    Ok(url)
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

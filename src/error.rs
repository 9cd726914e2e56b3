//! Error types for the RiskSense client
//!
//! Every public API returns `Result<T, Error>`. A failure is terminal for the
//! call that produced it: nothing in this crate retries or recovers locally.
//! Deciding whether to abort the process is left to the caller (see `main.rs`).

use thiserror::Error;

/// The main error type for the RiskSense client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid filter '{input}': {message}")]
    InvalidFilter { input: String, message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("Request failed{}: {source}", page_suffix(.page))]
    Transport {
        page: Option<u32>,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status}{}: {body}", page_suffix(.page))]
    Api {
        status: u16,
        body: String,
        page: Option<u32>,
    },

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("Unexpected response shape{}: {message}", page_suffix(.page))]
    Schema { message: String, page: Option<u32> },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

fn page_suffix(page: &Option<u32>) -> String {
    page.map(|p| format!(" on page {p}")).unwrap_or_default()
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport { page: None, source }
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid filter error
    pub fn invalid_filter(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create an API status error that is not tied to a page
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
            page: None,
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
            page: None,
        }
    }

    /// Attach the page index that was being fetched when this error occurred.
    ///
    /// Only transport, API status and schema errors carry a page; other kinds
    /// are returned unchanged.
    #[must_use]
    pub fn at_page(self, page: u32) -> Self {
        match self {
            Self::Transport { source, .. } => Self::Transport {
                page: Some(page),
                source,
            },
            Self::Api { status, body, .. } => Self::Api {
                status,
                body,
                page: Some(page),
            },
            Self::Schema { message, .. } => Self::Schema {
                message,
                page: Some(page),
            },
            other => other,
        }
    }

    /// Page index the failing request was for, if any
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Transport { page, .. } | Self::Api { page, .. } | Self::Schema { page, .. } => {
                *page
            }
            _ => None,
        }
    }

    /// HTTP status returned by the platform, if the failure was a status error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the platform rejected the request (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (400..500).contains(status))
    }
}

/// Result type alias for the RiskSense client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

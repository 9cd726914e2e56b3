// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # RiskSense Client
//!
//! Async client and CLI for the RiskSense vulnerability-management REST API.
//!
//! ## Features
//!
//! - **Paginated Search**: Fetch every page of a `*/search` endpoint as one list
//! - **Resource Catalogue**: Hosts, host findings, users, tags, groups, networks, applications
//! - **Client Operations**: Networks, host group moves, saved filters, host finding exports
//! - **Layered Config**: TOML/YAML file, then environment, then flags
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use risksense_client::{Filter, PlatformClient, PlatformConfig, Resource, SearchRequest};
//!
//! #[tokio::main]
//! async fn main() -> risksense_client::Result<()> {
//!     let config = PlatformConfig::new("https://platform.risksense.com", "api-key")?
//!         .with_client_id(1234);
//!     let client = PlatformClient::new(&config)?;
//!
//!     let request = SearchRequest::new().filter(Filter::exact("generic_state", "Open"));
//!     let findings = client.search(Resource::HostFinding, request).await?;
//!     println!("{} open host findings", findings.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        PlatformClient                           │
//! │  list_clients()   search(resource)   networks   exports         │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌────────────┬─────────────────┴───────┬──────────────────────────┐
//! │   Config   │      SearchClient       │        Resources         │
//! ├────────────┼─────────────────────────┼──────────────────────────┤
//! │ TOML/YAML  │ search_page()           │ path + _embedded key     │
//! │ Env/flags  │ search_all() → Vec      │ per resource type        │
//! └────────────┴─────────────────────────┴──────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴──────────────────────────────────┐
//! │              HttpClient (x-api-key, JSON, no retry)             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// API key handling
pub mod auth;

/// Configuration file and override resolution
pub mod config;

/// HTTP client for the platform API
pub mod http;

/// Paginated search
pub mod search;

/// Searchable resource catalogue
pub mod resources;

/// Client-scoped platform operations
pub mod platform;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::ApiKey;
pub use config::{ConfigFile, ConfigOverrides, PlatformConfig};
pub use http::HttpClient;
pub use platform::PlatformClient;
pub use resources::Resource;
pub use search::{Filter, SearchClient, SearchEndpoint, SearchPage, SearchRequest, Sort};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

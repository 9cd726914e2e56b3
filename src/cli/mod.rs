//! CLI module
//!
//! Command-line interface for the RiskSense platform.
//!
//! # Commands
//!
//! - `clients` - List clients visible to the API key
//! - `client` - Show the configured client
//! - `search` - Fetch every item of a resource matching filters
//! - `create-network` / `update-network` - Manage networks
//! - `move-hosts` - Move matching hosts into a group
//! - `saved-filters` - List saved host finding filters
//! - `export-host-findings` - Export host findings and download the file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, DEFAULT_EXPORT_WAIT_SECS};
pub use runner::Runner;

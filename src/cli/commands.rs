//! CLI commands and argument parsing

use crate::resources::Resource;
use crate::search::{Filter, DEFAULT_PAGE_SIZE};
use crate::types::{ClientId, ExportFileType, NetworkType, Projection};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Seconds to wait for the platform to generate an export
pub const DEFAULT_EXPORT_WAIT_SECS: u64 = 90;

/// RiskSense platform CLI
#[derive(Parser, Debug)]
#[command(name = "risksense")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML or YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Platform URL
    #[arg(long, global = true, env = "RISKSENSE_URL")]
    pub url: Option<String>,

    /// API key
    #[arg(long, global = true, env = "RISKSENSE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Client id
    #[arg(long, global = true, env = "RISKSENSE_CLIENT_ID")]
    pub client_id: Option<ClientId>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List clients the API key has access to
    Clients {
        /// Page size of the client listing
        #[arg(long, default_value_t = crate::platform::DEFAULT_CLIENT_PAGE_SIZE)]
        page_size: u32,
    },

    /// Show the configured client
    Client,

    /// Search a resource and print every matching item
    Search {
        /// Resource to search
        resource: Resource,

        /// Filter as `field:OPERATOR:value` (repeatable, prefix `!` to exclude)
        #[arg(long = "filter")]
        filters: Vec<Filter>,

        /// Field to sort by
        #[arg(long, default_value = "id")]
        sort: String,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Projection
        #[arg(long, default_value = "basic")]
        projection: Projection,

        /// Items per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Search every client visible to the API key
        #[arg(long)]
        all_clients: bool,
    },

    /// Create a network
    CreateNetwork {
        /// Network name
        #[arg(long)]
        name: String,

        /// Network type
        #[arg(long = "type", default_value = "ip", ignore_case = true)]
        network_type: NetworkType,
    },

    /// Rename a network
    UpdateNetwork {
        /// Network id
        #[arg(long)]
        network_id: u64,

        /// New network name
        #[arg(long)]
        name: String,
    },

    /// Move hosts matching the filters into a group
    MoveHosts {
        /// Target group id
        #[arg(long)]
        group_id: u64,

        /// Filter as `field:OPERATOR:value` (repeatable)
        #[arg(long = "filter", required = true)]
        filters: Vec<Filter>,
    },

    /// List saved host finding filters
    SavedFilters,

    /// Export host findings and download the generated file
    ExportHostFindings {
        /// Name of the export on the platform
        #[arg(long)]
        file_name: String,

        /// Export format
        #[arg(long, default_value = "csv", ignore_case = true)]
        file_type: ExportFileType,

        /// Filter as `field:OPERATOR:value` (repeatable)
        #[arg(long = "filter")]
        filters: Vec<Filter>,

        /// Seconds to wait before downloading
        #[arg(long, default_value_t = DEFAULT_EXPORT_WAIT_SECS)]
        wait_secs: u64,

        /// Where to write the file (defaults to `<file-name>.zip`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable output
    Pretty,
}

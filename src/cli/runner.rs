//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{ConfigFile, ConfigOverrides, PlatformConfig};
use crate::error::Result;
use crate::platform::{PlatformClient, DEFAULT_CLIENT_PAGE_SIZE};
use crate::resources::Resource;
use crate::search::{Filter, SearchRequest, Sort};
use crate::types::{ExportFileType, NetworkType};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = PlatformClient::new(&self.load_config()?)?;

        match &self.cli.command {
            Commands::Clients { page_size } => self.clients(&client, *page_size).await,
            Commands::Client => self.client(&client).await,
            Commands::Search {
                resource,
                filters,
                sort,
                desc,
                projection,
                page_size,
                all_clients,
            } => {
                let sort = if *desc {
                    Sort::desc(sort.as_str())
                } else {
                    Sort::asc(sort.as_str())
                };
                let request = SearchRequest::new()
                    .filters(filters.iter().cloned())
                    .sort(sort)
                    .projection(*projection)
                    .page_size(*page_size);
                self.search(&client, *resource, request, *all_clients).await
            }
            Commands::CreateNetwork { name, network_type } => {
                self.create_network(&client, name, *network_type).await
            }
            Commands::UpdateNetwork { network_id, name } => {
                let network = client.update_network(*network_id, name).await?;
                self.output(&network);
                Ok(())
            }
            Commands::MoveHosts { group_id, filters } => {
                client.move_hosts_to_group(filters, *group_id).await?;
                self.output(&json!({ "moved": true, "targetGroupId": group_id }));
                Ok(())
            }
            Commands::SavedFilters => {
                let filters = client.saved_host_finding_filters().await?;
                self.output_items(&filters);
                Ok(())
            }
            Commands::ExportHostFindings {
                file_name,
                file_type,
                filters,
                wait_secs,
                output,
            } => {
                let target = output
                    .clone()
                    .unwrap_or_else(|| default_export_path(file_name));
                self.export_host_findings(&client, filters, *file_type, file_name, *wait_secs, &target)
                    .await
            }
        }
    }

    /// Merge the config file with flags and environment
    fn load_config(&self) -> Result<PlatformConfig> {
        let file = match &self.cli.config {
            Some(path) => Some(ConfigFile::from_path(path)?),
            None => ConfigFile::discover(".")?,
        };
        let overrides = ConfigOverrides {
            url: self.cli.url.clone(),
            api_key: self.cli.api_key.clone(),
            client_id: self.cli.client_id,
            timeout_secs: self.cli.timeout,
        };
        PlatformConfig::resolve(file, overrides)
    }

    async fn clients(&self, client: &PlatformClient, page_size: u32) -> Result<()> {
        let clients = client.list_clients(page_size).await?;
        info!("{} clients available", clients.len());
        self.output_items(&clients);
        Ok(())
    }

    async fn client(&self, client: &PlatformClient) -> Result<()> {
        let client_id = client.require_client_id()?;
        let details = client.get_client(client_id).await?;
        self.output(&details);
        Ok(())
    }

    async fn search(
        &self,
        client: &PlatformClient,
        resource: Resource,
        request: SearchRequest,
        all_clients: bool,
    ) -> Result<()> {
        if !all_clients {
            let items = client.search(resource, request).await?;
            info!("Found {} {resource}", items.len());
            self.output_items(&items);
            return Ok(());
        }

        let client_ids = client.list_client_ids(DEFAULT_CLIENT_PAGE_SIZE).await?;
        info!("Searching {resource} across {} clients", client_ids.len());

        for client_id in client_ids {
            let items = client
                .for_client(client_id)
                .search(resource, request.clone())
                .await?;
            info!("Found {} {resource} for client id {client_id}", items.len());
            self.output_items(&items);
        }
        Ok(())
    }

    async fn create_network(
        &self,
        client: &PlatformClient,
        name: &str,
        network_type: NetworkType,
    ) -> Result<()> {
        let network = client.create_network(name, network_type).await?;
        self.output(&network);
        Ok(())
    }

    async fn export_host_findings(
        &self,
        client: &PlatformClient,
        filters: &[Filter],
        file_type: ExportFileType,
        file_name: &str,
        wait_secs: u64,
        target: &Path,
    ) -> Result<()> {
        let export_id = client
            .initiate_host_finding_export(filters, file_type, file_name)
            .await?;

        for remaining in (1..=wait_secs).rev() {
            if remaining % 10 == 0 || remaining == wait_secs {
                info!("Waiting {remaining}s for export {export_id} to be generated");
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        let written = client.download_export_to(export_id, target).await?;
        self.output(&json!({
            "exportId": export_id,
            "path": target.display().to_string(),
            "bytes": written,
        }));
        Ok(())
    }

    /// Print one value
    fn output(&self, value: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(value).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            }
        }
    }

    /// Print a list of values, one per line in JSON mode
    fn output_items(&self, items: &[Value]) {
        for item in items {
            self.output(item);
        }
    }
}

/// Download target when none is given. Host finding exports are zip archives.
pub(crate) fn default_export_path(file_name: &str) -> PathBuf {
    PathBuf::from(format!("{file_name}.zip"))
}

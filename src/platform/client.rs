//! Platform client

use crate::config::PlatformConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClient, RequestConfig};
use crate::resources::Resource;
use crate::search::{Filter, SearchClient, SearchRequest};
use crate::types::{ClientId, ExportFileType, JsonValue, NetworkType};
use bytes::Bytes;
use chrono::{Local, NaiveDate};
use reqwest::Method;
use serde_json::json;
use std::path::Path;
use tracing::{debug, info};

/// Page size used when listing clients
pub const DEFAULT_CLIENT_PAGE_SIZE: u32 = 500;

/// Operations against one platform on behalf of one API key
#[derive(Debug, Clone)]
pub struct PlatformClient {
    search: SearchClient,
    client_id: Option<ClientId>,
}

impl PlatformClient {
    /// Create a platform client from resolved configuration
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        Ok(Self {
            search: SearchClient::from_config(config)?,
            client_id: config.client_id,
        })
    }

    /// Scope subsequent client operations to another client id
    #[must_use]
    pub fn for_client(&self, client_id: ClientId) -> Self {
        Self {
            search: self.search.clone(),
            client_id: Some(client_id),
        }
    }

    /// Configured client id, if any
    pub fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }

    /// Underlying search client
    pub fn search_client(&self) -> &SearchClient {
        &self.search
    }

    fn http(&self) -> &HttpClient {
        self.search.http()
    }

    /// Configured client id, or an error naming the missing field
    pub fn require_client_id(&self) -> Result<ClientId> {
        self.client_id.ok_or_else(|| Error::missing_field("client_id"))
    }

    // ========================================================================
    // Clients
    // ========================================================================

    /// List the clients the API key has access to
    pub async fn list_clients(&self, page_size: u32) -> Result<Vec<JsonValue>> {
        let body: JsonValue = self
            .http()
            .request_json(
                Method::GET,
                "client",
                RequestConfig::new().query("size", page_size),
            )
            .await?;

        let clients = body
            .pointer("/_embedded/clients")
            .and_then(JsonValue::as_array)
            .cloned()
            .ok_or_else(|| Error::schema("client list has no '_embedded.clients' array"))?;

        debug!("Listed {} clients", clients.len());
        Ok(clients)
    }

    /// Ids of all clients visible to the API key
    pub async fn list_client_ids(&self, page_size: u32) -> Result<Vec<ClientId>> {
        self.list_clients(page_size)
            .await?
            .iter()
            .map(|client| {
                client
                    .get("id")
                    .and_then(JsonValue::as_u64)
                    .ok_or_else(|| Error::schema("client entry has no numeric 'id'"))
            })
            .collect()
    }

    /// Fetch one client's details
    pub async fn get_client(&self, client_id: ClientId) -> Result<JsonValue> {
        self.http().get_json(&format!("client/{client_id}")).await
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Fetch every item of `resource` matching the request
    pub async fn search(&self, resource: Resource, request: SearchRequest) -> Result<Vec<JsonValue>> {
        let client_id = self.require_client_id()?;
        self.search
            .search_all(&resource.endpoint(client_id), request)
            .await
    }

    // ========================================================================
    // Networks
    // ========================================================================

    /// Create a network
    pub async fn create_network(&self, name: &str, network_type: NetworkType) -> Result<JsonValue> {
        let client_id = self.require_client_id()?;
        let body = json!({ "name": name, "type": network_type });

        let network: JsonValue = self
            .http()
            .request_json(
                Method::POST,
                &format!("client/{client_id}/network"),
                uncached().json(body),
            )
            .await?;
        info!("Created network '{name}' for client id {client_id}");
        Ok(network)
    }

    /// Rename a network
    pub async fn update_network(&self, network_id: u64, name: &str) -> Result<JsonValue> {
        let client_id = self.require_client_id()?;
        let body = json!({ "name": name });

        let network: JsonValue = self
            .http()
            .request_json(
                Method::PUT,
                &format!("client/{client_id}/network/{network_id}"),
                uncached().json(body),
            )
            .await?;
        info!("Renamed network {network_id} to '{name}'");
        Ok(network)
    }

    // ========================================================================
    // Hosts
    // ========================================================================

    /// Move every host matching `filters` into a group
    pub async fn move_hosts_to_group(&self, filters: &[Filter], group_id: u64) -> Result<()> {
        let client_id = self.require_client_id()?;
        let body = json!({
            "filterRequest": { "filters": filters },
            "targetGroupId": group_id,
        });

        self.http()
            .post(&format!("client/{client_id}/host/group/move"), body)
            .await?;
        info!("Moved matching hosts to group {group_id}");
        Ok(())
    }

    // ========================================================================
    // Host Findings
    // ========================================================================

    /// Saved host finding filters of the client
    pub async fn saved_host_finding_filters(&self) -> Result<Vec<JsonValue>> {
        let client_id = self.require_client_id()?;
        let body: JsonValue = self
            .http()
            .get_json(&format!("client/{client_id}/search/hostFinding/filter"))
            .await?;

        Ok(body
            .get("filters")
            .and_then(JsonValue::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// Start an export of host findings. Returns the export id.
    ///
    /// The platform generates the file asynchronously; poll with
    /// [`download_export`](Self::download_export) after a wait.
    pub async fn initiate_host_finding_export(
        &self,
        filters: &[Filter],
        file_type: ExportFileType,
        file_name: &str,
    ) -> Result<u64> {
        let client_id = self.require_client_id()?;
        let body = json!({
            "filterRequest": { "filters": filters },
            "fileType": file_type,
            "comment": export_comment(Local::now().date_naive()),
            "fileName": file_name,
        });

        let response: JsonValue = self
            .http()
            .request_json(
                Method::POST,
                &format!("client/{client_id}/hostFinding/export"),
                uncached().json(body),
            )
            .await?;

        let export_id = response
            .get("id")
            .and_then(JsonValue::as_u64)
            .ok_or_else(|| Error::schema("export response has no numeric 'id'"))?;
        info!("Export {export_id} initiated for client id {client_id}");
        Ok(export_id)
    }

    /// Download a generated export
    pub async fn download_export(&self, export_id: u64) -> Result<Bytes> {
        let client_id = self.require_client_id()?;
        self.http()
            .get_bytes(&format!("client/{client_id}/export/{export_id}"))
            .await
    }

    /// Download a generated export into `path`. Returns the bytes written.
    pub async fn download_export_to(&self, export_id: u64, path: impl AsRef<Path>) -> Result<u64> {
        let content = self.download_export(export_id).await?;
        tokio::fs::write(path.as_ref(), &content)
            .await
            .with_context(|| format!("Failed to write export to {}", path.as_ref().display()))?;
        info!("Wrote export {export_id} to {}", path.as_ref().display());
        Ok(content.len() as u64)
    }
}

/// Request config for calls that change server state
fn uncached() -> RequestConfig {
    RequestConfig::new().header("Cache-Control", "no-cache")
}

/// Comment attached to a host finding export created on `date`
pub fn export_comment(date: NaiveDate) -> String {
    format!("Host Finding Export for {}", date.format("%Y-%m-%d"))
}

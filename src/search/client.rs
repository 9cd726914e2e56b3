//! Paginated search client

use super::pagination::{NextPage, PageCursor};
use super::types::{SearchEndpoint, SearchPage, SearchRequest};
use crate::config::PlatformConfig;
use crate::error::Result;
use crate::http::{decode_json, HttpClient};
use crate::types::JsonValue;
use tracing::{debug, info};

/// Runs searches against `*/search` endpoints and aggregates their pages
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: HttpClient,
}

impl SearchClient {
    /// Create a search client on top of an existing HTTP client
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Create a search client from configuration
    pub fn from_config(config: &PlatformConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::new(config)?))
    }

    /// Get the underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Fetch the single page named by `request.page`.
    ///
    /// Transport, status and schema errors carry `request.page`.
    pub async fn search_page(
        &self,
        endpoint: &SearchEndpoint,
        request: &SearchRequest,
    ) -> Result<SearchPage> {
        let body = serde_json::to_value(request)?;
        let response = self
            .http
            .post(&endpoint.url_path(), body)
            .await
            .map_err(|e| e.at_page(request.page))?;
        let json: JsonValue = decode_json(response)
            .await
            .map_err(|e| e.at_page(request.page))?;

        SearchPage::from_body(&json, &endpoint.container_key).map_err(|e| e.at_page(request.page))
    }

    /// Fetch every page of a search and concatenate the items.
    ///
    /// Pages are requested one at a time in ascending order starting at 0.
    /// The first response fixes `total_pages`; later responses' counts are
    /// ignored (see [`PageCursor`]). A report of zero pages returns an empty
    /// list after that single request.
    ///
    /// Any failure aborts the whole search and discards the items gathered so
    /// far. Nothing is retried.
    pub async fn search_all(
        &self,
        endpoint: &SearchEndpoint,
        mut request: SearchRequest,
    ) -> Result<Vec<JsonValue>> {
        let mut cursor = PageCursor::new();
        let mut results = Vec::new();
        let mut next_page = cursor.next_page();

        while let Some(page) = next_page {
            request.page = page;
            let fetched = self.search_page(endpoint, &request).await?;
            let total = cursor.total_pages().unwrap_or(fetched.info.total_pages);

            if total > 0 {
                info!(
                    "Fetched page {}/{} of {} for client id {}",
                    page + 1,
                    total,
                    endpoint.container_key,
                    endpoint.client_id
                );
            }

            let (items, next) = cursor.record(fetched);
            debug!("Page {page}: {} items", items.len());
            results.extend(items);

            next_page = match next {
                NextPage::Continue(index) => Some(index),
                NextPage::Done => None,
            };
        }

        debug!(
            "Search of {} finished: {} items in {} requests",
            endpoint.url_path(),
            cursor.items_fetched(),
            cursor.pages_fetched()
        );
        Ok(results)
    }
}

//! Search request and response types
//!
//! Wire shapes for the platform's `*/search` endpoints:
//!
//! ```text
//! POST /api/v1/client/{clientId}/{resource}/search
//! { "filters": [...], "projection": "basic", "sort": [...], "page": 0, "size": 100 }
//!
//! 200 OK
//! { "_embedded": { "<containerKey>": [...] }, "page": { "totalPages": 3, ... } }
//! ```

use crate::error::{Error, Result};
use crate::types::{ClientId, FilterOperator, JsonValue, Projection, SortDirection};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Page size used when the caller doesn't pick one
pub const DEFAULT_PAGE_SIZE: u32 = 100;

// ============================================================================
// Endpoint
// ============================================================================

/// Where a search is sent and where its items live in the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEndpoint {
    /// Client (tenant) the search is scoped to
    pub client_id: ClientId,
    /// Resource path segment under the client, e.g. `host/search`
    pub path: String,
    /// Key under `_embedded` holding the items, e.g. `hosts`
    pub container_key: String,
}

impl SearchEndpoint {
    /// Create an endpoint descriptor
    pub fn new(
        client_id: ClientId,
        path: impl Into<String>,
        container_key: impl Into<String>,
    ) -> Self {
        Self {
            client_id,
            path: path.into(),
            container_key: container_key.into(),
        }
    }

    /// Path relative to the API root
    pub fn url_path(&self) -> String {
        format!(
            "client/{}/{}",
            self.client_id,
            self.path.trim_start_matches('/')
        )
    }
}

// ============================================================================
// Filters
// ============================================================================

/// One search filter. A request's filters are ANDed by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Field name, e.g. `criticality`
    pub field: String,
    /// Negates the filter
    pub exclusive: bool,
    /// Comparison operator
    pub operator: FilterOperator,
    /// Comparison value, always sent as a string
    pub value: String,
}

impl Filter {
    /// Create an inclusive filter
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            exclusive: false,
            operator,
            value: value.into(),
        }
    }

    /// `field EXACT value`
    pub fn exact(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Exact, value)
    }

    /// `field LIKE value`
    pub fn like(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Like, value)
    }

    /// Mark the filter exclusive
    #[must_use]
    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }
}

/// Parses `field:OPERATOR:value`. A leading `!` makes the filter exclusive.
/// The value may itself contain `:`.
impl FromStr for Filter {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let (exclusive, rest) = match input.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, input),
        };

        let mut parts = rest.splitn(3, ':');
        let field = parts.next().unwrap_or_default().trim();
        let operator = parts.next();
        let value = parts.next();

        let (Some(operator), Some(value)) = (operator, value) else {
            return Err(Error::invalid_filter(input, "expected field:OPERATOR:value"));
        };
        if field.is_empty() {
            return Err(Error::invalid_filter(input, "field name is empty"));
        }
        let operator = operator
            .trim()
            .parse::<FilterOperator>()
            .map_err(|e| Error::invalid_filter(input, e))?;

        Ok(Self {
            field: field.to_string(),
            exclusive,
            operator,
            value: value.to_string(),
        })
    }
}

// ============================================================================
// Sort
// ============================================================================

/// Sort key and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    /// Ascending sort on `field`
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on `field`
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::asc("id")
    }
}

// ============================================================================
// Request
// ============================================================================

/// Body of a search call.
///
/// Built once per search; only `page` changes as pagination advances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub filters: Vec<Filter>,
    pub projection: Projection,
    pub sort: Vec<Sort>,
    pub page: u32,
    pub size: u32,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            projection: Projection::Basic,
            sort: vec![Sort::default()],
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchRequest {
    /// Request with no filters, `id ASC`, basic projection, default page size
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add several filters, keeping their order
    #[must_use]
    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Replace the sort order
    #[must_use]
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = vec![sort];
        self
    }

    /// Set the projection
    #[must_use]
    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Set the page size. Not checked against any server maximum.
    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }
}

// ============================================================================
// Response
// ============================================================================

/// `page` block of a search response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
}

/// One decoded page of search results
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    /// Items in server order
    pub items: Vec<JsonValue>,
    /// Page metadata
    pub info: PageInfo,
}

impl SearchPage {
    /// Decode a search response body.
    ///
    /// `page.totalPages` is required. `_embedded` may be absent only when the
    /// response reports zero pages (the platform omits it for empty results);
    /// otherwise a missing or non-array `_embedded.<container_key>` is a
    /// schema error.
    pub fn from_body(body: &JsonValue, container_key: &str) -> Result<Self> {
        let page = body
            .get("page")
            .ok_or_else(|| Error::schema("response has no 'page' object"))?;
        if page.get("totalPages").is_none() {
            return Err(Error::schema("response has no 'page.totalPages'"));
        }
        let info: PageInfo = serde_json::from_value(page.clone())
            .map_err(|e| Error::schema(format!("invalid 'page' object: {e}")))?;

        let Some(embedded) = body.get("_embedded") else {
            if info.total_pages == 0 {
                return Ok(Self {
                    items: Vec::new(),
                    info,
                });
            }
            return Err(Error::schema("response has no '_embedded' object"));
        };

        let items = embedded
            .get(container_key)
            .ok_or_else(|| Error::schema(format!("response has no '_embedded.{container_key}'")))?
            .as_array()
            .ok_or_else(|| Error::schema(format!("'_embedded.{container_key}' is not an array")))?
            .clone();

        Ok(Self { items, info })
    }
}

//! Common types used throughout the client
//!
//! Shared enums and type aliases that appear in wire payloads, CLI flags and
//! configuration alike.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Identifier of a client (tenant) on the platform
pub type ClientId = u64;

// ============================================================================
// Projection
// ============================================================================

/// Server-side field-set selector for search results
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// Reduced field set
    #[default]
    Basic,
    /// Full field set (not offered by every resource, e.g. networks)
    Detail,
}

// ============================================================================
// Sorting
// ============================================================================

/// Sort direction for search requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

// ============================================================================
// Filter Operator
// ============================================================================

/// Comparison operator of a search filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterOperator {
    Exact,
    Like,
    In,
    Wildcard,
    Range,
}

impl FilterOperator {
    /// Wire name of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "EXACT",
            Self::Like => "LIKE",
            Self::In => "IN",
            Self::Wildcard => "WILDCARD",
            Self::Range => "RANGE",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EXACT" => Ok(Self::Exact),
            "LIKE" => Ok(Self::Like),
            "IN" => Ok(Self::In),
            "WILDCARD" => Ok(Self::Wildcard),
            "RANGE" => Ok(Self::Range),
            other => Err(format!("unknown operator '{other}'")),
        }
    }
}

// ============================================================================
// Network Type
// ============================================================================

/// Addressing type of a network
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum NetworkType {
    #[default]
    Ip,
    Hostname,
}

// ============================================================================
// Export File Type
// ============================================================================

/// File format requested for an export
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExportFileType {
    #[default]
    Csv,
    Xml,
    Xlsx,
}

//! Searchable resource types
//!
//! Each resource lives under `client/{clientId}/<name>/search` and nests its
//! items under a resource-specific `_embedded` key.

use crate::search::SearchEndpoint;
use crate::types::ClientId;
use std::fmt;

/// A resource collection that supports paginated search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Resource {
    Host,
    HostFinding,
    User,
    Tag,
    Group,
    Network,
    Application,
    ApplicationFinding,
}

impl Resource {
    /// All searchable resources
    pub const ALL: [Resource; 8] = [
        Self::Host,
        Self::HostFinding,
        Self::User,
        Self::Tag,
        Self::Group,
        Self::Network,
        Self::Application,
        Self::ApplicationFinding,
    ];

    /// Resource name as used in URL paths
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::HostFinding => "hostFinding",
            Self::User => "user",
            Self::Tag => "tag",
            Self::Group => "group",
            Self::Network => "network",
            Self::Application => "application",
            Self::ApplicationFinding => "applicationFinding",
        }
    }

    /// Search path relative to the client
    pub fn search_path(&self) -> String {
        format!("{}/search", self.path_segment())
    }

    /// Key under `_embedded` holding the items
    pub fn container_key(&self) -> &'static str {
        match self {
            Self::Host => "hosts",
            Self::HostFinding => "hostFindings",
            Self::User => "users",
            Self::Tag => "tags",
            Self::Group => "groups",
            Self::Network => "networks",
            Self::Application => "applications",
            Self::ApplicationFinding => "applicationFindings",
        }
    }

    /// Search endpoint for this resource within a client
    pub fn endpoint(&self, client_id: ClientId) -> SearchEndpoint {
        SearchEndpoint::new(client_id, self.search_path(), self.container_key())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.container_key())
    }
}

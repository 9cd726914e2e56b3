//! Client-scoped platform operations
//!
//! [`PlatformClient`] binds an HTTP client to a configured client id and
//! exposes the operations used by the CLI: listing clients, searching any
//! [`Resource`](crate::resources::Resource), managing networks, moving hosts
//! between groups and exporting host findings.

mod client;

pub use client::{export_comment, PlatformClient, DEFAULT_CLIENT_PAGE_SIZE};

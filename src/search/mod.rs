//! Paginated search
//!
//! Every list operation of the platform (hosts, host findings, users, tags,
//! groups, networks, ...) is a POST to a `*/search` endpoint that returns one
//! page of items under `_embedded.<containerKey>` plus a `page.totalPages`
//! count. [`SearchClient::search_all`] walks those pages in order and returns
//! the concatenated items, or a single error.

mod client;
mod pagination;
mod types;

pub use client::SearchClient;
pub use pagination::{NextPage, PageCursor};
pub use types::{
    Filter, PageInfo, SearchEndpoint, SearchPage, SearchRequest, Sort, DEFAULT_PAGE_SIZE,
};

#[cfg(test)]
mod tests;

//! Page cursor for search pagination
//!
//! The platform reports `page.totalPages` on every response. The cursor reads
//! it from the first response only and never reconciles it with later pages.
//! If the underlying data set grows or shrinks mid-iteration, the aggregated
//! result can miss or repeat items, or a late page can come back without its
//! `_embedded` block.

use super::types::SearchPage;
use crate::types::JsonValue;

/// What to do after a page has been recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Request this page index next
    Continue(u32),
    /// All pages fetched
    Done,
}

/// Tracks progress through a paginated search
#[derive(Debug, Clone, Default)]
pub struct PageCursor {
    /// Index of the page to request next
    next: u32,
    /// Bound fixed by the first response
    total_pages: Option<u32>,
    /// Pages recorded so far
    pages_fetched: u32,
    /// Items accepted into the result so far
    items_fetched: u64,
}

impl PageCursor {
    /// Create a cursor positioned on page 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Page to request next, or `None` once the fixed bound is reached.
    ///
    /// Before any page is recorded this is always `Some(0)`: the first request
    /// doubles as the discovery of `total_pages`.
    pub fn next_page(&self) -> Option<u32> {
        match self.total_pages {
            None => Some(self.next),
            Some(total) if self.next < total => Some(self.next),
            Some(_) => None,
        }
    }

    /// Record the response for the page last returned by [`next_page`].
    ///
    /// Returns the items that belong in the aggregated result (none when the
    /// first response reports zero pages) and what to request next.
    ///
    /// [`next_page`]: Self::next_page
    pub fn record(&mut self, page: SearchPage) -> (Vec<JsonValue>, NextPage) {
        let total = *self.total_pages.get_or_insert(page.info.total_pages);
        let index = self.next;

        self.next += 1;
        self.pages_fetched += 1;

        let items = if index < total {
            self.items_fetched += page.items.len() as u64;
            page.items
        } else {
            Vec::new()
        };

        let next = if self.next < total {
            NextPage::Continue(self.next)
        } else {
            NextPage::Done
        };
        (items, next)
    }

    /// Total pages as reported by the first response
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Number of pages recorded
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Number of items accepted into the result
    pub fn items_fetched(&self) -> u64 {
        self.items_fetched
    }

    /// Check whether every page has been fetched
    pub fn is_done(&self) -> bool {
        self.next_page().is_none()
    }
}

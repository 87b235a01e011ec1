//! Pagination types
//!
//! Page and session records threaded through the fetch controller, and the
//! aggregate / page-list result shapes callers consume.

use super::policy::{FetchMode, PaginationPolicy};
use crate::types::JsonValue;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One bounded response from a single page fetch
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Result items for this page
    pub items: Vec<JsonValue>,
    /// Total item count hint, if the response carried one
    pub total: Option<u64>,
    /// Total page count hint, if the response carried one
    pub total_pages: Option<u64>,
}

impl Page {
    /// Create a page from its items
    pub fn new(items: Vec<JsonValue>) -> Self {
        Self {
            items,
            total: None,
            total_pages: None,
        }
    }

    /// Attach a total item count hint
    #[must_use]
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Attach a total page count hint
    #[must_use]
    pub fn with_total_pages(mut self, total_pages: u64) -> Self {
        self.total_pages = Some(total_pages);
        self
    }

    /// Number of items received in this page
    pub fn received(&self) -> u64 {
        self.items.len() as u64
    }
}

/// How a fetch run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// The run is still in progress
    #[default]
    Running,
    /// No further pages exist
    Exhausted,
    /// The request bound was reached before exhaustion
    BoundReached,
    /// The run was cancelled cooperatively; results are partial
    Cancelled,
}

/// Per-invocation state of a single pagination run.
///
/// Created fresh per fetch call and discarded after the result is returned;
/// never persisted across invocations.
#[derive(Debug, Clone)]
pub struct FetchSession {
    /// Initial cursor
    pub cursor_start: u64,
    /// Cursor for the next request (advanced past each non-final page)
    pub cursor: u64,
    /// Cursor of the most recently issued request
    pub last_cursor: u64,
    /// Successful page fetches issued so far
    pub requests_issued: u32,
    /// Items aggregated so far; equals the sum of per-page item counts
    pub items_fetched: u64,
    /// Throttling retries performed across the run
    pub retries_429: u32,
    /// Last known total item count from the remote
    pub total_available: Option<u64>,
    /// A previously seen total disappeared from a later page
    pub total_missing_on_later_page: bool,
    /// The request bound stopped the run before exhaustion
    pub truncated: bool,
    /// Terminal state of the run
    pub completion: Completion,
    /// Wall time of the run in milliseconds
    pub execution_time_ms: u64,
    /// Mode the run was configured with
    pub mode: FetchMode,
}

impl FetchSession {
    /// Create a fresh session for the given policy
    pub fn new(policy: &PaginationPolicy) -> Self {
        Self {
            cursor_start: policy.cursor_start,
            cursor: policy.cursor_start,
            last_cursor: policy.cursor_start,
            requests_issued: 0,
            items_fetched: 0,
            retries_429: 0,
            total_available: None,
            total_missing_on_later_page: false,
            truncated: false,
            completion: Completion::Running,
            execution_time_ms: 0,
            mode: policy.mode,
        }
    }

    /// Record a successfully fetched page
    pub fn record_page(&mut self, page: &Page) {
        self.requests_issued += 1;
        self.items_fetched += page.received();
        match page.total {
            Some(total) => self.total_available = Some(total),
            None => {
                if self.total_available.is_some() {
                    self.total_missing_on_later_page = true;
                }
            }
        }
    }

    /// Mark the run as stopped by the request bound
    pub fn mark_truncated(&mut self) {
        self.truncated = true;
        self.completion = Completion::BoundReached;
    }

    /// Whether the run completed without hitting the bound or being cancelled
    pub fn is_exhausted(&self) -> bool {
        self.completion == Completion::Exhausted
    }
}

/// Metadata block attached to fetch results
#[derive(Debug, Clone, Serialize)]
pub struct FetchMeta {
    /// Always true for controller-driven runs
    pub pagination_enabled: bool,
    /// Items aggregated across all pages
    pub total_fetched: u64,
    /// Last known total from the remote, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_available: Option<u64>,
    /// Page requests issued
    pub requests_made: u32,
    /// Wall time of the run
    pub execution_time_ms: u64,
    /// The request bound stopped the run before exhaustion
    pub max_reached: bool,
    /// The run was cancelled; results are partial
    pub cancelled: bool,
    /// A previously seen total disappeared from a later page
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub total_missing_on_later_page: bool,
}

impl FetchMeta {
    fn from_session(session: &FetchSession) -> Self {
        Self {
            pagination_enabled: true,
            total_fetched: session.items_fetched,
            total_available: session.total_available,
            requests_made: session.requests_issued,
            execution_time_ms: session.execution_time_ms,
            max_reached: session.truncated,
            cancelled: session.completion == Completion::Cancelled,
            total_missing_on_later_page: session.total_missing_on_later_page,
        }
    }
}

/// Aggregate-mode result: all items merged, one metadata block
#[derive(Debug, Clone, Serialize)]
pub struct Aggregate {
    /// Merged items in request order
    pub items: Vec<JsonValue>,
    /// Run metadata
    pub meta: FetchMeta,
}

/// Page-list-mode result entry: one fetched page with its own metadata
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    /// 1-based sequence number of the page within the run
    pub page: u32,
    /// Cursor the page was requested at
    pub cursor: u64,
    /// Items received in this page
    pub items: Vec<JsonValue>,
    /// Total item count hint carried by this page, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_available: Option<u64>,
    /// Per-page warnings
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Result of a paginated fetch run: the final session plus the fetched pages
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Final session state
    pub session: FetchSession,
    /// Fetched pages in request order
    pub pages: Vec<Page>,
    pub(crate) cursors: Vec<u64>,
}

impl FetchOutcome {
    /// Merge all pages into a single aggregate result
    pub fn aggregate(self) -> Aggregate {
        let meta = FetchMeta::from_session(&self.session);
        let items = self
            .pages
            .into_iter()
            .flat_map(|page| page.items)
            .collect();
        Aggregate { items, meta }
    }

    /// Produce one result object per fetched page
    pub fn page_list(self) -> Vec<PageResult> {
        let mut seen_total = false;
        let mut results = Vec::with_capacity(self.pages.len());
        for (index, page) in self.pages.into_iter().enumerate() {
            let mut warnings = Vec::new();
            if page.total.is_some() {
                seen_total = true;
            } else if seen_total {
                warnings.push(
                    "total count missing in this response; stopping conditions fall back to page length"
                        .to_string(),
                );
            }
            results.push(PageResult {
                page: index as u32 + 1,
                cursor: self.cursors.get(index).copied().unwrap_or_default(),
                total_available: page.total.or(self.session.total_available),
                items: page.items,
                warnings,
            });
        }
        results
    }
}

/// Cooperative cancellation handle for a fetch run.
///
/// Checked before each request and at each delay or retry sleep. Cancelling
/// ends the loop with `Completion::Cancelled` and partial results.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

//! Pagination policy
//!
//! Configuration for a paginated fetch run: cursor arithmetic, stopping
//! bounds, inter-request delay and throttling retry behavior.

use crate::error::{Error, Result};
use std::time::Duration;

/// Whether the fetch loop runs until exhaustion or stops after a fixed
/// number of requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Continue until the remote data is exhausted (still capped by
    /// `max_requests` as a hard safety bound)
    #[default]
    Exhaustive,
    /// Stop after `max_requests` requests
    Bounded,
}

/// How the cursor advances between pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStrategy {
    /// Offset-based cursor: next cursor = cursor + page_size
    /// (e.g. analytics `offset`/`limit`, reviews `offset`/`limit`)
    #[default]
    Offset,
    /// Page-number cursor: next cursor = cursor + 1
    /// (e.g. listings and autoload reports `page`/`per_page`)
    PageNumber,
}

impl CursorStrategy {
    /// Advance the cursor past a non-final page.
    ///
    /// Offset cursors advance by the *requested* page size, not the received
    /// count. If the remote returns a short page for reasons other than
    /// end-of-data, the next cursor may skip or duplicate records; this
    /// mirrors the remote API convention and is left uncorrected.
    pub fn advance(self, cursor: u64, page_size: u64) -> u64 {
        match self {
            Self::Offset => cursor + page_size,
            Self::PageNumber => cursor + 1,
        }
    }

    /// Check whether known totals indicate the current page is the last one.
    ///
    /// Short-page detection and total-count comparison are independent
    /// stopping conditions; either may end the loop. For page-number
    /// cursors, `page_base` converts the remote's total-pages count into
    /// the number of the last page (zero-based endpoints end at
    /// `total_pages - 1`).
    pub fn exhausted_by_total(
        self,
        cursor: u64,
        received: u64,
        items_fetched: u64,
        total: Option<u64>,
        total_pages: Option<u64>,
        page_base: u64,
    ) -> bool {
        match self {
            Self::Offset => total.is_some_and(|t| cursor + received >= t),
            Self::PageNumber => {
                total.is_some_and(|t| items_fetched >= t)
                    || total_pages.is_some_and(|tp| cursor + 1 >= tp + page_base)
            }
        }
    }
}

/// Configuration for a paginated fetch run
#[derive(Debug, Clone)]
pub struct PaginationPolicy {
    /// Initial cursor value (offset, or first page number; zero or one
    /// based depending on the endpoint)
    pub cursor_start: u64,
    /// Requested page size; callers clamp this to the endpoint maximum
    pub page_size: u64,
    /// Exhaustive or bounded run
    pub mode: FetchMode,
    /// Hard upper bound on request count, enforced in both modes
    pub max_requests: u32,
    /// Cursor arithmetic for this endpoint
    pub cursor_strategy: CursorStrategy,
    /// First page number the endpoint recognizes (0 or 1); only used by
    /// page-number cursors to interpret total-pages metadata
    pub page_base: u64,
    /// Minimum wait between consecutive page requests
    pub inter_request_delay: Duration,
    /// Whether to retry locally on a throttling (429) signal
    pub retry_on_429: bool,
    /// Maximum throttling retries per page
    pub max_retries_429: u32,
    /// Base delay for throttling backoff
    pub retry_backoff: Duration,
    /// Cap on the throttling backoff delay
    pub retry_backoff_cap: Duration,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            cursor_start: 0,
            page_size: 100,
            mode: FetchMode::Exhaustive,
            max_requests: 50,
            cursor_strategy: CursorStrategy::Offset,
            page_base: 1,
            inter_request_delay: Duration::from_millis(100),
            retry_on_429: true,
            max_retries_429: 3,
            retry_backoff: Duration::from_secs(1),
            retry_backoff_cap: Duration::from_secs(180),
        }
    }
}

impl PaginationPolicy {
    /// Create a policy with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an offset-based policy starting at the given offset
    pub fn offset(start: u64, page_size: u64) -> Self {
        Self {
            cursor_start: start,
            page_size,
            cursor_strategy: CursorStrategy::Offset,
            ..Self::default()
        }
    }

    /// Create a page-number policy starting at the given page
    pub fn page_number(start_page: u64, page_size: u64) -> Self {
        Self {
            cursor_start: start_page,
            page_size,
            cursor_strategy: CursorStrategy::PageNumber,
            ..Self::default()
        }
    }

    /// Mark the endpoint's pages as zero-based, so a total-pages count of
    /// `n` means the last page is `n - 1`
    #[must_use]
    pub fn zero_based(mut self) -> Self {
        self.page_base = 0;
        self
    }

    /// Set bounded mode with the given request cap
    #[must_use]
    pub fn bounded(mut self, max_requests: u32) -> Self {
        self.mode = FetchMode::Bounded;
        self.max_requests = max_requests;
        self
    }

    /// Set the hard request cap without changing the mode
    #[must_use]
    pub fn with_max_requests(mut self, max_requests: u32) -> Self {
        self.max_requests = max_requests;
        self
    }

    /// Set the inter-request delay
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.inter_request_delay = delay;
        self
    }

    /// Configure throttling retry behavior
    #[must_use]
    pub fn with_retry_429(mut self, max_retries: u32, backoff: Duration, cap: Duration) -> Self {
        self.retry_on_429 = true;
        self.max_retries_429 = max_retries;
        self.retry_backoff = backoff;
        self.retry_backoff_cap = cap;
        self
    }

    /// Disable local throttling retries
    #[must_use]
    pub fn no_retry_429(mut self) -> Self {
        self.retry_on_429 = false;
        self
    }

    /// Validate policy invariants
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_param("page_size", "must be at least 1"));
        }
        if self.max_requests == 0 {
            return Err(Error::invalid_param("max_requests", "must be at least 1"));
        }
        Ok(())
    }

    /// Backoff delay for the given retry (counted from 1).
    ///
    /// Grows linearly with the retry number and never decreases:
    /// `min(cap, backoff * (retry + 1))`.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        std::cmp::min(
            self.retry_backoff_cap,
            self.retry_backoff * (retry + 1),
        )
    }
}

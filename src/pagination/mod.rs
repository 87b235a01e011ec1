//! Pagination module
//!
//! Bounded paginated fetch against the marketplace API.
//!
//! # Overview
//!
//! The remote API paginates every list endpoint, with per-endpoint quirks:
//! offset- vs page-number cursors, zero- vs one-based first pages, and
//! differing total-count hints. [`FetchController`] drives a caller-supplied
//! one-page fetch function until exhaustion or a request bound, with
//! inter-request delays and throttling retries governed by
//! [`PaginationPolicy`]. Results come back as the final [`FetchSession`]
//! plus the fetched pages, reshaped into aggregate or page-list form.

mod controller;
mod policy;
mod types;

pub use controller::{FetchController, FetchPage, Sleep, TokioSleep};
pub use policy::{CursorStrategy, FetchMode, PaginationPolicy};
pub use types::{
    Aggregate, CancelToken, Completion, FetchMeta, FetchOutcome, FetchSession, Page, PageResult,
};

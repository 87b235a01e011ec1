//! Paginated fetch controller
//!
//! Drives sequential calls to a caller-supplied one-page fetch function
//! until a stopping condition is met, aggregating results and collecting
//! run metadata. Requests are never issued concurrently; the remote API
//! requires strict sequencing for ordering and rate-limit compliance.

use super::policy::PaginationPolicy;
use super::types::{CancelToken, Completion, FetchOutcome, FetchSession, Page};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// One-page fetch capability supplied by the caller.
///
/// `Ok(None)` means the response was absent or structurally invalid (missing
/// the expected item list). A throttling rejection is signalled with
/// [`Error::RateLimited`]; any other error propagates and aborts the run.
#[async_trait]
pub trait FetchPage: Send + Sync {
    /// Fetch the page at the given cursor
    async fn fetch_page(&self, cursor: u64, page_size: u64) -> Result<Option<Page>>;
}

#[async_trait]
impl<F, Fut> FetchPage for F
where
    F: Fn(u64, u64) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<Page>>> + Send,
{
    async fn fetch_page(&self, cursor: u64, page_size: u64) -> Result<Option<Page>> {
        (self)(cursor, page_size).await
    }
}

/// Injected sleep capability, substitutable in tests
#[async_trait]
pub trait Sleep: Send + Sync {
    /// Suspend the current task for the given duration
    async fn sleep(&self, duration: Duration);
}

/// Default sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Outcome of fetching one page, including cooperative cancellation
enum Step {
    Page(Option<Page>),
    Cancelled,
}

/// Controller for a bounded paginated fetch run
pub struct FetchController {
    policy: PaginationPolicy,
    sleeper: Arc<dyn Sleep>,
    cancel: CancelToken,
}

impl FetchController {
    /// Create a controller with the given policy
    pub fn new(policy: PaginationPolicy) -> Self {
        Self {
            policy,
            sleeper: Arc::new(TokioSleep),
            cancel: CancelToken::new(),
        }
    }

    /// Substitute the sleep capability (instantaneous in tests)
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleep>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Attach a cancellation token
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get the policy driving this controller
    pub fn policy(&self) -> &PaginationPolicy {
        &self.policy
    }

    /// Drive sequential page fetches until a stopping condition is met.
    ///
    /// Stopping conditions, checked after each page, first match wins:
    /// 1. absent/invalid page: stop with pages so far (fatal only on page 1)
    /// 2. short page: fewer items than requested implies exhaustion
    /// 3. known total reached
    /// 4. request bound reached: the session is marked truncated
    pub async fn fetch_pages<F: FetchPage>(&self, fetch_one: &F) -> Result<FetchOutcome> {
        self.policy.validate()?;

        let start = Instant::now();
        let mut session = FetchSession::new(&self.policy);
        let mut pages: Vec<Page> = Vec::new();
        let mut cursors: Vec<u64> = Vec::new();
        let mut cursor = self.policy.cursor_start;

        loop {
            if session.requests_issued > 0 && !self.policy.inter_request_delay.is_zero() {
                if self.cancel.is_cancelled() {
                    session.completion = Completion::Cancelled;
                    break;
                }
                self.sleeper.sleep(self.policy.inter_request_delay).await;
            }

            let step = self
                .fetch_with_retry(fetch_one, cursor, &mut session)
                .await
                .map_err(|e| self.abort_error(e, &session))?;

            let maybe_page = match step {
                Step::Page(page) => page,
                Step::Cancelled => {
                    session.completion = Completion::Cancelled;
                    break;
                }
            };

            session.last_cursor = cursor;

            let Some(page) = maybe_page else {
                if session.requests_issued == 0 {
                    // Nothing useful to return
                    return Err(Error::InvalidFirstPage);
                }
                // Trailing malformed pages are tolerated
                debug!(cursor, "invalid trailing page, stopping");
                session.completion = Completion::Exhausted;
                break;
            };

            let received = page.received();
            let total_pages = page.total_pages;
            session.record_page(&page);
            debug!(
                cursor,
                received,
                requests = session.requests_issued,
                "fetched page"
            );
            cursors.push(cursor);
            pages.push(page);

            if received < self.policy.page_size {
                session.completion = Completion::Exhausted;
                break;
            }

            if self.policy.cursor_strategy.exhausted_by_total(
                cursor,
                received,
                session.items_fetched,
                session.total_available,
                total_pages,
                self.policy.page_base,
            ) {
                session.completion = Completion::Exhausted;
                break;
            }

            // Hard cap, enforced in exhaustive mode too
            if session.requests_issued >= self.policy.max_requests {
                session.mark_truncated();
                break;
            }

            cursor = self.policy.cursor_strategy.advance(cursor, self.policy.page_size);
            session.cursor = cursor;
        }

        session.execution_time_ms = start.elapsed().as_millis() as u64;
        Ok(FetchOutcome {
            session,
            pages,
            cursors,
        })
    }

    /// Fetch one page, retrying locally on throttling signals per policy
    async fn fetch_with_retry<F: FetchPage>(
        &self,
        fetch_one: &F,
        cursor: u64,
        session: &mut FetchSession,
    ) -> Result<Step> {
        let mut retries = 0u32;

        loop {
            if self.cancel.is_cancelled() {
                return Ok(Step::Cancelled);
            }

            match fetch_one.fetch_page(cursor, self.policy.page_size).await {
                Ok(page) => return Ok(Step::Page(page)),
                Err(e) if e.is_rate_limited() => {
                    if !self.policy.retry_on_429 || retries >= self.policy.max_retries_429 {
                        return Err(Error::RetriesExhausted {
                            attempts: retries + 1,
                            pages_fetched: u64::from(session.requests_issued),
                        });
                    }
                    retries += 1;
                    session.retries_429 += 1;
                    let delay = self.policy.backoff_delay(retries);
                    warn!(
                        cursor,
                        retry = retries,
                        max_retries = self.policy.max_retries_429,
                        ?delay,
                        "throttled, backing off"
                    );
                    if self.cancel.is_cancelled() {
                        return Ok(Step::Cancelled);
                    }
                    self.sleeper.sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Attach session diagnostics to a propagated failure
    fn abort_error(&self, source: Error, session: &FetchSession) -> Error {
        match source {
            // Already carries the page count
            Error::RetriesExhausted { .. } => source,
            other => Error::Aborted {
                pages_fetched: u64::from(session.requests_issued),
                items_fetched: session.items_fetched,
                last_cursor: session.last_cursor,
                source: Box::new(other),
            },
        }
    }
}

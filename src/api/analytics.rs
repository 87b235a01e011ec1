//! Ad statistics operations (`/stats/*` and call statistics)
//!
//! The analytics endpoint paginates by offset/limit in the request body,
//! with a hard limit of 1000 rows per request and an aggressive server-side
//! quota. The endpoint wants at least a minute between requests, so the
//! default policy waits 61 seconds and backs off in 61-second steps capped
//! at 3 minutes on throttling.
//!
//! Results come back page by page rather than merged: each page carries its
//! own row-count and total metadata, and `dataTotalCount` can disappear from
//! later responses.

use super::AvitoClient;
use crate::error::{Error, Result};
use crate::pagination::{CursorStrategy, Page, PageResult, PaginationPolicy};
use crate::types::{JsonValue, UserId};
use crate::validate;
use serde_json::json;
use std::time::Duration;

/// Maximum rows per analytics request
pub const MAX_LIMIT: u64 = 1000;

/// Hard cap on requests per paginated analytics run
pub const MAX_REQUESTS: u32 = 50;

/// Mandatory pause between analytics requests (the quota window is 60 s)
pub const INTER_REQUEST_DELAY: Duration = Duration::from_secs(61);

/// Base step for throttling backoff
pub const RETRY_BACKOFF: Duration = Duration::from_secs(61);

/// Ceiling for throttling backoff
pub const RETRY_BACKOFF_CAP: Duration = Duration::from_secs(180);

/// Parameters for an analytics request
#[derive(Debug, Clone)]
pub struct AnalyticsQuery {
    /// Account to query
    pub user_id: UserId,
    /// Start of the reporting period, `YYYY-MM-DD`
    pub date_from: String,
    /// End of the reporting period, `YYYY-MM-DD`
    pub date_to: String,
    /// Row grouping (e.g. "item", "day", "totals")
    pub grouping: String,
    /// Metrics to include (e.g. "views", "contacts", "favorites")
    pub metrics: Vec<String>,
    /// Optional row filter, passed through verbatim
    pub filter: Option<JsonValue>,
    /// Optional sort order, passed through verbatim
    pub sort: Option<JsonValue>,
}

impl AnalyticsQuery {
    /// Query for the given account and period
    pub fn new(
        user_id: UserId,
        date_from: impl Into<String>,
        date_to: impl Into<String>,
        grouping: impl Into<String>,
        metrics: Vec<String>,
    ) -> Self {
        Self {
            user_id,
            date_from: date_from.into(),
            date_to: date_to.into(),
            grouping: grouping.into(),
            metrics,
            filter: None,
            sort: None,
        }
    }

    /// Attach a row filter
    #[must_use]
    pub fn filter(mut self, filter: JsonValue) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Attach a sort order
    #[must_use]
    pub fn sort(mut self, sort: JsonValue) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Parameters for a per-listing counters request (the shallow statistics
/// endpoint, `POST /stats/v1/accounts/{user_id}/items`)
#[derive(Debug, Clone)]
pub struct ShallowStatsQuery {
    /// Account to query
    pub user_id: UserId,
    /// Comma- or whitespace-separated listing IDs, at most 200
    pub item_ids: String,
    /// Start of the reporting period, `YYYY-MM-DD`
    pub date_from: String,
    /// End of the reporting period, `YYYY-MM-DD`
    pub date_to: String,
    /// Counters to include
    pub fields: Vec<String>,
    /// Bucket size for the returned series (e.g. "day", "week", "month")
    pub period_grouping: String,
}

impl ShallowStatsQuery {
    /// Query for the given account, listings and period, with the unique
    /// views/contacts/favorites counters grouped by day
    pub fn new(
        user_id: UserId,
        item_ids: impl Into<String>,
        date_from: impl Into<String>,
        date_to: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            item_ids: item_ids.into(),
            date_from: date_from.into(),
            date_to: date_to.into(),
            fields: vec![
                "uniqViews".to_string(),
                "uniqContacts".to_string(),
                "uniqFavorites".to_string(),
            ],
            period_grouping: "day".to_string(),
        }
    }

    /// Replace the requested counters
    #[must_use]
    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Replace the period grouping
    #[must_use]
    pub fn period_grouping(mut self, grouping: impl Into<String>) -> Self {
        self.period_grouping = grouping.into();
        self
    }
}

/// Default pagination policy for analytics: full pages from offset 0, the
/// endpoint's delay and backoff schedule, capped at [`MAX_REQUESTS`].
pub fn default_policy() -> PaginationPolicy {
    PaginationPolicy::offset(0, MAX_LIMIT)
        .with_max_requests(MAX_REQUESTS)
        .with_delay(INTER_REQUEST_DELAY)
        .with_retry_429(3, RETRY_BACKOFF, RETRY_BACKOFF_CAP)
}

impl AvitoClient {
    /// Fetch ad statistics page by page.
    ///
    /// Returns one [`PageResult`] per request in request order. Pages after
    /// the first may lose the server's total count; such pages carry a
    /// warning and stopping falls back to page length.
    pub async fn analytics(
        &self,
        query: &AnalyticsQuery,
        mut policy: PaginationPolicy,
    ) -> Result<Vec<PageResult>> {
        validate::validate_date_range(&query.date_from, &query.date_to)?;
        validate::validate_page_size("limit", policy.page_size, 1, MAX_LIMIT)?;
        if policy.cursor_strategy != CursorStrategy::Offset {
            return Err(Error::invalid_param(
                "policy",
                "the statistics endpoint paginates by offset; use PaginationPolicy::offset",
            ));
        }
        policy.max_requests = policy.max_requests.min(MAX_REQUESTS);

        let controller = self.controller(policy);
        let fetch = |cursor: u64, page_size: u64| fetch_analytics_page(self, query, cursor, page_size);
        let outcome = controller.fetch_pages(&fetch).await?;
        Ok(outcome.page_list())
    }

    /// Fetch per-listing counters without pagination.
    ///
    /// One request covering up to 200 listings, with the counters and
    /// period grouping from the query.
    pub async fn shallow_stats(&self, query: &ShallowStatsQuery) -> Result<JsonValue> {
        validate::validate_date_range(&query.date_from, &query.date_to)?;
        let ids = validate::parse_item_ids(&query.item_ids)?;

        let mut body = json!({
            "itemIds": ids,
            "dateFrom": query.date_from,
            "dateTo": query.date_to,
        });
        if !query.fields.is_empty() {
            body["fields"] = json!(query.fields);
        }
        if !query.period_grouping.is_empty() {
            body["periodGrouping"] = json!(query.period_grouping);
        }

        let response = self
            .http()
            .post(&format!("/stats/v1/accounts/{}/items", query.user_id), body)
            .await?;
        response.json().await.map_err(Error::Http)
    }

    /// Fetch call statistics for up to 200 listings over a date range
    pub async fn calls_stats(
        &self,
        user_id: UserId,
        item_ids: &str,
        date_from: &str,
        date_to: &str,
    ) -> Result<JsonValue> {
        validate::validate_date_range(date_from, date_to)?;
        let ids = validate::parse_item_ids(item_ids)?;

        let response = self
            .http()
            .post(
                &format!("/core/v1/accounts/{user_id}/calls/stats/"),
                json!({
                    "itemIds": ids,
                    "dateFrom": date_from,
                    "dateTo": date_to,
                }),
            )
            .await?;
        response.json().await.map_err(Error::Http)
    }
}

async fn fetch_analytics_page(
    client: &AvitoClient,
    query: &AnalyticsQuery,
    cursor: u64,
    page_size: u64,
) -> Result<Option<Page>> {
    let mut body = json!({
        "dateFrom": query.date_from,
        "dateTo": query.date_to,
        "grouping": query.grouping,
        "metrics": query.metrics,
        "limit": page_size,
        "offset": cursor,
    });
    if let Some(filter) = &query.filter {
        body["filter"] = filter.clone();
    }
    if let Some(sort) = &query.sort {
        body["sort"] = sort.clone();
    }

    let response = client
        .http()
        .post(
            &format!("/stats/v2/accounts/{}/items", query.user_id),
            body,
        )
        .await?;
    let payload: JsonValue = response.json().await.map_err(crate::error::Error::Http)?;

    let Some(groupings) = payload
        .pointer("/result/groupings")
        .and_then(JsonValue::as_array)
    else {
        return Ok(None);
    };

    let mut page = Page::new(groupings.clone());
    // dataTotalCount may vanish from later pages; Page::total stays None then
    if let Some(total) = payload
        .pointer("/result/dataTotalCount")
        .and_then(JsonValue::as_u64)
    {
        page = page.with_total(total);
    }
    Ok(Some(page))
}

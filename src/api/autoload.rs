//! Bulk-feed (autoload) operations (`/autoload/*`)
//!
//! Report listings paginate by page number starting at 1; the fee breakdown
//! endpoint is the odd one out with zero-based pages. All three list
//! endpoints cap `per_page` at 200 and report totals under `meta`.

use super::AvitoClient;
use crate::error::{Error, Result};
use crate::http::RequestConfig;
use crate::pagination::{Aggregate, CursorStrategy, Page, PaginationPolicy};
use crate::types::{JsonValue, ReportId};
use crate::validate;
use serde_json::json;

/// Maximum `per_page` accepted by the autoload report endpoints
pub const MAX_PER_PAGE: u64 = 200;

/// Maximum feed ad IDs per items-info request
pub const MAX_ITEMS_INFO_IDS: usize = 100;

/// Optional filters for report item queries
#[derive(Debug, Clone, Default)]
pub struct ReportFilters {
    /// Comma-separated feed ad IDs
    pub ad_ids: Option<String>,
    /// Comma-separated marketplace listing IDs
    pub avito_ids: Option<String>,
}

impl ReportFilters {
    fn apply(&self, mut config: RequestConfig) -> RequestConfig {
        if let Some(ad_ids) = &self.ad_ids {
            config = config.query("ad_ids", ad_ids);
        }
        if let Some(avito_ids) = &self.avito_ids {
            config = config.query("avito_ids", avito_ids);
        }
        config
    }
}

impl AvitoClient {
    /// Fetch upload reports, newest first, paginating per policy
    pub async fn list_reports(&self, policy: PaginationPolicy) -> Result<Aggregate> {
        validate_report_policy(&policy, 1)?;

        let controller = self.controller(policy);
        let fetch = |cursor: u64, page_size: u64| {
            fetch_report_page(self, "/autoload/v2/reports".to_string(), None, "reports", cursor, page_size)
        };
        let outcome = controller.fetch_pages(&fetch).await?;
        Ok(outcome.aggregate())
    }

    /// Fetch per-listing results of one upload report
    pub async fn report_items(
        &self,
        report_id: ReportId,
        filters: &ReportFilters,
        policy: PaginationPolicy,
    ) -> Result<Aggregate> {
        validate_report_policy(&policy, 1)?;

        let path = format!("/autoload/v2/reports/{report_id}/items");
        let controller = self.controller(policy);
        let fetch = |cursor: u64, page_size: u64| {
            fetch_report_page(self, path.clone(), Some(filters), "items", cursor, page_size)
        };
        let outcome = controller.fetch_pages(&fetch).await?;
        Ok(outcome.aggregate())
    }

    /// Fetch placement fees charged for one upload report.
    ///
    /// Unlike the other report endpoints, fee pages start at 0, so the
    /// last page indicated by `meta.pages` is `pages - 1`.
    pub async fn report_fees(
        &self,
        report_id: ReportId,
        filters: &ReportFilters,
        policy: PaginationPolicy,
    ) -> Result<Aggregate> {
        validate_report_policy(&policy, 0)?;

        let path = format!("/autoload/v2/reports/{report_id}/items/fees");
        let controller = self.controller(policy.zero_based());
        let fetch = |cursor: u64, page_size: u64| {
            fetch_report_page(self, path.clone(), Some(filters), "fees", cursor, page_size)
        };
        let outcome = controller.fetch_pages(&fetch).await?;
        Ok(outcome.aggregate())
    }

    /// Fetch the autoload profile
    pub async fn get_autoload_profile(&self) -> Result<JsonValue> {
        self.http().get_json("/autoload/v2/profile").await
    }

    /// Create or update the autoload profile
    pub async fn update_autoload_profile(&self, profile: JsonValue) -> Result<JsonValue> {
        let response = self.http().post("/autoload/v2/profile", profile).await?;
        response.json().await.map_err(Error::Http)
    }

    /// Fetch one upload report by ID
    pub async fn get_report(&self, report_id: ReportId) -> Result<JsonValue> {
        self.http()
            .get_json(&format!("/autoload/v3/reports/{report_id}"))
            .await
    }

    /// Fetch the most recent completed upload report
    pub async fn last_completed_report(&self) -> Result<JsonValue> {
        self.http()
            .get_json("/autoload/v3/reports/last_completed_report")
            .await
    }

    /// Map feed ad IDs to marketplace listing IDs
    pub async fn avito_ids_by_ad_ids(&self, ad_ids: &str) -> Result<JsonValue> {
        let config = RequestConfig::new().query("query", ad_ids);
        self.http()
            .get_json_with_config("/autoload/v2/items/avito_ids", config)
            .await
    }

    /// Map marketplace listing IDs to feed ad IDs
    pub async fn ad_ids_by_avito_ids(&self, avito_ids: &str) -> Result<JsonValue> {
        let config = RequestConfig::new().query("query", avito_ids);
        self.http()
            .get_json_with_config("/autoload/v2/items/ad_ids", config)
            .await
    }

    /// Fetch report data for listings named in the feed file.
    ///
    /// `ids` is a comma- or pipe-separated list of feed ad IDs, at most
    /// [`MAX_ITEMS_INFO_IDS`] per call.
    pub async fn autoload_items_info(&self, ids: &str) -> Result<JsonValue> {
        let query = ids.trim();
        let count = query
            .split(|c| c == ',' || c == '|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .count();
        if count == 0 {
            return Err(Error::invalid_param(
                "ids",
                "at least one feed ad ID required",
            ));
        }
        if count > MAX_ITEMS_INFO_IDS {
            return Err(Error::invalid_param(
                "ids",
                format!("at most {MAX_ITEMS_INFO_IDS} IDs per request, got {count}"),
            ));
        }

        let config = RequestConfig::new().query("query", query);
        self.http()
            .get_json_with_config("/autoload/v2/reports/items", config)
            .await
    }

    /// Fetch the marketplace category tree accepted by autoload feeds
    pub async fn category_tree(&self) -> Result<JsonValue> {
        self.http().get_json("/autoload/v1/user-docs/tree").await
    }

    /// Fetch the feed fields of one category node
    pub async fn category_fields(&self, node_slug: &str) -> Result<JsonValue> {
        let slug = node_slug.trim();
        if slug.is_empty() {
            return Err(Error::invalid_param(
                "node_slug",
                "category slug must not be empty",
            ));
        }
        self.http()
            .get_json(&format!("/autoload/v1/user-docs/node/{slug}/fields"))
            .await
    }

    /// Trigger an immediate upload of the configured feed
    pub async fn trigger_upload(&self) -> Result<JsonValue> {
        let response = self.http().post("/autoload/v1/upload", json!({})).await?;
        response.json().await.map_err(Error::Http)
    }
}

fn validate_report_policy(policy: &PaginationPolicy, first_page: u64) -> Result<()> {
    validate::validate_page_size("per_page", policy.page_size, 1, MAX_PER_PAGE)?;
    if policy.cursor_start < first_page {
        return Err(Error::invalid_param(
            "page",
            format!("page numbers start at {first_page} for this endpoint"),
        ));
    }
    if policy.cursor_strategy != CursorStrategy::PageNumber {
        return Err(Error::invalid_param(
            "policy",
            "report endpoints paginate by page number; use PaginationPolicy::page_number",
        ));
    }
    Ok(())
}

async fn fetch_report_page(
    client: &AvitoClient,
    path: String,
    filters: Option<&ReportFilters>,
    items_key: &str,
    cursor: u64,
    page_size: u64,
) -> Result<Option<Page>> {
    let mut config = RequestConfig::new()
        .query("page", cursor.to_string())
        .query("per_page", page_size.to_string());
    if let Some(filters) = filters {
        config = filters.apply(config);
    }

    let body: JsonValue = client.http().get_json_with_config(&path, config).await?;

    let Some(items) = body.get(items_key).and_then(JsonValue::as_array) else {
        return Ok(None);
    };

    let mut page = Page::new(items.clone());
    if let Some(total) = body.pointer("/meta/total").and_then(JsonValue::as_u64) {
        page = page.with_total(total);
    }
    if let Some(pages) = body.pointer("/meta/pages").and_then(JsonValue::as_u64) {
        page = page.with_total_pages(pages);
    }
    Ok(Some(page))
}

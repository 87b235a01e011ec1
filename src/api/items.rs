//! Listings operations (`/core/v1/items`)
//!
//! Listing search paginates by page number starting at 1, with at most 100
//! items per page. The response carries the items under `resources`.

use super::AvitoClient;
use crate::error::{Error, Result};
use crate::http::RequestConfig;
use crate::pagination::{Aggregate, CursorStrategy, Page, PaginationPolicy};
use crate::types::{ItemId, JsonValue, UserId};
use crate::validate;
use serde_json::json;

/// Maximum `per_page` accepted by the listings endpoint
pub const MAX_PER_PAGE: u64 = 100;

/// Filters for the listings search
#[derive(Debug, Clone, Default)]
pub struct ItemsQuery {
    /// Listing status filter (e.g. "active", "removed", "blocked")
    pub status: Option<String>,
    /// Category ID filter
    pub category: Option<u64>,
    /// Only listings updated at or after this date
    pub updated_at_from: Option<String>,
}

impl ItemsQuery {
    /// Empty query (all active listings)
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by listing status
    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Filter by category ID
    #[must_use]
    pub fn category(mut self, category: u64) -> Self {
        self.category = Some(category);
        self
    }

    /// Filter by minimum update date
    #[must_use]
    pub fn updated_at_from(mut self, date: impl Into<String>) -> Self {
        self.updated_at_from = Some(date.into());
        self
    }
}

impl AvitoClient {
    /// Fetch the account's listings, paginating until exhaustion or the
    /// policy's request bound.
    pub async fn list_items(
        &self,
        query: &ItemsQuery,
        policy: PaginationPolicy,
    ) -> Result<Aggregate> {
        validate::validate_page_size("per_page", policy.page_size, 1, MAX_PER_PAGE)?;
        if policy.cursor_start < 1 {
            return Err(Error::invalid_param("page", "page numbers start at 1"));
        }
        if policy.cursor_strategy != CursorStrategy::PageNumber {
            return Err(Error::invalid_param(
                "policy",
                "listings paginate by page number; use PaginationPolicy::page_number",
            ));
        }

        let controller = self.controller(policy);
        let fetch = |cursor: u64, page_size: u64| fetch_items_page(self, query, cursor, page_size);
        let outcome = controller.fetch_pages(&fetch).await?;
        Ok(outcome.aggregate())
    }

    /// Fetch a single listing's details
    pub async fn get_item_info(&self, user_id: UserId, item_id: ItemId) -> Result<JsonValue> {
        self.http()
            .get_json(&format!("/core/v1/accounts/{user_id}/items/{item_id}/"))
            .await
    }

    /// Update a listing's price
    pub async fn update_price(&self, item_id: ItemId, price: u64) -> Result<JsonValue> {
        let response = self
            .http()
            .post(
                &format!("/core/v1/items/{item_id}/update_price"),
                json!({ "price": price }),
            )
            .await?;
        response.json().await.map_err(Error::Http)
    }
}

async fn fetch_items_page(
    client: &AvitoClient,
    query: &ItemsQuery,
    cursor: u64,
    page_size: u64,
) -> Result<Option<Page>> {
    let mut config = RequestConfig::new()
        .query("page", cursor.to_string())
        .query("per_page", page_size.to_string());

    if let Some(status) = &query.status {
        config = config.query("status", status);
    }
    if let Some(category) = query.category {
        config = config.query("category", category.to_string());
    }
    if let Some(updated_at_from) = &query.updated_at_from {
        config = config.query("updatedAtFrom", updated_at_from);
    }

    let body: JsonValue = client
        .http()
        .get_json_with_config("/core/v1/items", config)
        .await?;

    let Some(resources) = body.get("resources").and_then(JsonValue::as_array) else {
        return Ok(None);
    };

    let mut page = Page::new(resources.clone());
    if let Some(total) = body.pointer("/meta/total").and_then(JsonValue::as_u64) {
        page = page.with_total(total);
    }
    if let Some(pages) = body.pointer("/meta/pages").and_then(JsonValue::as_u64) {
        page = page.with_total_pages(pages);
    }
    Ok(Some(page))
}

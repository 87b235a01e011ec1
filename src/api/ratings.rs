//! Ratings and reviews operations (`/ratings/v1/*`)
//!
//! Reviews paginate by offset/limit with at most 50 per request, quota
//! 300 requests/minute. Answers are write operations on individual reviews.

use super::AvitoClient;
use crate::error::{Error, Result};
use crate::http::RequestConfig;
use crate::pagination::{Aggregate, CursorStrategy, Page, PaginationPolicy};
use crate::types::JsonValue;
use crate::validate;
use reqwest::Method;
use serde_json::json;

/// Maximum `limit` accepted by the reviews endpoint
pub const MAX_LIMIT: u64 = 50;

/// Maximum length of a review answer
pub const MAX_ANSWER_LENGTH: usize = 4000;

impl AvitoClient {
    /// Fetch the account's rating summary
    pub async fn get_rating_info(&self) -> Result<JsonValue> {
        self.http().get_json("/ratings/v1/info").await
    }

    /// Fetch reviews, paginating until exhaustion or the policy's bound.
    ///
    /// Offset-based; the response reports the overall total, which the
    /// controller uses as a stopping condition.
    pub async fn list_reviews(&self, policy: PaginationPolicy) -> Result<Aggregate> {
        validate::validate_page_size("limit", policy.page_size, 1, MAX_LIMIT)?;
        if policy.cursor_strategy != CursorStrategy::Offset {
            return Err(Error::invalid_param(
                "policy",
                "reviews paginate by offset; use PaginationPolicy::offset",
            ));
        }

        let controller = self.controller(policy);
        let fetch = |cursor: u64, page_size: u64| fetch_reviews_page(self, cursor, page_size);
        let outcome = controller.fetch_pages(&fetch).await?;
        Ok(outcome.aggregate())
    }

    /// Post an answer to a review
    pub async fn create_answer(&self, review_id: u64, text: &str) -> Result<JsonValue> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid_param("text", "answer text must not be empty"));
        }
        if text.len() > MAX_ANSWER_LENGTH {
            return Err(Error::invalid_param(
                "text",
                format!("answer text exceeds {MAX_ANSWER_LENGTH} characters"),
            ));
        }

        let response = self
            .http()
            .post(
                "/ratings/v1/answers",
                json!({ "reviewId": review_id, "text": text }),
            )
            .await?;
        response.json().await.map_err(Error::Http)
    }

    /// Delete a previously posted answer
    pub async fn remove_answer(&self, answer_id: u64) -> Result<JsonValue> {
        let response = self
            .http()
            .request(
                Method::DELETE,
                &format!("/ratings/v1/answers/{answer_id}"),
                RequestConfig::default(),
            )
            .await?;
        response.json().await.map_err(Error::Http)
    }
}

async fn fetch_reviews_page(
    client: &AvitoClient,
    cursor: u64,
    page_size: u64,
) -> Result<Option<Page>> {
    let config = RequestConfig::new()
        .query("offset", cursor.to_string())
        .query("limit", page_size.to_string());

    let body: JsonValue = client
        .http()
        .get_json_with_config("/ratings/v1/reviews", config)
        .await?;

    let Some(reviews) = body.get("reviews").and_then(JsonValue::as_array) else {
        return Ok(None);
    };

    let mut page = Page::new(reviews.clone());
    if let Some(total) = body.get("total").and_then(JsonValue::as_u64) {
        page = page.with_total(total);
    }
    Ok(Some(page))
}

//! Paid promotion operations (`/cpxpromo/1/*` and value-added services)
//!
//! Bid inspection, manual/automatic promotion management, and purchase of
//! value-added services (VAS) such as highlighting and sticker packs. All
//! write operations address a single listing; the bulk reads accept up to
//! 200 listing IDs per call.

use super::AvitoClient;
use crate::error::{Error, Result};
use crate::http::RequestConfig;
use crate::types::{ItemId, JsonValue, UserId};
use crate::validate;
use reqwest::Method;
use serde_json::json;

/// Allowed budget windows for automatic promotion
pub const BUDGET_TYPES: [&str; 3] = ["1d", "7d", "30d"];

/// Maximum stickers attachable to a listing alongside a sticker-pack service
pub const MAX_STICKERS: usize = 3;

/// Manual promotion bid
#[derive(Debug, Clone)]
pub struct ManualBid {
    /// Listing to promote
    pub item_id: ItemId,
    /// Bid per action, in kopecks
    pub bid_penny: u64,
    /// Action type the bid applies to
    pub action_type_id: u64,
    /// Optional spending cap, in kopecks
    pub limit_penny: Option<u64>,
}

/// Automatic promotion budget
#[derive(Debug, Clone)]
pub struct AutoBudget {
    /// Listing to promote
    pub item_id: ItemId,
    /// Budget for the window, in kopecks
    pub budget_penny: u64,
    /// Budget window: "1d", "7d", or "30d"
    pub budget_type: String,
    /// Action type the budget applies to
    pub action_type_id: u64,
}

impl AvitoClient {
    /// Fetch current bid recommendations for a listing
    pub async fn get_bids(&self, item_id: ItemId) -> Result<JsonValue> {
        self.http()
            .get_json(&format!("/cpxpromo/1/getBids/{item_id}"))
            .await
    }

    /// Fetch promotion state for up to 200 listings.
    ///
    /// `item_ids` is a comma- or whitespace-separated ID list.
    pub async fn get_promotions_by_item_ids(&self, item_ids: &str) -> Result<JsonValue> {
        let ids = validate::parse_item_ids(item_ids)?;
        let response = self
            .http()
            .post("/cpxpromo/1/getPromotionsByItemIds", json!({ "itemIDs": ids }))
            .await?;
        response.json().await.map_err(Error::Http)
    }

    /// Set a manual promotion bid
    pub async fn set_manual_bid(&self, bid: &ManualBid) -> Result<JsonValue> {
        if bid.bid_penny == 0 {
            return Err(Error::invalid_param("bid_penny", "bid must be positive"));
        }

        let mut body = json!({
            "itemID": bid.item_id,
            "bidPenny": bid.bid_penny,
            "actionTypeID": bid.action_type_id,
        });
        if let Some(limit) = bid.limit_penny.filter(|limit| *limit > 0) {
            body["limitPenny"] = json!(limit);
        }

        let response = self.http().post("/cpxpromo/1/setManual", body).await?;
        response.json().await.map_err(Error::Http)
    }

    /// Set an automatic promotion budget
    pub async fn set_auto_budget(&self, budget: &AutoBudget) -> Result<JsonValue> {
        if budget.budget_penny == 0 {
            return Err(Error::invalid_param(
                "budget_penny",
                "budget must be positive",
            ));
        }
        if !BUDGET_TYPES.contains(&budget.budget_type.as_str()) {
            return Err(Error::invalid_param(
                "budget_type",
                format!("must be one of: {}", BUDGET_TYPES.join(", ")),
            ));
        }

        let response = self
            .http()
            .post(
                "/cpxpromo/1/setAuto",
                json!({
                    "itemID": budget.item_id,
                    "budgetPenny": budget.budget_penny,
                    "budgetType": budget.budget_type,
                    "actionTypeID": budget.action_type_id,
                }),
            )
            .await?;
        response.json().await.map_err(Error::Http)
    }

    /// Remove promotion from a listing
    pub async fn remove_promotion(&self, item_id: ItemId) -> Result<JsonValue> {
        let response = self
            .http()
            .post("/cpxpromo/1/remove", json!({ "itemID": item_id }))
            .await?;
        response.json().await.map_err(Error::Http)
    }

    /// Purchase value-added services for a listing.
    ///
    /// `slugs` names the services to apply. `stickers` is only meaningful
    /// alongside a `stickerpack_xN` slug, which requires exactly N sticker
    /// IDs; at most [`MAX_STICKERS`] are accepted.
    pub async fn apply_vas(
        &self,
        item_id: ItemId,
        slugs: &[String],
        stickers: &[u64],
    ) -> Result<JsonValue> {
        if slugs.is_empty() {
            return Err(Error::invalid_param(
                "slugs",
                "at least one service slug required",
            ));
        }
        if stickers.len() > MAX_STICKERS {
            return Err(Error::invalid_param(
                "stickers",
                format!("at most {MAX_STICKERS} stickers per listing"),
            ));
        }
        if !stickers.is_empty() {
            let expected = slugs
                .iter()
                .find_map(|s| s.strip_prefix("stickerpack_x"))
                .and_then(|n| n.parse::<usize>().ok());
            if let Some(expected) = expected {
                if stickers.len() != expected {
                    return Err(Error::invalid_param(
                        "stickers",
                        format!(
                            "sticker pack expects {expected} stickers, got {}",
                            stickers.len()
                        ),
                    ));
                }
            }
        }

        let mut body = json!({ "slugs": slugs });
        if !stickers.is_empty() {
            body["stickers"] = json!(stickers);
        }

        let response = self
            .http()
            .request(
                Method::PUT,
                &format!("/core/v2/items/{item_id}/vas/"),
                RequestConfig::new().json(body),
            )
            .await?;
        response.json().await.map_err(Error::Http)
    }

    /// Fetch value-added service prices for up to 200 listings
    pub async fn get_vas_prices(&self, user_id: UserId, item_ids: &str) -> Result<JsonValue> {
        let ids = validate::parse_item_ids(item_ids)?;
        let response = self
            .http()
            .post(
                &format!("/core/v1/accounts/{user_id}/vas/prices"),
                json!({ "itemIds": ids }),
            )
            .await?;
        response.json().await.map_err(Error::Http)
    }
}

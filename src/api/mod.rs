//! Marketplace API operations
//!
//! One module per resource, mirroring the remote API's grouping:
//!
//! - [`items`]: listings (`/core/v1/items`)
//! - [`analytics`]: ad statistics (`/stats/v2/accounts/{user_id}/items`)
//! - [`ratings`]: reviews and answers (`/ratings/v1/*`)
//! - [`promotion`]: paid promotion and bids (`/cpxpromo/1/*`)
//! - [`autoload`]: bulk-feed reports and profile (`/autoload/*`)
//!
//! Paginated operations drive the [`crate::pagination::FetchController`];
//! each resource module knows its own cursor base, page-size cap, and
//! response shape.

pub mod analytics;
pub mod autoload;
pub mod items;
pub mod promotion;
pub mod ratings;

pub use analytics::{AnalyticsQuery, ShallowStatsQuery};
pub use autoload::ReportFilters;
pub use items::ItemsQuery;
pub use promotion::{AutoBudget, ManualBid};

use crate::auth::AuthConfig;
use crate::config::ConnectorConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::pagination::{CancelToken, FetchController, PaginationPolicy, Sleep, TokioSleep};
use std::sync::Arc;

/// Client for the marketplace API
pub struct AvitoClient {
    http: HttpClient,
    sleeper: Arc<dyn Sleep>,
    cancel: CancelToken,
}

impl AvitoClient {
    /// Create a client from connector configuration
    pub fn new(config: &ConnectorConfig) -> Result<Self> {
        config.validate()?;

        let http_config = HttpClientConfig::builder()
            .base_url(&config.base_url)
            .timeout(config.http.timeout())
            .max_retries(config.http.max_retries)
            .rate_limit(RateLimiterConfig::new(config.http.requests_per_minute, 10))
            .build();

        let auth = AuthConfig::Oauth2ClientCredentials {
            token_url: config.token_url.clone(),
            client_id: config.credentials.client_id.clone(),
            client_secret: config.credentials.client_secret.clone(),
            scopes: Vec::new(),
            token_body: std::collections::HashMap::new(),
        };

        Ok(Self {
            http: HttpClient::with_auth(http_config, auth),
            sleeper: Arc::new(TokioSleep),
            cancel: CancelToken::new(),
        })
    }

    /// Wrap an existing HTTP client (tests use this with a mock server)
    pub fn with_http(http: HttpClient) -> Self {
        Self {
            http,
            sleeper: Arc::new(TokioSleep),
            cancel: CancelToken::new(),
        }
    }

    /// Substitute the sleep capability used by paginated operations
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleep>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Attach a cancellation token shared by all paginated operations
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels in-flight paginated operations
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Build a fetch controller wired to this client's sleeper and token
    pub(crate) fn controller(&self, policy: PaginationPolicy) -> FetchController {
        FetchController::new(policy)
            .with_sleeper(Arc::clone(&self.sleeper))
            .with_cancel_token(self.cancel.clone())
    }
}

impl std::fmt::Debug for AvitoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvitoClient")
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

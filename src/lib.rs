// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Avito Marketplace Connector
//!
//! A Rust client for the Avito marketplace REST API, built around a
//! bounded paginated fetch controller.
//!
//! ## Features
//!
//! - **Paginated Fetching**: One controller drives every list endpoint,
//!   handling offset- and page-number cursors, request bounds, throttling
//!   retries with capped backoff, inter-request delays, and cancellation
//! - **OAuth2**: Client-credentials and refresh-token flows with cached
//!   24-hour tokens
//! - **Rate Limiting**: Token bucket limiter sized for the published
//!   per-minute quotas
//! - **Resource Coverage**: Listings, ad statistics, reviews, paid
//!   promotion, and bulk-feed (autoload) reports
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use avito_connector::{AvitoClient, ConnectorConfig, PaginationPolicy, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ConnectorConfig::from_env()?;
//!     let client = AvitoClient::new(&config)?;
//!
//!     // Fetch every active listing, 100 per page
//!     let listings = client
//!         .list_items(
//!             &avito_connector::api::ItemsQuery::new().status("active"),
//!             PaginationPolicy::page_number(1, 100),
//!         )
//!         .await?;
//!
//!     println!("fetched {} listings", listings.meta.total_fetched);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the connector
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Paginated fetch controller
pub mod pagination;

/// Marketplace API operations
pub mod api;

/// Connector configuration
pub mod config;

/// Request parameter validation
pub mod validate;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

pub use api::AvitoClient;
pub use config::ConnectorConfig;
pub use pagination::{
    Aggregate, CancelToken, Completion, FetchController, FetchMode, FetchOutcome, FetchPage,
    FetchSession, Page, PageResult, PaginationPolicy,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

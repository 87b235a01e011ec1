//! HTTP client module
//!
//! Provides an HTTP client tuned for the marketplace API.
//!
//! # Features
//!
//! - **Automatic Retries**: Exponential backoff for transient failures
//! - **Rate Limiting**: Token bucket rate limiter using governor, sized for
//!   the published per-minute quotas
//! - **Throttle Surfacing**: 429 responses are returned as
//!   [`crate::error::Error::RateLimited`] rather than retried, leaving
//!   throttling retries to the pagination controller
//! - **Authentication**: Integration with the auth module

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, RequestConfig, DEFAULT_BASE_URL};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

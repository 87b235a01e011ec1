//! Authentication module
//!
//! Supports: Bearer, OAuth2 Client Credentials, OAuth2 Refresh Token
//!
//! The `Authenticator` manages token caching and refresh. The marketplace
//! issues 24-hour tokens from its `/token` endpoint, with credentials in
//! the form body.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken, DEFAULT_TOKEN_URL};

#[cfg(test)]
mod tests;

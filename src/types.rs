//! Common types used throughout the Avito connector
//!
//! Shared type aliases used across modules.

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Avito account identifier
pub type UserId = u64;

/// Avito listing (ad) identifier
pub type ItemId = u64;

/// Autoload report identifier
pub type ReportId = u64;

//! Request parameter validation
//!
//! Pre-flight checks mirroring the limits the remote API enforces, so bad
//! requests fail locally with a clear message instead of a generic 400.

use crate::error::{Error, Result};
use crate::types::ItemId;
use chrono::NaiveDate;

/// Maximum item IDs accepted by the analytics and promotion endpoints
pub const MAX_ITEM_IDS: usize = 200;

/// Maximum span of an analytics date range, in days
pub const MAX_DATE_RANGE_DAYS: i64 = 270;

/// Parse a comma- or whitespace-separated list of numeric item IDs.
///
/// Rejects empty input, non-numeric entries, and lists longer than
/// [`MAX_ITEM_IDS`].
pub fn parse_item_ids(input: &str) -> Result<Vec<ItemId>> {
    let mut ids = Vec::new();
    for raw in input.split(|c: char| c == ',' || c.is_whitespace()) {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let id: ItemId = raw
            .parse()
            .map_err(|_| Error::invalid_param("item_ids", format!("'{raw}' is not a numeric ID")))?;
        ids.push(id);
    }

    if ids.is_empty() {
        return Err(Error::invalid_param("item_ids", "at least one ID required"));
    }
    if ids.len() > MAX_ITEM_IDS {
        return Err(Error::invalid_param(
            "item_ids",
            format!("at most {MAX_ITEM_IDS} IDs per request, got {}", ids.len()),
        ));
    }
    Ok(ids)
}

/// Validate an analytics date range.
///
/// Dates must be strict `YYYY-MM-DD`, ordered, and span at most
/// [`MAX_DATE_RANGE_DAYS`] days.
pub fn validate_date_range(date_from: &str, date_to: &str) -> Result<(NaiveDate, NaiveDate)> {
    let from = parse_date("date_from", date_from)?;
    let to = parse_date("date_to", date_to)?;

    if from > to {
        return Err(Error::invalid_param(
            "date_from",
            format!("{date_from} is after date_to {date_to}"),
        ));
    }

    let span = (to - from).num_days();
    if span > MAX_DATE_RANGE_DAYS {
        return Err(Error::invalid_param(
            "date_to",
            format!("range spans {span} days, maximum is {MAX_DATE_RANGE_DAYS}"),
        ));
    }

    Ok((from, to))
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(param: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| Error::invalid_param(param, format!("'{value}' is not a YYYY-MM-DD date")))
}

/// Validate a page size against an endpoint's inclusive bounds
pub fn validate_page_size(param: &str, value: u64, min: u64, max: u64) -> Result<()> {
    if value < min || value > max {
        return Err(Error::invalid_param(
            param,
            format!("must be between {min} and {max}, got {value}"),
        ));
    }
    Ok(())
}

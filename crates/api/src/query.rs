//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped with `rats_db::clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A single calendar day (`?date=YYYY-MM-DD`). Defaults to today (UTC).
#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: Option<NaiveDate>,
}

/// An inclusive date range (`?from=&to=`).
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Today's date in UTC. All day boundaries are UTC.
pub fn today_utc() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

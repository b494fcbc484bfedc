//! Event reminder-day rules.
//!
//! A reminder day is the number of days before an event's start date on
//! which a reminder fires. Lists of reminder days are always stored sorted
//! ascending without duplicates.

use chrono::{Duration, NaiveDate};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Reminder offsets a user can pick from.
pub const ALLOWED_REMINDER_DAYS: &[i32] = &[0, 1, 2, 3, 7, 14, 30];

/// Largest allowed offset, used to bound scheduler look-ahead.
pub const MAX_REMINDER_DAY: i32 = 30;

fn check_day(day: i32) -> Result<(), CoreError> {
    if ALLOWED_REMINDER_DAYS.contains(&day) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid reminder day {day}. Must be one of: {ALLOWED_REMINDER_DAYS:?}"
        )))
    }
}

/// Validate, sort and de-duplicate a list of reminder days.
pub fn normalize_reminder_days(days: &[i32]) -> Result<Vec<i32>, CoreError> {
    for &day in days {
        check_day(day)?;
    }
    let mut out = days.to_vec();
    out.sort_unstable();
    out.dedup();
    Ok(out)
}

/// Remove `day` if present, insert it otherwise. The result is sorted.
pub fn toggle_reminder_day(days: &[i32], day: i32) -> Result<Vec<i32>, CoreError> {
    check_day(day)?;
    let mut out = normalize_reminder_days(days)?;
    match out.binary_search(&day) {
        Ok(idx) => {
            out.remove(idx);
        }
        Err(idx) => out.insert(idx, day),
    }
    Ok(out)
}

/// `(reminder_day, fire_date)` pairs in firing order (earliest date first).
pub fn reminder_schedule(starts_at: Timestamp, days: &[i32]) -> Vec<(i32, NaiveDate)> {
    let event_date = starts_at.date_naive();
    let mut schedule: Vec<(i32, NaiveDate)> = days
        .iter()
        .map(|&d| (d, event_date - Duration::days(i64::from(d))))
        .collect();
    schedule.sort_by_key(|&(_, date)| date);
    schedule.dedup();
    schedule
}

/// Reminder days that fire on `today` for an event starting at `starts_at`.
///
/// Events whose start date is already in the past never fire.
pub fn due_reminder_days(starts_at: Timestamp, days: &[i32], today: NaiveDate) -> Vec<i32> {
    if starts_at.date_naive() < today {
        return Vec::new();
    }
    reminder_schedule(starts_at, days)
        .into_iter()
        .filter(|&(_, date)| date == today)
        .map(|(day, _)| day)
        .collect()
}

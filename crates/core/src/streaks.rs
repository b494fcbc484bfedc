//! Meditation streak and calendar heatmap aggregation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Minutes of practice on a single day, as returned by the progress query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPractice {
    pub date: NaiveDate,
    pub minutes: f64,
    pub sessions: i64,
}

/// One calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub minutes: f64,
    pub sessions: i64,
    /// Intensity bucket 0..=4.
    pub level: u8,
}

/// Upper bounds (exclusive, in minutes) for intensity levels 1..=3.
/// Anything at or above the last bound is level 4.
const LEVEL_BOUNDS: [f64; 3] = [10.0, 20.0, 40.0];

/// Map practice minutes to an intensity level 0..=4.
pub fn intensity_level(minutes: f64) -> u8 {
    if minutes <= 0.0 {
        return 0;
    }
    let idx = LEVEL_BOUNDS.iter().take_while(|&&b| minutes >= b).count();
    (idx + 1) as u8
}

/// Consecutive days with practice ending today.
///
/// If nothing is logged today yet, a streak ending yesterday still counts.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let set: BTreeSet<NaiveDate> = dates.iter().copied().collect();

    let mut cursor = if set.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while set.contains(&cursor) {
        streak += 1;
        cursor = cursor - Duration::days(1);
    }
    streak
}

/// Longest run of consecutive distinct dates.
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    let set: BTreeSet<NaiveDate> = dates.iter().copied().collect();

    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for date in set {
        run = match prev {
            Some(p) if date - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(date);
    }
    best
}

/// Build a zero-filled heatmap covering every day in `[from, to]`.
///
/// Returns an empty vector when `from > to`.
pub fn heatmap(days: &[DailyPractice], from: NaiveDate, to: NaiveDate) -> Vec<HeatmapCell> {
    let mut by_date: BTreeMap<NaiveDate, (f64, i64)> = BTreeMap::new();
    for d in days {
        let slot = by_date.entry(d.date).or_insert((0.0, 0));
        slot.0 += d.minutes;
        slot.1 += d.sessions;
    }

    from.iter_days()
        .take_while(|d| *d <= to)
        .map(|date| {
            let (minutes, sessions) = by_date.get(&date).copied().unwrap_or((0.0, 0));
            HeatmapCell {
                date,
                minutes,
                sessions,
                level: intensity_level(minutes),
            }
        })
        .collect()
}

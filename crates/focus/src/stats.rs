//! Focus statistics calculation
//!
//! Everything here is recomputed from the full session list on every call:
//! - Today's and all-time focused time
//! - Total distractions
//! - A zero-filled 7-day series, bucketed by local calendar day
//! - Minutes per category

use chrono::{DateTime, Duration, Local, NaiveDate};
use serde::Serialize;

use crate::category::Category;
use crate::session::SessionRecord;
use crate::store::{on_same_day, SessionStore};

/// Days in the weekly series
pub const WEEK_DAYS: usize = 7;

/// One day of the weekly series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// "16 Oct"
    pub label: String,
    pub minutes: u32,
}

/// Focused time spent on one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category_id: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub seconds: u64,
    pub minutes: u32,
}

/// A snapshot of every aggregate the reports view shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub session_count: usize,
    pub today_total_seconds: u64,
    pub all_time_total_seconds: u64,
    pub total_distractions: u64,
    pub weekly_series: Vec<DayBucket>,
    pub category_breakdown: Vec<CategoryShare>,
}

impl Report {
    /// Aggregate `records` as of `now`
    pub fn build(records: &[SessionRecord], now: DateTime<Local>) -> Self {
        Self {
            session_count: records.len(),
            today_total_seconds: daily_total(records, now),
            all_time_total_seconds: all_time_total(records),
            total_distractions: distraction_total(records),
            weekly_series: weekly_series(records, now),
            category_breakdown: category_breakdown(records),
        }
    }

    pub fn from_store(store: &SessionStore) -> Self {
        Self::build(&store.get_all(), Local::now())
    }

    /// Largest bucket of the weekly series, for chart scaling
    pub fn weekly_peak_minutes(&self) -> u32 {
        self.weekly_series.iter().map(|d| d.minutes).max().unwrap_or(0)
    }
}

/// Seconds focused on `now`'s local calendar day
pub fn daily_total(records: &[SessionRecord], now: DateTime<Local>) -> u64 {
    all_time_total(&on_same_day(records.to_vec(), now))
}

pub fn all_time_total(records: &[SessionRecord]) -> u64 {
    records.iter().map(|r| r.duration_seconds as u64).sum()
}

pub fn distraction_total(records: &[SessionRecord]) -> u64 {
    records.iter().map(|r| r.distraction_count as u64).sum()
}

/// The last seven local calendar days, oldest first, zero-filled
pub fn weekly_series(records: &[SessionRecord], now: DateTime<Local>) -> Vec<DayBucket> {
    let today = now.date_naive();
    let first = today - Duration::days(WEEK_DAYS as i64 - 1);

    let mut seconds = [0u64; WEEK_DAYS];
    for record in records {
        let offset = (record.local_date() - first).num_days();
        if (0..WEEK_DAYS as i64).contains(&offset) {
            seconds[offset as usize] += record.duration_seconds as u64;
        }
    }

    seconds
        .iter()
        .enumerate()
        .map(|(i, secs)| {
            let date = first + Duration::days(i as i64);
            DayBucket {
                date,
                label: odak_core::format::day_label(date),
                minutes: round_minutes(*secs),
            }
        })
        .collect()
}

/// Minutes per category in display order, skipping empty ones
///
/// Records with an unknown category id are not counted.
pub fn category_breakdown(records: &[SessionRecord]) -> Vec<CategoryShare> {
    Category::ALL
        .into_iter()
        .filter_map(|category| {
            let seconds: u64 = records
                .iter()
                .filter(|r| r.category() == Some(category))
                .map(|r| r.duration_seconds as u64)
                .sum();
            let minutes = round_minutes(seconds);
            (minutes > 0).then(|| CategoryShare {
                category_id: category.id(),
                label: category.label(),
                color: category.color(),
                seconds,
                minutes,
            })
        })
        .collect()
}

/// Seconds to minutes, halves rounded up
fn round_minutes(seconds: u64) -> u32 {
    ((seconds + 30) / 60) as u32
}

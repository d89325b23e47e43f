use crate::models::{format_last_update, DateRange, Mood, MoodCount, MoodCounts, MoodEntry, MoodReport};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Counts entries per mood inside `range`, in catalog order, zero-filled.
/// Moods outside the catalog and unreadable timestamps are skipped.
pub fn aggregate(table: &[MoodEntry], range: DateRange, catalog: &[Mood]) -> MoodCounts {
    let mut by_symbol: HashMap<&str, u64> = HashMap::new();
    for entry in table {
        let Some(date) = entry_date(&entry.timestamp) else {
            continue;
        };
        if range.contains(date) {
            let count = by_symbol.entry(entry.mood.as_str()).or_default();
            *count = count.saturating_add(1);
        }
    }

    catalog
        .iter()
        .map(|&mood| MoodCount {
            mood,
            symbol: mood.symbol(),
            label: mood.label(),
            count: by_symbol.get(mood.symbol()).copied().unwrap_or(0),
        })
        .collect()
}

/// Calendar date of a stored timestamp, time of day dropped.
pub fn entry_date(timestamp: &str) -> Option<NaiveDate> {
    let timestamp = timestamp.trim();
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S"))
        .map(|at| at.date())
        .or_else(|_| NaiveDate::parse_from_str(timestamp, "%Y-%m-%d"))
        .ok()
}

/// Fills in the operator's date pickers: missing values fall back to the
/// sliding window ending today, values after today are capped.
pub fn picker_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let start = start
        .unwrap_or(today - Duration::days(DEFAULT_WINDOW_DAYS))
        .min(today);
    let end = end.unwrap_or(today).min(today);
    (start, end)
}

/// `None` when the picked end date precedes the start date.
pub fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<DateRange> {
    let (start, end) = picker_dates(start, end, today);
    DateRange::new(start, end)
}

/// Wraps the counts with what the chart needs. `table` is `None` when the
/// mood log could not be loaded.
pub fn build_report(
    table: Option<&[MoodEntry]>,
    range: DateRange,
    catalog: &[Mood],
    last_update: Option<DateTime<Local>>,
) -> MoodReport {
    let counts = aggregate(table.unwrap_or_default(), range, catalog);
    let total = counts.iter().map(|c| c.count).sum::<u64>();
    let start = date_key(range.start);
    let end = date_key(range.end);

    let message = match table {
        _ if total > 0 => None,
        Some(rows) if !rows.is_empty() => Some(format!(
            "No mood data available for the selected date range ({start} to {end})"
        )),
        _ => Some("No mood data available yet.".to_string()),
    };

    MoodReport {
        title: format!("Mood Distribution ({start} to {end})"),
        start,
        end,
        counts,
        total,
        has_data: total > 0,
        message,
        last_update: last_update.map(format_last_update),
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

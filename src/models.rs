use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Column headers of the backing sheet, in storage order.
pub const HEADERS: [&str; 3] = ["timestamp", "mood", "note"];

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Neutral,
    Confused,
    Frustrated,
    Sad,
}

/// Legal moods in display order.
pub const MOOD_CATALOG: [Mood; 5] = [
    Mood::Happy,
    Mood::Neutral,
    Mood::Confused,
    Mood::Frustrated,
    Mood::Sad,
];

impl Mood {
    pub fn symbol(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Neutral => "😐",
            Mood::Confused => "😕",
            Mood::Frustrated => "😤",
            Mood::Sad => "😢",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Neutral => "Neutral",
            Mood::Confused => "Confused",
            Mood::Frustrated => "Frustrated",
            Mood::Sad => "Sad",
        }
    }

    /// Accepts either the symbol stored in the sheet or the label (any case).
    pub fn parse(value: &str) -> Option<Mood> {
        let value = value.trim();
        MOOD_CATALOG
            .into_iter()
            .find(|mood| mood.symbol() == value || mood.label().eq_ignore_ascii_case(value))
    }
}

/// One logged reading. `mood` stays a raw string because rows written by
/// other clients may carry values outside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub timestamp: String,
    pub mood: String,
    pub note: String,
}

impl MoodEntry {
    pub fn new<Tz: TimeZone>(at: DateTime<Tz>, mood: Mood, note: impl Into<String>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            mood: mood.symbol().to_string(),
            note: note.into(),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![self.timestamp.clone(), self.mood.clone(), self.note.clone()]
    }
}

pub type MoodTable = Vec<MoodEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodCount {
    pub mood: Mood,
    pub symbol: &'static str,
    pub label: &'static str,
    pub count: u64,
}

pub type MoodCounts = Vec<MoodCount>;

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    #[serde(default, deserialize_with = "optional_date")]
    pub start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct LogMoodRequest {
    pub mood: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct LogMoodForm {
    pub mood: String,
    #[serde(default)]
    pub note: String,
    #[serde(default, deserialize_with = "optional_date")]
    pub start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogMoodResponse {
    pub entry: MoodEntry,
    pub last_update: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MoodReport {
    pub start: String,
    pub end: String,
    pub title: String,
    pub counts: MoodCounts,
    pub total: u64,
    pub has_data: bool,
    pub message: Option<String>,
    pub last_update: Option<String>,
}

/// Date pickers submit an empty string when cleared.
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

pub fn format_last_update(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

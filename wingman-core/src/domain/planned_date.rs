//! Planned date domain model

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date-time format produced by date pickers (`2025-02-14T19:30`)
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A date on the user's calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedDate {
    pub id: String,
    pub title: String,
    /// Profile id; may point at a profile that has since been deleted
    #[serde(default)]
    pub person_id: String,
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
}

impl PlannedDate {
    /// Parsed date-time, if the stored text is well formed
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        parse_date_time(&self.date)
    }
}

/// Fields for a date that has not been saved yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateDraft {
    pub title: String,
    #[serde(default)]
    pub person_id: String,
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
}

impl DateDraft {
    pub fn into_date(self, id: String) -> PlannedDate {
        PlannedDate {
            id,
            title: self.title.trim().to_string(),
            person_id: self.person_id,
            date: self.date.trim().to_string(),
            location: self.location,
            notes: self.notes,
        }
    }
}

/// Parse `YYYY-MM-DDTHH:MM` (seconds optional) or a bare `YYYY-MM-DD`
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// File: ./src/model/event.rs
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Closed set of posting categories, matched case-insensitively at
/// normalization time. A missing value defaults to `Event` (the sheet's own
/// default); a non-empty value that matches nothing known becomes
/// `Unclassified`, which the expiry policy never shows.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Event,
    Recruitment,
    Unclassified,
}

impl Category {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "" | "event" => Category::Event,
            "recruitment" => Category::Recruitment,
            _ => Category::Unclassified,
        }
    }
}

/// On-duty (attendance exemption) status attached to an event.
///
/// Derived from free text by substring match. "not provided" is checked
/// before "provided" since the latter is a substring of the former.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum OdStatus {
    Provided,
    NotProvided,
    NotMentioned,
}

impl OdStatus {
    pub fn from_raw(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        if lower.is_empty() {
            return OdStatus::NotMentioned;
        }
        if lower.contains("not provided") || lower.contains("no") {
            return OdStatus::NotProvided;
        }
        if lower.contains("provided") || lower.contains("yes") {
            return OdStatus::Provided;
        }
        OdStatus::NotMentioned
    }
}

/// Canonical posting, immutable after normalization. One instance per raw
/// feed row; nothing survives past the render cycle that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub category: Category,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub venue: String,
    pub organizer: String,
    pub description: String,
    pub action_url: Option<String>,
    pub od_status: OdStatus,
    pub deadline: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

impl Event {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            category: Category::Event,
            date: None,
            start_time: None,
            end_time: None,
            venue: String::new(),
            organizer: String::new(),
            description: String::new(),
            action_url: None,
            od_status: OdStatus::NotMentioned,
            deadline: None,
            created_at: None,
        }
    }

    /// The instant at which a dated event nominally ends: the end time if
    /// given, else the start time, else end of day (23:59:59).
    pub fn effective_end(&self) -> Option<NaiveDateTime> {
        let date = self.date?;
        let time = self
            .end_time
            .or(self.start_time)
            .unwrap_or_else(end_of_day);
        Some(date.and_time(time))
    }

    /// Formatted time range for display: "start – end", or start alone.
    pub fn time_range(&self) -> Option<String> {
        let start = self.start_time?;
        Some(match self.end_time {
            Some(end) => format!("{} – {}", start.format("%H:%M"), end.format("%H:%M")),
            None => start.format("%H:%M").to_string(),
        })
    }
}

pub fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap()
}

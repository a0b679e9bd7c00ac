// File: ./src/model/normalize.rs
//! Row normalization: one raw feed row in, one canonical [`Event`] out.
//!
//! Rows arrive as string maps keyed by whatever the upstream sheet calls its
//! columns; different snapshots of the sheet disagree on the names, so each
//! canonical field resolves through an alias list. Missing or malformed
//! values degrade to empty/absent. This mapping is pure and never fails.

use crate::model::event::{end_of_day, Category, Event, OdStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;

/// A raw feed row: lower-cased source column name -> raw cell text.
pub type RawRow = HashMap<String, String>;

const NAME_KEYS: &[&str] = &["event_name", "name", "title"];
const DATE_KEYS: &[&str] = &["event_date", "date"];
const START_KEYS: &[&str] = &["start_time", "start"];
const END_KEYS: &[&str] = &["end_time", "end"];
const VENUE_KEYS: &[&str] = &["venue", "location"];
const ORGANIZER_KEYS: &[&str] = &["club", "organizer", "organiser"];
const DESCRIPTION_KEYS: &[&str] = &["description", "details"];
const URL_KEYS: &[&str] = &["url", "link", "register_url"];
const OD_KEYS: &[&str] = &["od", "od_status"];
const CATEGORY_KEYS: &[&str] = &["type", "category"];
const DEADLINE_KEYS: &[&str] = &["deadline"];
const CREATED_KEYS: &[&str] = &["created", "created_at", "timestamp"];

fn field(row: &RawRow, keys: &[&str]) -> String {
    for key in keys {
        if let Some(value) = row.get(*key) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    String::new()
}

/// Parse a wall-clock time in either 12-hour (`H[:MM][ ]AM/PM`, any case)
/// or 24-hour (`HH:MM[:SS]`) form. Anything else is absent, never an error.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    if let Some(body) = lower.strip_suffix("am").or_else(|| lower.strip_suffix("pm")) {
        let is_pm = lower.ends_with("pm");
        let body = body.trim();
        let (hour_str, minute_str) = match body.split_once(':') {
            Some((h, m)) => (h.trim(), m.trim()),
            None => (body, "0"),
        };
        let hour: u32 = hour_str.parse().ok()?;
        let minute: u32 = minute_str.parse().ok()?;
        if hour == 0 || hour > 12 || minute > 59 {
            return None;
        }
        let hour24 = match (is_pm, hour) {
            (true, 12) => 12,
            (true, h) => h + 12,
            (false, 12) => 0,
            (false, h) => h,
        };
        return NaiveTime::from_hms_opt(hour24, minute, 0);
    }

    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .ok()
}

/// Parse a civil date. Accepts ISO and a handful of regional spellings seen
/// in the sheet, plus date-time strings whose leading segment is ISO.
pub fn parse_civil_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    // "2025-03-01T18:00:00.000Z" and friends: the first ten chars are a date.
    if let Some(prefix) = trimmed.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }
    None
}

/// Parse an absolute timestamp onto the naive civil axis the whole crate
/// compares on. RFC 3339 offsets are dropped (taken at face value); a bare
/// date reads as the end of that day.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    parse_civil_date(trimmed).map(|d| d.and_time(end_of_day()))
}

/// True for names that mark a row as filler rather than a posting.
/// The controller drops such rows after normalization.
pub fn is_placeholder_name(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    lower.is_empty() || matches!(lower.as_str(), "-" | "–" | "n/a" | "na" | "tbd")
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Map one raw row into the canonical model. Pure; total.
pub fn normalize_row(row: &RawRow) -> Event {
    Event {
        name: field(row, NAME_KEYS),
        category: Category::from_raw(&field(row, CATEGORY_KEYS)),
        date: parse_civil_date(&field(row, DATE_KEYS)),
        start_time: parse_clock_time(&field(row, START_KEYS)),
        end_time: parse_clock_time(&field(row, END_KEYS)),
        venue: field(row, VENUE_KEYS),
        organizer: field(row, ORGANIZER_KEYS),
        description: field(row, DESCRIPTION_KEYS),
        action_url: non_empty(field(row, URL_KEYS)),
        od_status: OdStatus::from_raw(&field(row, OD_KEYS)),
        deadline: parse_timestamp(&field(row, DEADLINE_KEYS)),
        created_at: parse_timestamp(&field(row, CREATED_KEYS)),
    }
}

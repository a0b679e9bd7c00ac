// File: ./src/calendar_link.rs
//! Calendar deep-link formatting.
//!
//! Produces the canonical `YYYYMMDDTHHMMSS` start/end pair plus the text
//! fields an external calendar template needs. Pure string work; opening the
//! link is the renderer's business.

use crate::model::event::Event;
use chrono::{NaiveTime, Timelike};

/// A render-ready calendar entry for one posting.
///
/// Only exists when the posting has both a date and a start time; a start
/// time is never fabricated. A missing end time defaults to start + 1 hour
/// with the hour wrapping inside 0-23 (no day rollover; known limitation,
/// matches the upstream behavior).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSlot {
    pub start: String,
    pub end: String,
    pub title: String,
    pub details: String,
    pub location: String,
}

impl CalendarSlot {
    pub fn for_event(event: &Event) -> Option<Self> {
        let date = event.date?;
        let start_time = event.start_time?;
        let end_time = event.end_time.unwrap_or_else(|| {
            NaiveTime::from_hms_opt((start_time.hour() + 1) % 24, start_time.minute(), 0)
                .unwrap_or(start_time)
        });

        let stamp = |t: NaiveTime| format!("{}T{}", date.format("%Y%m%d"), t.format("%H%M%S"));

        Some(Self {
            start: stamp(start_time),
            end: stamp(end_time),
            title: event.name.clone(),
            details: event.description.clone(),
            location: event.venue.clone(),
        })
    }

    /// The canonical Google Calendar template URL.
    pub fn google_url(&self) -> String {
        format!(
            "https://calendar.google.com/calendar/render?action=TEMPLATE&text={}&dates={}%2F{}&details={}&location={}",
            encode_query_component(&self.title),
            self.start,
            self.end,
            encode_query_component(&self.details),
            encode_query_component(&self.location),
        )
    }
}

/// Form-style query encoding: unreserved ASCII passes through, space becomes
/// `+`, everything else is percent-encoded byte-wise (UTF-8).
pub fn encode_query_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'*' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

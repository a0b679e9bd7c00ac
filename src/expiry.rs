// File: ./src/expiry.rs
//! Visibility policy: decides whether a posting is still worth showing at a
//! given instant.
//!
//! The rules are fail-closed (malformed data expires rather than lingering)
//! and total (no input can make the decision fail). Upstream data entry is
//! inconsistent, so postings lacking explicit end data fall back to
//! configurable windows instead of staying up forever.

use crate::config::Config;
use crate::model::event::{end_of_day, Category, Event};
use chrono::{Days, NaiveDateTime};

#[derive(Debug, Clone, Copy)]
pub struct ExpiryPolicy {
    /// Extra whole days a dated event stays visible past its effective end.
    pub grace_days: u32,
    /// Visibility window for events with no date, anchored at `created_at`.
    pub undated_event_window_days: u32,
    /// Visibility window for recruitments with no deadline.
    pub recruitment_window_days: u32,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            grace_days: 0,
            undated_event_window_days: 3,
            recruitment_window_days: 7,
        }
    }
}

impl ExpiryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            grace_days: config.grace_days,
            undated_event_window_days: config.undated_event_window_days,
            recruitment_window_days: config.recruitment_window_days,
        }
    }

    /// True while `event` should still be displayed at `now`.
    ///
    /// `now` is captured once per render cycle by the controller and threaded
    /// through every evaluation in that cycle, so a cycle cannot straddle an
    /// expiry boundary.
    pub fn is_visible(&self, event: &Event, now: NaiveDateTime) -> bool {
        match event.category {
            Category::Event => self.event_visible(event, now),
            Category::Recruitment => self.recruitment_visible(event, now),
            // Never display data that could not be classified.
            Category::Unclassified => false,
        }
    }

    fn event_visible(&self, event: &Event, now: NaiveDateTime) -> bool {
        match event.effective_end() {
            Some(end) => {
                let cutoff = end
                    .checked_add_days(Days::new(self.grace_days as u64))
                    .unwrap_or(end);
                now <= cutoff
            }
            // No date at all: only a recent creation stamp keeps it up.
            None => match event.created_at {
                Some(created) => {
                    now <= window_end(created, self.undated_event_window_days)
                }
                None => false,
            },
        }
    }

    fn recruitment_visible(&self, event: &Event, now: NaiveDateTime) -> bool {
        if let Some(deadline) = event.deadline {
            return now <= deadline;
        }
        let anchor = event
            .created_at
            .or_else(|| event.date.map(|d| d.and_hms_opt(0, 0, 0).unwrap()))
            .unwrap_or(now);
        now <= window_end(anchor, self.recruitment_window_days)
    }
}

/// End of day, `days` whole days after the anchor's date.
fn window_end(anchor: NaiveDateTime, days: u32) -> NaiveDateTime {
    let date = anchor
        .date()
        .checked_add_days(Days::new(days as u64))
        .unwrap_or_else(|| anchor.date());
    date.and_time(end_of_day())
}

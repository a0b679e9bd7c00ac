// File: ./src/controller.rs
//! One fetch-normalize-filter-group-project cycle.
//!
//! The controller owns no cross-cycle state: every cycle captures a single
//! `now`, builds fresh model data, and hands back a complete render tree.
//! Only the fetch can fail; everything after it is total.

use crate::expiry::ExpiryPolicy;
use crate::model::event::Event;
use crate::model::normalize::{is_placeholder_name, normalize_row, RawRow};
use crate::projector::{project, EmptyReason, RenderTree};
use crate::schedule::build_schedule;
use crate::source::{EventSource, FetchError};
use chrono::{Local, NaiveDateTime};

pub struct FeedController<S: EventSource> {
    source: S,
    policy: ExpiryPolicy,
}

impl<S: EventSource> FeedController<S> {
    pub fn new(source: S, policy: ExpiryPolicy) -> Self {
        Self { source, policy }
    }

    /// Run one full cycle against the current wall clock.
    pub async fn run_cycle(&self) -> Result<RenderTree, FetchError> {
        let rows = self.source.fetch().await?;
        let now = Local::now().naive_local();
        Ok(self.cycle_at(rows, now))
    }

    /// The pure tail of the cycle; `now` is fixed for the whole pass.
    pub fn cycle_at(&self, rows: Vec<RawRow>, now: NaiveDateTime) -> RenderTree {
        let events: Vec<Event> = rows
            .iter()
            .map(normalize_row)
            .filter(|e| !is_placeholder_name(&e.name))
            .collect();
        let usable = events.len();

        let visible: Vec<Event> = events
            .into_iter()
            .filter(|e| self.policy.is_visible(e, now))
            .collect();
        log::info!(
            "cycle at {now}: {} raw rows, {usable} usable, {} visible",
            rows.len(),
            visible.len()
        );

        let empty_reason = if usable == 0 {
            EmptyReason::NoData
        } else {
            EmptyReason::AllFiltered
        };

        let schedule = build_schedule(visible);
        project(&schedule, empty_reason)
    }
}

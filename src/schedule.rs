// File: ./src/schedule.rs
//! Grouping and ordering of visible postings into the display schedule.
//!
//! Recruitments form one flat stream kept apart from dated events. Events
//! group by calendar date; dated groups sort ascending with the undated
//! group pinned last. Inside a group, entries sort by start time (stable,
//! missing start last) so the display order is deterministic.

use crate::model::event::{Category, Event};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Date(NaiveDate),
    Undated,
    Recruitment,
}

impl GroupKey {
    /// Long-form heading for dated groups ("Saturday, 1 March"); the undated
    /// and recruitment pseudo-groups carry none.
    pub fn heading(&self) -> Option<String> {
        match self {
            GroupKey::Date(date) => Some(date.format("%A, %-d %B").to_string()),
            GroupKey::Undated | GroupKey::Recruitment => None,
        }
    }
}

/// One ordered run of postings sharing a group key. Built fresh each render
/// cycle and discarded with it.
#[derive(Debug, Clone)]
pub struct DisplayGroup {
    pub key: GroupKey,
    pub events: Vec<Event>,
}

/// The full ordered schedule: dated groups ascending, then undated, then the
/// recruitment stream. Groups with no members are omitted.
pub fn build_schedule(visible: Vec<Event>) -> Vec<DisplayGroup> {
    let mut dated: BTreeMap<NaiveDate, Vec<Event>> = BTreeMap::new();
    let mut undated: Vec<Event> = Vec::new();
    let mut recruitments: Vec<Event> = Vec::new();

    for event in visible {
        match (event.category, event.date) {
            (Category::Recruitment, _) => recruitments.push(event),
            (Category::Event, Some(date)) => dated.entry(date).or_default().push(event),
            (Category::Event, None) => undated.push(event),
            // Unclassified rows are filtered out upstream; drop any stray.
            (Category::Unclassified, _) => {}
        }
    }

    let mut groups: Vec<DisplayGroup> = Vec::new();
    for (date, mut events) in dated {
        sort_by_start(&mut events);
        groups.push(DisplayGroup {
            key: GroupKey::Date(date),
            events,
        });
    }
    if !undated.is_empty() {
        sort_by_start(&mut undated);
        groups.push(DisplayGroup {
            key: GroupKey::Undated,
            events: undated,
        });
    }
    if !recruitments.is_empty() {
        // Input order preserved: the sheet itself is the ordering authority.
        groups.push(DisplayGroup {
            key: GroupKey::Recruitment,
            events: recruitments,
        });
    }
    groups
}

fn sort_by_start(events: &mut [Event]) {
    events.sort_by(|a, b| match (a.start_time, b.start_time) {
        (Some(t1), Some(t2)) => t1.cmp(&t2),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn dated(name: &str, y: i32, m: u32, d: u32) -> Event {
        let mut e = Event::named(name);
        e.date = NaiveDate::from_ymd_opt(y, m, d);
        e
    }

    #[test]
    fn groups_sort_ascending_with_undated_last() {
        let input = vec![
            dated("later", 2025, 1, 10),
            Event::named("floating"),
            dated("sooner", 2025, 1, 5),
        ];
        let schedule = build_schedule(input);
        let keys: Vec<GroupKey> = schedule.iter().map(|g| g.key).collect();
        assert_eq!(
            keys,
            vec![
                GroupKey::Date(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()),
                GroupKey::Date(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()),
                GroupKey::Undated,
            ]
        );
    }

    #[test]
    fn within_group_start_time_order_missing_last() {
        let mut late = dated("late", 2025, 1, 5);
        late.start_time = NaiveTime::from_hms_opt(18, 0, 0);
        let mut early = dated("early", 2025, 1, 5);
        early.start_time = NaiveTime::from_hms_opt(9, 0, 0);
        let timeless = dated("timeless", 2025, 1, 5);

        let schedule = build_schedule(vec![timeless, late, early]);
        assert_eq!(schedule.len(), 1);
        let names: Vec<&str> = schedule[0].events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["early", "late", "timeless"]);
    }

    #[test]
    fn recruitments_keep_input_order_and_sit_last() {
        let mut r1 = Event::named("first");
        r1.category = Category::Recruitment;
        let mut r2 = Event::named("second");
        r2.category = Category::Recruitment;

        let schedule = build_schedule(vec![r1, dated("e", 2025, 1, 5), r2]);
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[1].key, GroupKey::Recruitment);
        let names: Vec<&str> = schedule[1].events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn headings_only_for_dated_groups() {
        let key = GroupKey::Date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(key.heading().as_deref(), Some("Saturday, 1 March"));
        assert_eq!(GroupKey::Undated.heading(), None);
        assert_eq!(GroupKey::Recruitment.heading(), None);
    }
}

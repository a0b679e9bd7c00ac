// End-to-end pipeline tests: raw rows in, render tree out.
use bulletin::controller::FeedController;
use bulletin::expiry::ExpiryPolicy;
use bulletin::model::RawRow;
use bulletin::projector::{RenderNode, Renderer, TextRenderer};
use bulletin::source::StaticSource;
use chrono::{NaiveDate, NaiveDateTime};

fn row(pairs: &[(&str, &str)]) -> RawRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn controller() -> FeedController<StaticSource> {
    FeedController::new(StaticSource::default(), ExpiryPolicy::default())
}

fn card_names(nodes: &[RenderNode]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|n| match n {
            RenderNode::Card { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn mixed_feed_renders_only_visible_postings() {
    let now = noon(2025, 3, 1);
    let rows = vec![
        row(&[
            ("event_name", "Yesterday's Workshop"),
            ("event_date", "2025-02-28"),
            ("start_time", "10 AM"),
            ("end_time", "12 PM"),
        ]),
        row(&[
            ("event_name", "Tomorrow's Hackathon"),
            ("event_date", "2025-03-02"),
            ("start_time", "9 AM"),
        ]),
        row(&[
            ("event_name", "Join The Media Cell"),
            ("type", "recruitment"),
            ("deadline", "2025-03-15"),
        ]),
    ];

    let tree = controller().cycle_at(rows, now);

    // Exactly one dated heading (tomorrow) and one event card.
    let headings: Vec<&str> = tree
        .events
        .iter()
        .filter_map(|n| match n {
            RenderNode::Heading { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(headings, vec!["Sunday, 2 March"]);
    assert_eq!(card_names(&tree.events), vec!["Tomorrow's Hackathon"]);
    assert_eq!(card_names(&tree.recruitments), vec!["Join The Media Cell"]);
}

#[test]
fn tomorrow_card_carries_a_calendar_slot() {
    let now = noon(2025, 3, 1);
    let rows = vec![row(&[
        ("event_name", "Tomorrow's Hackathon"),
        ("event_date", "2025-03-02"),
        ("start_time", "9 AM"),
        ("venue", "Block C"),
    ])];

    let tree = controller().cycle_at(rows, now);
    let RenderNode::Card { calendar, .. } = &tree.events[1] else {
        panic!("expected a card after the heading");
    };
    let slot = calendar.as_ref().expect("date + start time => slot");
    assert_eq!(slot.start, "20250302T090000");
    assert_eq!(slot.end, "20250302T100000");
    assert!(slot.google_url().contains("location=Block+C"));
}

#[test]
fn everything_filtered_leaves_one_empty_state_per_lane() {
    let now = noon(2025, 3, 1);
    let rows = vec![row(&[
        ("event_name", "Long Gone"),
        ("event_date", "2024-01-01"),
    ])];

    let tree = controller().cycle_at(rows, now);
    assert!(matches!(
        tree.events.as_slice(),
        [RenderNode::EmptyState { .. }]
    ));
    assert!(matches!(
        tree.recruitments.as_slice(),
        [RenderNode::EmptyState { .. }]
    ));
}

#[test]
fn grace_period_config_changes_the_verdict() {
    // Ended an hour ago.
    let now = noon(2025, 3, 1);
    let rows = vec![row(&[
        ("event_name", "Just Ended"),
        ("event_date", "2025-03-01"),
        ("end_time", "11 AM"),
    ])];

    let strict = FeedController::new(StaticSource::default(), ExpiryPolicy::default());
    assert!(card_names(&strict.cycle_at(rows.clone(), now).events).is_empty());

    let lenient = FeedController::new(
        StaticSource::default(),
        ExpiryPolicy {
            grace_days: 1,
            ..ExpiryPolicy::default()
        },
    );
    assert_eq!(
        card_names(&lenient.cycle_at(rows, now).events),
        vec!["Just Ended"]
    );
}

#[tokio::test]
async fn static_source_cycle_runs_end_to_end() {
    let source = StaticSource {
        rows: vec![row(&[("event_name", "Standing Invite"), ("type", "recruitment")])],
    };
    // No deadline and no stamps: the fallback window anchors at "now", so
    // the posting is visible whatever the wall clock says.
    let controller = FeedController::new(source, ExpiryPolicy::default());
    let tree = controller.run_cycle().await.unwrap();
    assert_eq!(card_names(&tree.recruitments), vec!["Standing Invite"]);
}

#[test]
fn text_renderer_materializes_both_lanes() {
    let now = noon(2025, 3, 1);
    let rows = vec![row(&[
        ("event_name", "Tomorrow's Hackathon"),
        ("event_date", "2025-03-02"),
        ("start_time", "9 AM"),
        ("od", "provided"),
    ])];

    let tree = controller().cycle_at(rows, now);
    let mut renderer = TextRenderer::new(Vec::new());
    renderer.render(&tree).unwrap();
    let printed = String::from_utf8(renderer.into_inner()).unwrap();

    assert!(printed.contains("== Events =="));
    assert!(printed.contains("Sunday, 2 March"));
    assert!(printed.contains("* Tomorrow's Hackathon"));
    assert!(printed.contains("[OD Provided]"));
    assert!(printed.contains("No recruitments right now."));
}

// File: ./src/projector.rs
//! Projection of the grouped schedule into a declarative render tree.
//!
//! Nothing here touches a display surface: the projector emits plain data
//! (`RenderTree`) and a `Renderer` collaborator materializes it. The tree has
//! two lanes mirroring the page's two containers, one for dated/undated
//! events and one for the recruitment stream.

use crate::calendar_link::CalendarSlot;
use crate::model::event::{Event, OdStatus};
use crate::schedule::{DisplayGroup, GroupKey};
use std::io::{self, Write};

/// Why the events lane can be empty; the message differs but the control
/// path is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The feed had no event rows at all.
    NoData,
    /// Rows existed but every one was filtered out as expired.
    AllFiltered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OdBadge {
    pub text: &'static str,
    pub class: &'static str,
}

impl OdBadge {
    fn for_status(status: OdStatus) -> Option<Self> {
        match status {
            OdStatus::Provided => Some(Self {
                text: "OD Provided",
                class: "od-provided",
            }),
            OdStatus::NotProvided => Some(Self {
                text: "No OD",
                class: "od-none",
            }),
            OdStatus::NotMentioned => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Heading {
        text: String,
    },
    Card {
        name: String,
        organizer: String,
        description: String,
        venue: String,
        time_range: Option<String>,
        od_badge: Option<OdBadge>,
        register_url: Option<String>,
        calendar: Option<CalendarSlot>,
    },
    EmptyState {
        message: String,
    },
}

/// Declarative output of one render cycle. Owned by the cycle, replaced
/// wholesale by the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTree {
    pub events: Vec<RenderNode>,
    pub recruitments: Vec<RenderNode>,
}

/// Consumes a finished tree. Implementations must replace any previously
/// displayed content before inserting the new nodes, so the viewer never
/// sees a half-updated mix.
pub trait Renderer {
    fn render(&mut self, tree: &RenderTree) -> anyhow::Result<()>;

    /// Called once per card after the tree is materialized; display layers
    /// that support entry animation hook it here. Stateless by contract.
    fn on_node_mounted(&mut self, _node: &RenderNode) {}
}

/// Strip inline-image placeholder markup from free-text descriptions:
/// markdown images (`![alt](url)`) and bare `[image]` / `[img]` / `[img:…]`
/// tokens. Everything else passes through untouched.
pub fn strip_inline_images(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(['!', '[']) {
        let (before, tail) = rest.split_at(pos);
        out.push_str(before);
        if let Some(skip) = image_token_len(tail) {
            rest = &tail[skip..];
        } else {
            let mut chars = tail.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Length of an image placeholder starting at the head of `s`, if any.
fn image_token_len(s: &str) -> Option<usize> {
    if s.starts_with("![") {
        // ![alt](url)
        let close = s.find(']')?;
        let tail = &s[close + 1..];
        if tail.starts_with('(') {
            let paren = tail.find(')')?;
            return Some(close + 1 + paren + 1);
        }
        return None;
    }
    if s.starts_with('[') {
        let close = s.find(']')?;
        let inner = s[1..close].trim().to_lowercase();
        if inner == "image" || inner == "img" || inner.starts_with("img:") {
            return Some(close + 1);
        }
    }
    None
}

fn card_for(event: &Event) -> RenderNode {
    RenderNode::Card {
        name: event.name.clone(),
        organizer: event.organizer.clone(),
        description: strip_inline_images(&event.description),
        venue: event.venue.clone(),
        time_range: event.time_range(),
        od_badge: OdBadge::for_status(event.od_status),
        register_url: event.action_url.clone(),
        calendar: CalendarSlot::for_event(event),
    }
}

fn empty_events_message(reason: EmptyReason) -> String {
    match reason {
        EmptyReason::NoData => "No upcoming events.".to_string(),
        EmptyReason::AllFiltered => "No upcoming events. You're all caught up.".to_string(),
    }
}

/// Turn the ordered schedule into a render tree. An empty events lane gets a
/// single empty-state node whose wording depends on `empty_reason`; an empty
/// recruitment lane likewise.
pub fn project(schedule: &[DisplayGroup], empty_reason: EmptyReason) -> RenderTree {
    let mut events: Vec<RenderNode> = Vec::new();
    let mut recruitments: Vec<RenderNode> = Vec::new();

    for group in schedule {
        match group.key {
            GroupKey::Recruitment => {
                recruitments.extend(group.events.iter().map(card_for));
            }
            _ => {
                if let Some(text) = group.key.heading() {
                    events.push(RenderNode::Heading { text });
                }
                events.extend(group.events.iter().map(card_for));
            }
        }
    }

    if events.is_empty() {
        events.push(RenderNode::EmptyState {
            message: empty_events_message(empty_reason),
        });
    }
    if recruitments.is_empty() {
        recruitments.push(RenderNode::EmptyState {
            message: "No recruitments right now.".to_string(),
        });
    }

    RenderTree {
        events,
        recruitments,
    }
}

// --- Plain-text materialization ---

/// Writes an indented text rendition of the tree; the default display
/// surface for the one-shot binary, and a convenient test target.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl TextRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lane(&mut self, title: &str, nodes: &[RenderNode]) -> anyhow::Result<()> {
        writeln!(self.out, "== {title} ==")?;
        for node in nodes {
            match node {
                RenderNode::Heading { text } => writeln!(self.out, "\n{text}")?,
                RenderNode::EmptyState { message } => writeln!(self.out, "  {message}")?,
                RenderNode::Card {
                    name,
                    organizer,
                    description,
                    venue,
                    time_range,
                    od_badge,
                    register_url,
                    calendar,
                } => {
                    writeln!(self.out, "  * {name}")?;
                    if !organizer.is_empty() {
                        writeln!(self.out, "    by {organizer}")?;
                    }
                    if !description.is_empty() {
                        writeln!(self.out, "    {description}")?;
                    }
                    if !venue.is_empty() {
                        writeln!(self.out, "    at {venue}")?;
                    }
                    if let Some(range) = time_range {
                        writeln!(self.out, "    {range}")?;
                    }
                    if let Some(badge) = od_badge {
                        writeln!(self.out, "    [{}]", badge.text)?;
                    }
                    if let Some(url) = register_url {
                        writeln!(self.out, "    register: {url}")?;
                    }
                    if let Some(slot) = calendar {
                        writeln!(self.out, "    calendar: {}", slot.google_url())?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, tree: &RenderTree) -> anyhow::Result<()> {
        self.write_lane("Events", &tree.events)?;
        writeln!(self.out)?;
        self.write_lane("Recruitments", &tree.recruitments)?;
        for node in tree.events.iter().chain(&tree.recruitments) {
            self.on_node_mounted(node);
        }
        Ok(())
    }
}

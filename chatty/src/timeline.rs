//! Day-grouped message timeline.
//!
//! Messages arrive from the store already ordered by send time. The builder
//! buckets them by calendar day in the viewer's time zone and keeps both the
//! delivery order inside a day and the first-seen order of the days
//! themselves. Nothing is re-sorted here.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::models::{Message, UserId};

/// Day label format, e.g. "March 04, 2024".
pub const DATE_FORMAT: &str = "%B %d, %Y";

/// Bubble time format, 24-hour.
pub const TIME_FORMAT: &str = "%H:%M";

/// One message placed in the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub message: Message,
    /// Whether the viewer sent this message.
    pub is_own: bool,
    /// Send time as "HH:MM".
    pub time: String,
}

/// Messages sharing one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroup {
    pub label: String,
    pub entries: Vec<TimelineEntry>,
}

/// A row of the rendered timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineItem<'a> {
    DayHeader(&'a str),
    Bubble(&'a TimelineEntry),
}

/// Display-ready conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub groups: Vec<DayGroup>,
}

impl Timeline {
    /// Check if the timeline has no messages.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.entries.is_empty())
    }

    /// Number of messages across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    /// Day labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.label.as_str()).collect()
    }

    /// Flatten into rows: each day header followed by its bubbles.
    pub fn items(&self) -> Vec<TimelineItem<'_>> {
        let mut items = Vec::with_capacity(self.groups.len() + self.len());
        for group in &self.groups {
            items.push(TimelineItem::DayHeader(&group.label));
            items.extend(group.entries.iter().map(TimelineItem::Bubble));
        }
        items
    }
}

fn to_zone<Tz: TimeZone>(ms: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.with_timezone(tz))
}

/// Format a timestamp as a day label in the given zone.
pub fn format_date<Tz: TimeZone>(ms: i64, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    match to_zone(ms, tz) {
        Some(dt) => dt.format(DATE_FORMAT).to_string(),
        None => "-".to_string(),
    }
}

/// Format a timestamp as "HH:MM" in the given zone.
pub fn time_stamp<Tz: TimeZone>(ms: i64, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    match to_zone(ms, tz) {
        Some(dt) => dt.format(TIME_FORMAT).to_string(),
        None => "-".to_string(),
    }
}

/// Current wall-clock time in milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Build the timeline in the local time zone.
pub fn build_timeline(messages: &[Message], viewer: &UserId) -> Timeline {
    build_timeline_in(messages, viewer, &Local, now_millis())
}

/// Build the timeline in `tz`, using `now_ms` for messages without a
/// timestamp.
pub fn build_timeline_in<Tz: TimeZone>(
    messages: &[Message],
    viewer: &UserId,
    tz: &Tz,
    now_ms: i64,
) -> Timeline
where
    Tz::Offset: fmt::Display,
{
    let mut groups: Vec<DayGroup> = Vec::new();
    let mut index: HashMap<Option<NaiveDate>, usize> = HashMap::new();

    for message in messages {
        let ms = message.timestamp_or(now_ms);
        let day = to_zone(ms, tz).map(|dt| dt.date_naive());

        let slot = *index.entry(day).or_insert_with(|| {
            groups.push(DayGroup {
                label: format_date(ms, tz),
                entries: Vec::new(),
            });
            groups.len() - 1
        });

        groups[slot].entries.push(TimelineEntry {
            message: message.clone(),
            is_own: message.is_from(viewer),
            time: time_stamp(ms, tz),
        });
    }

    Timeline { groups }
}

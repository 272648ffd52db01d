//! Schedule domain types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Timestamp format used for slots sent back to clients.
pub const SLOT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Whose calendar an event operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleScope {
    Personal,
    Group(i64),
}

impl ScheduleScope {
    /// Group scope when a non-zero group id is present, personal otherwise.
    pub const fn from_group(group_id: Option<i64>) -> Self {
        match group_id {
            Some(id) if id != 0 => Self::Group(id),
            _ => Self::Personal,
        }
    }

    /// Collection endpoint on the main server.
    pub fn events_path(&self) -> String {
        match self {
            Self::Personal => "/api/users/me/events".to_string(),
            Self::Group(id) => format!("/api/groups/{id}/events"),
        }
    }

    /// Endpoint of a single event.
    pub fn event_path(&self, event_id: i64) -> String {
        format!("{}/{event_id}", self.events_path())
    }

    /// Owner type label (`PERSONAL` / `GROUP`).
    pub const fn owner_type(&self) -> &'static str {
        match self {
            Self::Personal => "PERSONAL",
            Self::Group(_) => "GROUP",
        }
    }

    pub const fn group_id(&self) -> Option<i64> {
        match self {
            Self::Personal => None,
            Self::Group(id) => Some(*id),
        }
    }
}

/// Payload for a new calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub start_datetime: String,
    pub end_datetime: String,
    pub all_day: bool,
    pub theme_color: String,
}

impl NewEvent {
    /// Default theme colour for events created through the assistant.
    pub const THEME_COLOR: &'static str = "#3b82f6";

    pub fn timed(
        title: impl Into<String>,
        start_datetime: impl Into<String>,
        end_datetime: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_datetime: start_datetime.into(),
            end_datetime: end_datetime.into(),
            all_day: false,
            theme_color: Self::THEME_COLOR.to_string(),
        }
    }
}

/// Partial update of an event; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_datetime: Option<String>,
}

impl EventChanges {
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.start_datetime.is_none() && self.end_datetime.is_none()
    }
}

/// A period during which at least one member is busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BusyInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A meeting slot every member can attend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    #[serde(serialize_with = "serialize_slot_time")]
    pub start: NaiveDateTime,
    #[serde(serialize_with = "serialize_slot_time")]
    pub end: NaiveDateTime,
}

fn serialize_slot_time<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&value.format(SLOT_FORMAT))
}

/// Parse an ISO-8601 timestamp or a bare date.
///
/// Offsets are dropped and the wall-clock time is kept. Bare dates map to
/// midnight.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

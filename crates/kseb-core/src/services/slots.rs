//! Common free-time search for group meetings.
//!
//! Busy periods of every member are collapsed into merged intervals, then a
//! cursor walks the search window in 30-minute steps inside working hours,
//! jumping over busy periods. The resulting candidates are thinned to a
//! spread of mornings and afternoons across days.

use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde_json::Value;

use crate::domain::{BusyInterval, TimeSlot, parse_datetime};

/// First hour a meeting may start.
pub const WINDOW_START_HOUR: u32 = 9;

/// Hour by which a meeting must end.
pub const WINDOW_END_HOUR: u32 = 22;

/// Upper bound on returned recommendations.
pub const MAX_RECOMMENDATIONS: usize = 9;

/// Slots starting before this hour count as morning.
const AFTERNOON_HOUR: u32 = 14;

const STEP_MINUTES: i64 = 30;

fn at_hour(day: NaiveDate, hour: u32) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour))
}

/// First non-empty string among `keys`.
fn str_field<'a>(event: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| event.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

/// First non-empty array among `keys`.
fn event_list<'a>(data: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .filter_map(|key| data.get(*key).and_then(Value::as_array))
        .find(|list| !list.is_empty())
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Extract busy intervals from a group schedule bundle.
///
/// Events are read from `data` when present, otherwise from the root, under
/// `personalEvents`/`personal_events` and `groupEvents`/`group_events`.
pub fn busy_intervals(bundle: &Value) -> Vec<BusyInterval> {
    let data = bundle
        .get("data")
        .filter(|d| d.is_object())
        .unwrap_or(bundle);

    let personal = event_list(data, &["personalEvents", "personal_events"]);
    let group = event_list(data, &["groupEvents", "group_events"]);

    let mut intervals = Vec::with_capacity(personal.len() + group.len());
    for event in personal.iter().chain(group) {
        let (Some(start_raw), Some(end_raw)) = (
            str_field(event, &["start", "startDatetime"]),
            str_field(event, &["end", "endDatetime"]),
        ) else {
            continue;
        };

        let (Some(start), Some(end)) = (parse_datetime(start_raw), parse_datetime(end_raw)) else {
            tracing::warn!(start = start_raw, end = end_raw, "Skipping event with unparsable time");
            continue;
        };

        let all_day = event.get("allDay").and_then(Value::as_bool).unwrap_or(false);
        if all_day {
            intervals.push(BusyInterval {
                start: at_hour(start.date(), WINDOW_START_HOUR),
                end: at_hour(start.date(), WINDOW_END_HOUR),
            });
        } else {
            intervals.push(BusyInterval { start, end });
        }
    }
    intervals
}

/// Sort intervals and merge those that overlap.
///
/// Intervals that merely touch stay separate.
pub fn merge_busy(mut intervals: Vec<BusyInterval>) -> Vec<BusyInterval> {
    intervals.sort_by_key(|b| b.start);

    let mut merged: Vec<BusyInterval> = Vec::with_capacity(intervals.len());
    for current in intervals {
        match merged.last_mut() {
            Some(last) if current.start < last.end => {
                last.end = last.end.max(current.end);
            }
            _ => merged.push(current),
        }
    }
    merged
}

/// Every free slot of `duration` inside working hours, in time order.
fn scan_slots(
    busy: &[BusyInterval],
    search_start: NaiveDateTime,
    search_end: NaiveDateTime,
    duration: Duration,
) -> Vec<TimeSlot> {
    let step = Duration::minutes(STEP_MINUTES);
    let mut slots = Vec::new();
    let mut cursor = at_hour(search_start.date(), WINDOW_START_HOUR);

    while cursor < search_end {
        let Some(end) = cursor.checked_add_signed(duration) else {
            break;
        };
        let day_end = at_hour(cursor.date(), WINDOW_END_HOUR);

        if let Some(blocking) = busy.iter().find(|b| cursor < b.end && end > b.start) {
            cursor = blocking.end;
            continue;
        }

        if cursor.hour() < WINDOW_START_HOUR {
            // Busy check runs again for the clamped time.
            cursor = at_hour(cursor.date(), WINDOW_START_HOUR);
            continue;
        }

        if end <= day_end {
            slots.push(TimeSlot { start: cursor, end });
        }

        let Some(next) = cursor.checked_add_signed(step) else {
            break;
        };
        cursor = next;
        if cursor.hour() >= WINDOW_END_HOUR {
            let Some(next_day) = cursor.date().succ_opt() else {
                break;
            };
            cursor = at_hour(next_day, WINDOW_START_HOUR);
        }
    }
    slots
}

/// Pick a varied subset: each day's first morning and first afternoon slot,
/// then the earliest remaining slots.
fn pick_recommendations(slots: &[TimeSlot]) -> Vec<TimeSlot> {
    let mut by_day: BTreeMap<NaiveDate, (Option<TimeSlot>, Option<TimeSlot>)> = BTreeMap::new();
    for slot in slots {
        let entry = by_day.entry(slot.start.date()).or_default();
        if slot.start.hour() < AFTERNOON_HOUR {
            entry.0.get_or_insert(*slot);
        } else {
            entry.1.get_or_insert(*slot);
        }
    }

    let mut picks: Vec<TimeSlot> = by_day
        .values()
        .flat_map(|(morning, afternoon)| [*morning, *afternoon])
        .flatten()
        .take(MAX_RECOMMENDATIONS)
        .collect();

    let taken: HashSet<NaiveDateTime> = picks.iter().map(|s| s.start).collect();
    let remaining = MAX_RECOMMENDATIONS.saturating_sub(picks.len());
    picks.extend(
        slots
            .iter()
            .filter(|s| !taken.contains(&s.start))
            .take(remaining)
            .copied(),
    );
    picks
}

/// Recommend meeting slots of `duration_minutes` within `[search_start, search_end)`.
///
/// Returns at most [`MAX_RECOMMENDATIONS`] slots; empty when nothing fits,
/// including a duration that is not positive or longer than working hours.
pub fn find_available_slots(
    bundle: &Value,
    search_start: NaiveDateTime,
    search_end: NaiveDateTime,
    duration_minutes: i64,
) -> Vec<TimeSlot> {
    let window_minutes = i64::from(WINDOW_END_HOUR - WINDOW_START_HOUR) * 60;
    if !(1..=window_minutes).contains(&duration_minutes) {
        return Vec::new();
    }
    let Some(duration) = Duration::try_minutes(duration_minutes) else {
        return Vec::new();
    };

    let busy = merge_busy(busy_intervals(bundle));
    let slots = scan_slots(&busy, search_start, search_end, duration);
    pick_recommendations(&slots)
}

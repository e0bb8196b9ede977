//! Forward migrations for stored habit data.
//!
//! Habit tracking went through two layouts before the event log: per-habit
//! status maps (`{"YYYY-MM-DD": true | "relapse"}`) and records carrying a
//! `relapses` array plus `lastRelapse`, with success marks kept in a
//! separate day calendar. [`migrate_habits`] folds all of them into each
//! record's `events` and stamps the record with
//! [`HABITS_SCHEMA_VERSION`]; stamped records are left alone on later loads.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveTime, Utc};
use serde_json::{Map, Value};

use crate::date::DateKey;
use crate::habits::{EventKind, HabitEvent, DEFAULT_COLOR, DEFAULT_ICON, HABITS_SCHEMA_VERSION};

/// Legacy stores that only feed migration.
#[derive(Debug, Clone, Default)]
pub struct LegacyHabitMarks {
    /// `habits_calendar`: `[{date, habits: [{habitId, time, date}]}]`.
    pub calendar: Option<Value>,
    /// `habits_tracked`: `{habitId: {"YYYY-MM-DD": true | "relapse"}}`.
    pub tracked: Option<Value>,
}

impl LegacyHabitMarks {
    fn events_for(&self, habit_id: u64) -> Vec<HabitEvent> {
        let mut events = Vec::new();

        for day in self.calendar.iter().flat_map(array_items) {
            let Some(date) = day.get("date").and_then(parse_date) else {
                continue;
            };
            for mark in day.get("habits").into_iter().flat_map(array_items) {
                if mark.get("habitId").and_then(value_as_id) != Some(habit_id) {
                    continue;
                }
                let timestamp = mark
                    .get("date")
                    .and_then(parse_timestamp)
                    .or_else(|| mark.get("time").and_then(parse_timestamp))
                    .or_else(|| noon(date));
                if let Some(timestamp) = timestamp {
                    events.push(HabitEvent {
                        kind: EventKind::Success,
                        date,
                        timestamp,
                    });
                }
            }
        }

        let statuses = self
            .tracked
            .as_ref()
            .and_then(|t| t.get(habit_id.to_string()))
            .and_then(Value::as_object);
        for (day, status) in statuses.into_iter().flatten() {
            let Ok(date) = day.parse::<DateKey>() else {
                continue;
            };
            let kind = match status {
                Value::Bool(true) => EventKind::Success,
                Value::String(s) if s == "relapse" => EventKind::Relapse,
                _ => continue,
            };
            if let Some(timestamp) = noon(date) {
                events.push(HabitEvent {
                    kind,
                    date,
                    timestamp,
                });
            }
        }

        events
    }
}

/// Bring every habit record in `records` to the current schema.
///
/// Returns `true` when any record changed. Running it again on its own
/// output returns `false`.
pub fn migrate_habits(records: &mut Value, legacy: &LegacyHabitMarks, now: DateTime<Utc>) -> bool {
    let Some(records) = records.as_array_mut() else {
        return false;
    };
    let mut changed = false;
    for record in records.iter_mut().filter_map(Value::as_object_mut) {
        let version = record.get("schemaVersion").and_then(Value::as_u64).unwrap_or(0);
        if version >= u64::from(HABITS_SCHEMA_VERSION) {
            continue;
        }
        migrate_record(record, legacy, now);
        changed = true;
    }
    changed
}

fn migrate_record(record: &mut Map<String, Value>, legacy: &LegacyHabitMarks, now: DateTime<Utc>) {
    let id = record.get("id").and_then(value_as_id).unwrap_or(0);
    record.insert("id".into(), id.into());

    rename_or_default(record, "title", "name", format!("Habit {id}"));
    rename_or_default(record, "icon", "emoji", DEFAULT_ICON.to_string());
    rename_or_default(record, "color", "color", DEFAULT_COLOR.to_string());
    rename_or_default(record, "description", "description", String::new());

    let mut events: Vec<HabitEvent> = record
        .get("events")
        .and_then(|e| serde_json::from_value(e.clone()).ok())
        .unwrap_or_default();

    for relapse in record.get("relapses").into_iter().flat_map(array_items) {
        let date = relapse
            .get("date")
            .or_else(|| relapse.get("dateKey"))
            .and_then(parse_date)
            .or_else(|| parse_date(relapse));
        let timestamp = relapse.get("timestamp").and_then(parse_timestamp);
        if let Some(date) = date {
            if let Some(timestamp) = timestamp.or_else(|| noon(date)) {
                events.push(HabitEvent {
                    kind: EventKind::Relapse,
                    date,
                    timestamp,
                });
            }
        }
    }

    if let Some(last) = record.get("lastRelapse").and_then(parse_timestamp) {
        events.push(HabitEvent {
            kind: EventKind::Relapse,
            date: last.date_naive().into(),
            timestamp: last,
        });
    }

    events.extend(legacy.events_for(id));
    let events = dedup_events(events);

    record.remove("relapses");
    record.remove("lastRelapse");

    let created_at = record
        .get("createdAt")
        .and_then(parse_timestamp)
        .or_else(|| events.iter().map(|e| e.timestamp).min())
        .unwrap_or(now);

    record.insert("createdAt".into(), Value::String(created_at.to_rfc3339()));
    record.insert(
        "events".into(),
        serde_json::to_value(events).unwrap_or_else(|_| Value::Array(Vec::new())),
    );
    record.insert("schemaVersion".into(), HABITS_SCHEMA_VERSION.into());
}

/// One event per day: a relapse beats a success, otherwise the earliest
/// timestamp is kept. Output is in date order.
fn dedup_events(events: Vec<HabitEvent>) -> Vec<HabitEvent> {
    let mut by_day: BTreeMap<DateKey, HabitEvent> = BTreeMap::new();
    for event in events {
        match by_day.get(&event.date) {
            Some(kept)
                if (kept.kind == event.kind && kept.timestamp <= event.timestamp)
                    || (kept.kind == EventKind::Relapse && event.kind == EventKind::Success) => {}
            _ => {
                by_day.insert(event.date, event);
            }
        }
    }
    by_day.into_values().collect()
}

/// Keep `field` if it is a string, else take string `legacy_field`, else
/// `default`. The legacy field is removed.
fn rename_or_default(record: &mut Map<String, Value>, field: &str, legacy_field: &str, default: String) {
    if record.get(field).is_some_and(Value::is_string) {
        return;
    }
    let value = match record.remove(legacy_field) {
        Some(Value::String(s)) => s,
        _ => default,
    };
    record.insert(field.into(), Value::String(value));
}

fn array_items(value: &Value) -> impl Iterator<Item = &Value> {
    value.as_array().into_iter().flatten()
}

fn value_as_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn noon(date: DateKey) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(12, 0, 0)?;
    Some(date.to_naive()?.and_time(time).and_utc())
}

/// Epoch milliseconds, RFC 3339 text, or a bare `YYYY-MM-DD` (noon UTC).
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateKey>().ok().and_then(noon)),
        _ => None,
    }
}

/// A `{day, month, year}` object, `YYYY-MM-DD`, or an RFC 3339 timestamp.
fn parse_date(value: &Value) -> Option<DateKey> {
    match value {
        Value::Object(_) => serde_json::from_value(value.clone()).ok(),
        Value::String(s) => s
            .parse::<DateKey>()
            .ok()
            .or_else(|| parse_timestamp(value).map(|dt| dt.date_naive().into())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn fills_missing_presentation_fields() {
        let mut records = json!([{ "id": 4, "name": "Sugar", "emoji": "🍬" }, { "id": 5 }]);
        assert!(migrate_habits(&mut records, &LegacyHabitMarks::default(), now()));

        assert_eq!(records[0]["title"], "Sugar");
        assert_eq!(records[0]["icon"], "🍬");
        assert!(records[0].get("emoji").is_none());
        assert_eq!(records[1]["title"], "Habit 5");
        assert_eq!(records[1]["icon"], DEFAULT_ICON);
        assert_eq!(records[1]["color"], DEFAULT_COLOR);
        assert_eq!(records[1]["createdAt"], now().to_rfc3339());
    }

    #[test]
    fn second_run_is_a_noop() {
        let mut records = json!([{ "id": 1, "title": "Alcohol" }]);
        assert!(migrate_habits(&mut records, &LegacyHabitMarks::default(), now()));
        let once = records.clone();
        assert!(!migrate_habits(&mut records, &LegacyHabitMarks::default(), now()));
        assert_eq!(records, once);
    }

    #[test]
    fn relapse_array_and_last_relapse_become_events() {
        let last = Utc.with_ymd_and_hms(2024, 4, 20, 22, 0, 0).unwrap();
        let mut records = json!([{
            "id": 2,
            "title": "Smoking",
            "createdAt": "2024-04-01T08:00:00Z",
            "lastRelapse": last.timestamp_millis(),
            "relapses": [
                { "date": { "day": 10, "month": 4, "year": 2024 }, "timestamp": "2024-04-10T19:00:00Z" },
                { "date": { "day": 10, "month": 4, "year": 2024 }, "timestamp": "2024-04-10T20:00:00Z" },
                { "date": { "day": 20, "month": 4, "year": 2024 }, "timestamp": last.timestamp_millis() }
            ]
        }]);
        migrate_habits(&mut records, &LegacyHabitMarks::default(), now());

        let events: Vec<HabitEvent> = serde_json::from_value(records[0]["events"].clone()).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == EventKind::Relapse));
        assert_eq!(events[0].timestamp, Utc.with_ymd_and_hms(2024, 4, 10, 19, 0, 0).unwrap());
        assert_eq!(events[1].timestamp, last);
    }

    #[test]
    fn legacy_marks_merge_with_relapse_winning() {
        let legacy = LegacyHabitMarks {
            calendar: Some(json!([
                { "date": { "day": 2, "month": 4, "year": 2024 }, "habits": [{ "habitId": 1, "time": "09:30", "date": "2024-04-02T09:30:00Z" }] },
                { "date": { "day": 3, "month": 4, "year": 2024 }, "habits": [{ "habitId": 1 }, { "habitId": 9 }] }
            ])),
            tracked: Some(json!({ "1": { "2024-04-03": "relapse", "2024-04-04": true, "2024-04-05": false } })),
        };
        let mut records = json!([{ "id": 1, "title": "Alcohol" }]);
        migrate_habits(&mut records, &legacy, now());

        let events: Vec<HabitEvent> = serde_json::from_value(records[0]["events"].clone()).unwrap();
        let kinds: Vec<_> = events.iter().map(|e| (e.date.day, e.kind)).collect();
        assert_eq!(
            kinds,
            vec![(2, EventKind::Success), (3, EventKind::Relapse), (4, EventKind::Success)]
        );
        // createdAt falls back to the earliest legacy timestamp
        assert_eq!(records[0]["createdAt"], "2024-04-02T09:30:00+00:00");
    }

    #[test]
    fn non_array_input_is_left_alone() {
        let mut value = json!({ "habits": [] });
        assert!(!migrate_habits(&mut value, &LegacyHabitMarks::default(), now()));
    }
}

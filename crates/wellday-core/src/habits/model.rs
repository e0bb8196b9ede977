//! Habit catalog entries and their event logs.
//!
//! Each habit carries one append-only log of dated events. Day status,
//! streaks, relapse history and "time clean" are all computed from that log
//! and never stored on their own.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::DateKey;

/// Schema generation written by this crate. Records carrying it are never
/// migrated again.
pub const HABITS_SCHEMA_VERSION: u32 = 2;

pub const DEFAULT_ICON: &str = "🎯";
pub const DEFAULT_COLOR: &str = "#667eea";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Success,
    Relapse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitEvent {
    pub kind: EventKind,
    pub date: DateKey,
    pub timestamp: DateTime<Utc>,
}

/// Relapse projection of the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelapseEvent {
    pub date: DateKey,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Clean,
    Relapse,
    Untouched,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "HabitRecord", from = "HabitRecord")]
pub struct Habit {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    events: Vec<HabitEvent>,
}

impl Habit {
    pub fn new(
        id: u32,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            icon: icon.into(),
            color: color.into(),
            created_at,
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[HabitEvent] {
        &self.events
    }

    fn event_on(&self, date: DateKey) -> Option<&HabitEvent> {
        self.events.iter().find(|e| e.date == date)
    }

    pub fn status_of(&self, date: DateKey) -> DayStatus {
        match self.event_on(date).map(|e| e.kind) {
            Some(EventKind::Success) => DayStatus::Clean,
            Some(EventKind::Relapse) => DayStatus::Relapse,
            None => DayStatus::Untouched,
        }
    }

    /// Status for each of `dates`, in order.
    pub fn calendar(&self, dates: &[DateKey]) -> Vec<DayStatus> {
        dates.iter().map(|d| self.status_of(*d)).collect()
    }

    /// Consecutive clean days ending at `today`.
    ///
    /// The backward walk stops at the first relapse or untouched day and can
    /// never take more steps than there are clean events, so corrupted or
    /// very long histories still terminate.
    pub fn streak(&self, today: DateKey) -> u32 {
        let clean: HashSet<DateKey> = self
            .events
            .iter()
            .filter(|e| e.kind == EventKind::Success)
            .map(|e| e.date)
            .collect();

        let mut streak = 0u32;
        let mut day = Some(today);
        while let Some(date) = day {
            if streak as usize >= clean.len() || !clean.contains(&date) {
                break;
            }
            streak += 1;
            day = date.previous();
        }
        streak
    }

    /// Number of days marked clean.
    pub fn total_days(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Success)
            .count()
    }

    pub fn relapses(&self) -> Vec<RelapseEvent> {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Relapse)
            .map(|e| RelapseEvent {
                date: e.date,
                timestamp: e.timestamp,
            })
            .collect()
    }

    pub fn last_relapse(&self) -> Option<DateTime<Utc>> {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Relapse)
            .map(|e| e.timestamp)
            .max()
    }

    /// Time since the habit was created or last relapsed, whichever is later.
    pub fn time_clean(&self, now: DateTime<Utc>) -> Duration {
        let since = self
            .last_relapse()
            .map_or(self.created_at, |r| r.max(self.created_at));
        (now - since).max(Duration::zero())
    }

    /// Log a clean day. Any existing event for `date` wins.
    pub fn mark_clean(&mut self, date: DateKey, timestamp: DateTime<Utc>) -> bool {
        if self.event_on(date).is_some() {
            return false;
        }
        self.events.push(HabitEvent {
            kind: EventKind::Success,
            date,
            timestamp,
        });
        true
    }

    /// Log a relapse, replacing a clean mark on the same day.
    pub fn mark_relapse(&mut self, date: DateKey, timestamp: DateTime<Utc>) -> bool {
        match self.status_of(date) {
            DayStatus::Relapse => return false,
            DayStatus::Clean => self.events.retain(|e| e.date != date),
            DayStatus::Untouched => {}
        }
        self.events.push(HabitEvent {
            kind: EventKind::Relapse,
            date,
            timestamp,
        });
        true
    }

    /// Drop whatever was logged for `date`.
    pub fn clear_mark(&mut self, date: DateKey) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.date != date);
        self.events.len() != before
    }
}

/// Read-only view of one habit as of a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    pub id: u32,
    pub title: String,
    pub icon: String,
    pub today: DayStatus,
    pub streak: u32,
    pub total_days: usize,
    pub time_clean_secs: i64,
    pub relapses: usize,
}

impl Habit {
    pub fn summary(&self, today: DateKey, now: DateTime<Utc>) -> HabitSummary {
        HabitSummary {
            id: self.id,
            title: self.title.clone(),
            icon: self.icon.clone(),
            today: self.status_of(today),
            streak: self.streak(today),
            total_days: self.total_days(),
            time_clean_secs: self.time_clean(now).num_seconds(),
            relapses: self.relapses().len(),
        }
    }
}

/// Timestamp for an event logged on `date`: the current instant when `date`
/// is today, noon UTC of that day for retroactive marks.
pub fn event_timestamp(date: DateKey, today: DateKey, now: DateTime<Utc>) -> DateTime<Utc> {
    if date == today {
        return now;
    }
    date.to_naive()
        .map(|d| d.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()).and_utc())
        .unwrap_or(now)
}

/// On-disk shape of a habit. `lastRelapse` and `relapses` are written for
/// readers of the older layout and ignored on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HabitRecord {
    id: u32,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_icon")]
    icon: String,
    #[serde(default = "default_color")]
    color: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    last_relapse: Option<DateTime<Utc>>,
    #[serde(default)]
    relapses: Vec<RelapseEvent>,
    #[serde(default)]
    events: Vec<HabitEvent>,
    #[serde(default)]
    schema_version: u32,
}

fn default_icon() -> String {
    DEFAULT_ICON.into()
}

fn default_color() -> String {
    DEFAULT_COLOR.into()
}

impl From<Habit> for HabitRecord {
    fn from(habit: Habit) -> Self {
        Self {
            last_relapse: habit.last_relapse(),
            relapses: habit.relapses(),
            id: habit.id,
            title: habit.title,
            description: habit.description,
            icon: habit.icon,
            color: habit.color,
            created_at: habit.created_at,
            events: habit.events,
            schema_version: HABITS_SCHEMA_VERSION,
        }
    }
}

impl From<HabitRecord> for Habit {
    fn from(record: HabitRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            icon: record.icon,
            color: record.color,
            created_at: record.created_at,
            events: record.events,
        }
    }
}

//! The set of tracked habits, which of them are active, and which one is
//! selected.

use chrono::{DateTime, Utc};

use super::model::Habit;
use crate::date::DateKey;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HabitBook {
    habits: Vec<Habit>,
    active: Vec<u32>,
    selected: Option<u32>,
}

impl HabitBook {
    /// Catalog shipped with a fresh store.
    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        let habits = vec![
            Habit::new(1, "Alcohol", "Beer, wine, spirits", "🍷", "#4ecdc4", now),
            Habit::new(2, "Smoking", "Cigarettes, vapes, hookah", "🚬", "#ff6b6b", now),
            Habit::new(3, "Fast food", "Burgers, fries, pizza", "🍔", "#ffa726", now),
        ];
        Self {
            habits,
            ..Self::default()
        }
    }

    /// Rebuild from persisted parts, dropping activation and selection
    /// entries that point at habits which no longer exist.
    pub fn restore(habits: Vec<Habit>, active: Vec<u32>, selected: Option<u32>) -> Self {
        let mut book = Self {
            habits,
            active: Vec::new(),
            selected: None,
        };
        for id in active {
            book.activate(id);
        }
        book.selected = selected.filter(|id| book.habit(*id).is_some());
        book
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, id: u32) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    fn habit_mut(&mut self, id: u32) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|h| h.id == id)
    }

    pub fn active(&self) -> &[u32] {
        &self.active
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// First active habit, if any.
    pub fn active_habit(&self) -> Option<&Habit> {
        self.active.first().and_then(|id| self.habit(*id))
    }

    /// Register a new habit and return its id (`max(ids, 0) + 1`).
    pub fn add_habit(
        &mut self,
        title: &str,
        description: &str,
        icon: &str,
        color: &str,
        now: DateTime<Utc>,
    ) -> u32 {
        let id = self.habits.iter().map(|h| h.id).max().unwrap_or(0) + 1;
        self.habits
            .push(Habit::new(id, title, description, icon, color, now));
        id
    }

    /// Remove a habit with its log and activation. A deleted selection falls
    /// back to the first remaining active habit.
    pub fn delete_habit(&mut self, id: u32) -> bool {
        let before = self.habits.len();
        self.habits.retain(|h| h.id != id);
        if self.habits.len() == before {
            return false;
        }
        self.active.retain(|a| *a != id);
        if self.selected == Some(id) {
            self.selected = self.active.first().copied();
        }
        true
    }

    pub fn activate(&mut self, id: u32) -> bool {
        if self.habit(id).is_none() || self.active.contains(&id) {
            return false;
        }
        self.active.push(id);
        true
    }

    pub fn deactivate(&mut self, id: u32) -> bool {
        let before = self.active.len();
        self.active.retain(|a| *a != id);
        self.active.len() != before
    }

    pub fn select(&mut self, id: u32) -> bool {
        if self.habit(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn mark_clean(&mut self, id: u32, date: DateKey, at: DateTime<Utc>) -> bool {
        self.habit_mut(id).is_some_and(|h| h.mark_clean(date, at))
    }

    pub fn mark_relapse(&mut self, id: u32, date: DateKey, at: DateTime<Utc>) -> bool {
        self.habit_mut(id).is_some_and(|h| h.mark_relapse(date, at))
    }

    pub fn clear_mark(&mut self, id: u32, date: DateKey) -> bool {
        self.habit_mut(id).is_some_and(|h| h.clear_mark(date))
    }
}

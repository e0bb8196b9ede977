//! Date-keyed ledger with a current-day cursor.
//!
//! A [`DayLedger`] owns an unordered, append-only calendar of day entries
//! and remembers which one is "current". The cursor is a position inside
//! the calendar, so mutating the current day mutates the calendar entry.

use serde::{de::DeserializeOwned, Serialize};

use super::aggregate::{self, AggregateTotals, Measured};
use crate::date::DateKey;

/// One day of a ledger domain (nutrition, water).
pub trait LedgerDay: Clone + Serialize + DeserializeOwned {
    /// Named sequence inside a day that items are appended to.
    type Category: Copy;
    type Item: Measured + Clone + Serialize + DeserializeOwned;

    /// A fresh day with empty categories and zeroed totals.
    fn blank(date: DateKey) -> Self;
    fn date(&self) -> DateKey;
    fn items(&self, category: Self::Category) -> &[Self::Item];
    fn items_mut(&mut self, category: Self::Category) -> &mut Vec<Self::Item>;
    fn total(&self) -> &AggregateTotals;
    fn total_mut(&mut self) -> &mut AggregateTotals;
}

#[derive(Debug, Clone)]
pub struct DayLedger<E> {
    days: Vec<E>,
    cursor: Option<usize>,
}

impl<E> Default for DayLedger<E> {
    fn default() -> Self {
        Self {
            days: Vec::new(),
            cursor: None,
        }
    }
}

impl<E: LedgerDay> DayLedger<E> {
    /// Rebuild a ledger from its two persisted halves.
    ///
    /// The cursor is re-resolved by date against `days`. The two halves are
    /// written one after the other, so after an interrupted save the calendar
    /// copy is the newer one and wins. A current day missing from the
    /// calendar is appended to it.
    pub fn restore(days: Vec<E>, current: Option<E>) -> Self {
        let mut ledger = Self { days, cursor: None };
        if let Some(current) = current {
            let date = current.date();
            match ledger.position(date) {
                Some(idx) => ledger.cursor = Some(idx),
                None => {
                    tracing::warn!(%date, "current day missing from calendar, re-attaching it");
                    ledger.days.push(current);
                    ledger.cursor = Some(ledger.days.len() - 1);
                }
            }
        }
        ledger
    }

    pub fn days(&self) -> &[E] {
        &self.days
    }

    pub fn day(&self, date: DateKey) -> Option<&E> {
        self.position(date).map(|idx| &self.days[idx])
    }

    pub fn current(&self) -> Option<&E> {
        self.cursor.and_then(|idx| self.days.get(idx))
    }

    pub fn current_mut(&mut self) -> Option<&mut E> {
        self.cursor.and_then(|idx| self.days.get_mut(idx))
    }

    fn position(&self, date: DateKey) -> Option<usize> {
        self.days.iter().position(|d| d.date() == date)
    }

    /// Point the cursor at `date`, appending a blank day on first use.
    /// Returns the day's position in [`DayLedger::days`].
    pub fn select_day(&mut self, date: DateKey) -> usize {
        let idx = match self.position(date) {
            Some(idx) => idx,
            None => {
                self.days.push(E::blank(date));
                self.days.len() - 1
            }
        };
        self.cursor = Some(idx);
        idx
    }

    /// Append `item` to the current day's `category` and fold it into the
    /// totals. Returns `false` when no day is selected.
    pub fn add_item(&mut self, category: E::Category, item: E::Item) -> bool {
        let Some(day) = self.current_mut() else {
            return false;
        };
        aggregate::add(day.total_mut(), &item);
        day.items_mut(category).push(item);
        true
    }

    /// Remove the item at `index` of the current day's `category`.
    ///
    /// `index` is positional: it names whatever sits at that position right
    /// now. Indices shift after every removal, so callers must re-read the
    /// day instead of caching them. Out-of-range indices are a no-op and
    /// return `None`.
    pub fn remove_item(&mut self, category: E::Category, index: usize) -> Option<E::Item> {
        let day = self.current_mut()?;
        let items = day.items_mut(category);
        if index >= items.len() {
            return None;
        }
        let item = items.remove(index);
        aggregate::subtract(day.total_mut(), &item);
        Some(item)
    }

    /// `field` totals for each of `dates`, 0 where the ledger has no entry.
    pub fn series_for(&self, dates: &[DateKey], field: &str) -> Vec<f64> {
        dates
            .iter()
            .map(|date| self.day(*date).map_or(0.0, |d| d.total().get(field)))
            .collect()
    }
}

//! Incrementally maintained day totals.
//!
//! Totals are never recomputed by rescanning a day; every item added or
//! removed is folded in with [`add`] / [`subtract`], and every update is
//! rounded to two decimals so totals compare exactly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Magnitude below which a subtracted total snaps to zero.
pub const ZERO_EPSILON: f64 = 0.001;

/// An item that contributes numeric fields to its day's totals.
pub trait Measured {
    /// `(field, value)` pairs folded into the totals. The label field
    /// (e.g. a product name) is never part of this list.
    fn measures(&self) -> Vec<(&'static str, f64)>;
}

/// Running sums keyed by numeric field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateTotals(BTreeMap<String, f64>);

impl AggregateTotals {
    /// Totals with every named field present and zeroed.
    pub fn zeroed(fields: &[&str]) -> Self {
        Self(fields.iter().map(|f| (f.to_string(), 0.0)).collect())
    }

    /// Current value of `field`, 0 when the field was never touched.
    pub fn get(&self, field: &str) -> f64 {
        self.0.get(field).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn slot(&mut self, field: &str) -> &mut f64 {
        self.0.entry(field.to_string()).or_insert(0.0)
    }
}

/// Round half away from zero to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Fold `item` into `total`.
pub fn add<M: Measured + ?Sized>(total: &mut AggregateTotals, item: &M) {
    for (field, value) in item.measures() {
        let slot = total.slot(field);
        *slot = round2(*slot + value);
    }
}

/// Remove `item` from `total`, snapping near-zero results to exactly 0.
pub fn subtract<M: Measured + ?Sized>(total: &mut AggregateTotals, item: &M) {
    for (field, value) in item.measures() {
        let slot = total.slot(field);
        *slot = round2(*slot - value);
        if slot.abs() < ZERO_EPSILON {
            *slot = 0.0;
        }
    }
}

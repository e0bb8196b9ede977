//! Whole-domain JSON persistence over a [`KeyValueStore`].
//!
//! Every domain value is one JSON document under one key. Reads never fail
//! on bad data: an absent key or an unparsable value loads as `None` (and
//! callers substitute the domain default). Only the backend itself can
//! produce an error.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::KeyValueStore;
use crate::error::Result;

pub struct Gateway<S> {
    store: S,
}

impl<S: KeyValueStore> Gateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Raw JSON under `key`, `None` when absent or unparsable.
    pub fn load_value(&self, key: &str) -> Result<Option<Value>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value is not valid JSON, using default");
                Ok(None)
            }
        }
    }

    /// Typed value under `key`, `None` when absent or malformed.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.load_value(key)?.and_then(|value| decode(key, value)))
    }

    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Like [`Gateway::load`] for values that may be unset. `null` and `{}`
    /// are both the stored form of "nothing" and load as `None` quietly.
    pub fn load_optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self
            .load_value(key)?
            .filter(|value| !is_unset(value))
            .and_then(|value| decode(key, value)))
    }

    /// Load `key`, running `migrate` over the raw JSON first.
    ///
    /// When `migrate` reports a change and the result decodes, the typed
    /// value is written back immediately so the stored shape is current
    /// before first use.
    pub fn load_migrated<T, F>(&mut self, key: &str, migrate: F) -> Result<Option<T>>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce(&mut Value) -> bool,
    {
        let Some(mut value) = self.load_value(key)? else {
            return Ok(None);
        };
        let migrated = migrate(&mut value);
        let Some(typed) = decode::<T>(key, value) else {
            return Ok(None);
        };
        if migrated {
            tracing::info!(key, "migrated stored value to current schema");
            self.save(key, &typed)?;
        }
        Ok(Some(typed))
    }

    /// Serialize `value` and write it under `key`.
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        tracing::debug!(key, bytes = json.len(), "saving");
        self.store.set(key, &json)?;
        Ok(())
    }
}

fn is_unset(value: &Value) -> bool {
    value.is_null() || value.as_object().is_some_and(serde_json::Map::is_empty)
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(typed) => Some(typed),
        Err(err) => {
            tracing::warn!(key, error = %err, "stored value has unexpected shape, using default");
            None
        }
    }
}

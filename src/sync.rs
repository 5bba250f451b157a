// src/sync.rs
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::store::{KeyValueStore, StoreError};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Failed to serialize slice '{key}': {source}")]
    Serialize {
        key: &'static str,
        source: serde_json::Error,
    },
}

/// One feature's self-contained state value, stored as JSON under a fixed key.
pub trait Slice: Serialize + DeserializeOwned + Clone + fmt::Debug {
    /// Store key. Must stay stable across releases, it is the only link to saved data.
    const KEY: &'static str;

    /// Checks invariants a parsed value must hold before it is adopted.
    /// # Errors
    /// Returns a human-readable reason when the value is unusable.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// How a slice got its initial value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Stored,
    Missing,
    Unparseable(String),
    Invalid(String),
}

impl LoadOutcome {
    pub const fn is_default(&self) -> bool {
        !matches!(self, Self::Stored)
    }
}

/// A slice mirrored to the store: read once, written back after every change.
#[derive(Debug, Clone)]
pub struct Synced<T: Slice> {
    value: T,
    origin: LoadOutcome,
}

impl<T: Slice> Synced<T> {
    /// Reads `T::KEY`, falling back to `default` when the entry is missing,
    /// doesn't parse, or fails validation.
    /// # Errors
    /// Returns `SyncError::Store` only if the store itself cannot be read.
    pub fn load_or(store: &dyn KeyValueStore, default: T) -> Result<Self, SyncError> {
        let (value, origin) = match store.get(T::KEY)? {
            None => (default, LoadOutcome::Missing),
            Some(raw) => match serde_json::from_str::<T>(&raw) {
                Err(e) => (default, LoadOutcome::Unparseable(e.to_string())),
                Ok(parsed) => match parsed.validate() {
                    Ok(()) => (parsed, LoadOutcome::Stored),
                    Err(reason) => (default, LoadOutcome::Invalid(reason)),
                },
            },
        };
        if origin.is_default() {
            debug!(key = T::KEY, ?origin, "using default slice");
        }
        Ok(Self { value, origin })
    }

    pub const fn get(&self) -> &T {
        &self.value
    }

    pub const fn origin(&self) -> &LoadOutcome {
        &self.origin
    }

    /// Applies `f` to the slice, then writes the result back.
    /// # Errors
    /// Returns `SyncError` if the write fails. The in-memory change is kept.
    pub fn update<R>(
        &mut self,
        store: &mut dyn KeyValueStore,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, SyncError> {
        let result = f(&mut self.value);
        self.save(store)?;
        Ok(result)
    }

    /// Serializes the current value over `T::KEY`.
    /// # Errors
    /// Returns `SyncError` on serialization or store failure.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), SyncError> {
        let raw = serde_json::to_string(&self.value).map_err(|source| SyncError::Serialize {
            key: T::KEY,
            source,
        })?;
        store.set(T::KEY, &raw)?;
        debug!(key = T::KEY, bytes = raw.len(), "slice written");
        Ok(())
    }
}

//! Open-state store
//!
//! Session mirror of which folders are open, keyed by path. Every write
//! replaces the whole snapshot.

use crate::error::CoreError;
use crate::storage::SessionStorage;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Session key holding the JSON array of open folder paths
pub const OPEN_STATE_KEY: &str = "navfold:open";

/// Paths loaded from the session, mapped to their open flag
pub type LoadedOpenPaths = HashMap<String, bool>;

/// Path-keyed open state backed by a [`SessionStorage`]
#[derive(Debug, Clone)]
pub struct OpenStateStore<S> {
    storage: S,
    persist: bool,
}

impl<S: SessionStorage> OpenStateStore<S> {
    pub fn new(storage: S, persist: bool) -> Self {
        Self { storage, persist }
    }

    pub fn persist(&self) -> bool {
        self.persist
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Read the persisted paths.
    ///
    /// Empty when persistence is off, nothing was saved yet, or the stored
    /// value is not an array of strings. `null` entries are skipped.
    pub fn load(&self) -> LoadedOpenPaths {
        if !self.persist {
            return LoadedOpenPaths::new();
        }
        let Some(raw) = self.storage.get_item(OPEN_STATE_KEY) else {
            return LoadedOpenPaths::new();
        };
        match parse_paths(&raw) {
            Some(paths) => paths.into_iter().map(|p| (p, true)).collect(),
            None => {
                debug!(key = OPEN_STATE_KEY, "Malformed open state, treating as empty");
                LoadedOpenPaths::new()
            }
        }
    }

    /// Overwrite the persisted snapshot with `open_paths`.
    ///
    /// Duplicates are dropped, first occurrence keeps its position. No-op
    /// when persistence is off.
    pub fn save<'a, I>(&mut self, open_paths: I) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !self.persist {
            return Ok(());
        }
        let mut seen = HashSet::new();
        let ordered: Vec<&str> = open_paths.into_iter().filter(|p| seen.insert(*p)).collect();
        let value = serde_json::to_string(&ordered)?;
        self.storage.set_item(OPEN_STATE_KEY, &value)?;
        debug!(count = ordered.len(), "Saved open state");
        Ok(())
    }

    /// Forget the persisted snapshot
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.storage.remove_item(OPEN_STATE_KEY)
    }
}

fn parse_paths(raw: &str) -> Option<Vec<String>> {
    let Value::Array(entries) = serde_json::from_str::<Value>(raw).ok()? else {
        return None;
    };
    let mut paths = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Value::String(path) => paths.push(path),
            Value::Null => {}
            _ => return None,
        }
    }
    Some(paths)
}

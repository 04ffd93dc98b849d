//! Sorted key/value meta-data attached to datasets and blocks

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::error::{Result, RunTimeError};

/// Free-form key/value annotations of a block or dataset
///
/// Wavelength, sample name, measurement date and similar values that describe
/// the x-y data but are not part of it. Keys are kept sorted so that export
/// output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaData {
    entries: BTreeMap<String, String>,
}

impl MetaData {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `key` is present.
    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| RunTimeError::KeyNotFound(key.to_string()).into())
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Returns `true` if the key was not present before.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        self.entries.insert(key.into(), value.into()).is_none()
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a MetaData {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Cached, read-only view of one configuration section

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named group of key/value string pairs
///
/// Returned by [`ConfigStore::exist_section`](crate::ConfigStore::exist_section)
/// and [`ConfigStore::snapshot`](crate::ConfigStore::snapshot). Key order is
/// not preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    name: String,
    data: HashMap<String, String>,
}

impl Section {
    pub(crate) fn new(name: impl Into<String>, data: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

//! In-memory client configuration: the set of settings that carry a
//! meaningful value. Every insertion goes through the value validator so an
//! unset field can never reach disk.

use std::collections::btree_map::{self, BTreeMap};

use crate::registry::SettingKey;
use crate::validator::{PlaceholderValidator, ValueValidator};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    entries: BTreeMap<SettingKey, String>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` when the default validator accepts it. Returns whether
    /// the value was kept; a rejected value also clears any previous entry.
    pub fn insert(&mut self, key: SettingKey, value: impl Into<String>) -> bool {
        self.insert_with(&PlaceholderValidator, key, value)
    }

    pub fn insert_with<V: ValueValidator + ?Sized>(
        &mut self,
        validator: &V,
        key: SettingKey,
        value: impl Into<String>,
    ) -> bool {
        let value = value.into();
        if validator.is_acceptable(Some(&value)) {
            self.entries.insert(key, value);
            true
        } else {
            self.entries.remove(&key);
            false
        }
    }

    pub fn get(&self, key: SettingKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    pub fn remove(&mut self, key: SettingKey) -> Option<String> {
        self.entries.remove(&key)
    }

    pub fn contains(&self, key: SettingKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registry declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, &str)> {
        self.entries.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

impl IntoIterator for ConfigMap {
    type Item = (SettingKey, String);
    type IntoIter = btree_map::IntoIter<SettingKey, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

//! # Keyed Collections
//!
//! Every collection flowing through the cart pipeline (line items, price
//! definitions, delivery information, calculated line items, taxes) is an
//! ordered map: unique keys, insertion order preserved.
//!
//! ## Why Not HashMap?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input line items:      SW1, SW2, SW3                                   │
//! │                                                                         │
//! │  HashMap iteration:     SW3, SW1, SW2   ❌ cart lines jump around       │
//! │  KeyedCollection:       SW1, SW2, SW3   ✅ same order as the customer   │
//! │                                           added them                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups go through a `HashMap<K, usize>` index into the entry vector, so
//! `get` stays O(1) while iteration follows insertion order.

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

// =============================================================================
// Keyed Trait
// =============================================================================

/// A value that knows the key it is stored under.
pub trait Keyed {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> Self::Key;
}

// =============================================================================
// KeyedCollection
// =============================================================================

/// Insertion-ordered map with unique keys.
///
/// Inserting an existing key replaces the value in place; the entry keeps
/// its original position.
#[derive(Clone)]
pub struct KeyedCollection<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone, V> KeyedCollection<K, V> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        KeyedCollection {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Inserts a value under `key`, returning the replaced value if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&position) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[position].1, value));
        }

        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Removes the entry for `key`. Remaining entries keep their order.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let position = self.index.remove(key)?;
        let (_, value) = self.entries.remove(position);

        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }

        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Moves every entry of `other` into this collection.
    pub fn extend_from(&mut self, other: KeyedCollection<K, V>) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    /// Returns a new collection with the entries matching `predicate`.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V) -> bool,
        V: Clone,
    {
        self.entries
            .iter()
            .filter(|(_, value)| predicate(value))
            .cloned()
            .collect()
    }
}

impl<V: Keyed> KeyedCollection<V::Key, V> {
    /// Builds a collection from values that carry their own key.
    pub fn from_values(values: impl IntoIterator<Item = V>) -> Self {
        let mut collection = KeyedCollection::new();
        for value in values {
            collection.add(value);
        }
        collection
    }

    /// Inserts a value under its own key.
    pub fn add(&mut self, value: V) -> Option<V> {
        self.insert(value.key(), value)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<K: Eq + Hash + Clone, V> Default for KeyedCollection<K, V> {
    fn default() -> Self {
        KeyedCollection::new()
    }
}

/// Two collections are equal when they hold the same entries in the same order.
impl<K: PartialEq, V: PartialEq> PartialEq for KeyedCollection<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for KeyedCollection<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, value)| (key, value)))
            .finish()
    }
}

impl<K: Eq + Hash + Clone, V> FromIterator<(K, V)> for KeyedCollection<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut collection = KeyedCollection::new();
        for (key, value) in iter {
            collection.insert(key, value);
        }
        collection
    }
}

impl<V: Keyed> From<Vec<V>> for KeyedCollection<V::Key, V> {
    fn from(values: Vec<V>) -> Self {
        KeyedCollection::from_values(values)
    }
}

impl<K, V> IntoIterator for KeyedCollection<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Serialized as a list of `[key, value]` pairs so order survives JSON.
impl<K: Serialize, V: Serialize> Serialize for KeyedCollection<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in &self.entries {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }
}

impl<'de, K, V> Deserialize<'de> for KeyedCollection<K, V>
where
    K: Deserialize<'de> + Eq + Hash + Clone,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<(K, V)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

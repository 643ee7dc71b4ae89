//! Insertion-ordered key/value storage backing a collection.
//!
//! [`Map`] keeps entries as a flat pair list with unique keys. Lookups are
//! linear; the working sets this crate targets are small and order fidelity
//! matters more than lookup complexity.

use std::fmt;

use super::errors::CollectionError;
use super::key::Key;
use super::value::Value;

/// Insertion-ordered mapping from [`Key`] to [`Value`].
///
/// Keys are unique. Setting an existing key keeps its position and replaces
/// its value; setting a new key appends. Integer and text keys coexist in the
/// same map.
///
/// # Examples
///
/// ```
/// use tidepool::{Key, Map, Value};
///
/// let mut map = Map::new();
/// map.set(Key::from("name"), Value::from("Alice"));
/// map.push(Value::Int(42));
///
/// assert_eq!(map.get(&Key::from("name")), Some(&Value::Text("Alice".to_string())));
/// assert_eq!(map.get(&Key::Int(0)), Some(&Value::Int(42)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Map {
    entries: Vec<(Key, Value)>,
}

impl Map {
    /// Creates a new empty map
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds a map from key/value pairs; duplicate keys resolve to the last
    /// value at the first occurrence's position.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Key, Value)>) -> Self {
        pairs.into_iter().collect()
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets a value by key
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Gets a mutable value by key
    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns true if the map contains the given key
    pub fn contains_key(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    /// Sets `key` to `value`.
    ///
    /// An existing key keeps its position and takes the new value; a new key
    /// appends at the end.
    pub fn set(&mut self, key: Key, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Removes `key`, returning its value if present.
    ///
    /// Remaining entries keep their keys; renumbering is the caller's decision.
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Appends `value` at the next free integer key.
    pub fn push(&mut self, value: Value) {
        let key = Key::Int(self.next_int_key());
        self.entries.push((key, value));
    }

    /// Next integer key: one past the largest non-negative integer key, or 0
    /// when there is none.
    pub fn next_int_key(&self) -> i64 {
        match self.entries.iter().filter_map(|(k, _)| k.as_int()).max() {
            Some(n) if n >= 0 => n + 1,
            _ => 0,
        }
    }

    /// Renumbers integer keys 0, 1, 2, ... in iteration order.
    ///
    /// Text keys are untouched and keep their position.
    pub fn reindex(&mut self) {
        let mut next = 0i64;
        for (k, _) in &mut self.entries {
            if k.is_int() {
                *k = Key::Int(next);
                next += 1;
            }
        }
    }

    /// True when keys are exactly `0..len-1` in order.
    ///
    /// Dense maps serialize to JSON as arrays rather than objects.
    pub fn is_dense(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, (k, _))| k.as_int() == Some(i as i64))
    }

    /// Iterates over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterates over keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Iterates over values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Consumes the map, returning its entries in order
    pub fn into_entries(self) -> Vec<(Key, Value)> {
        self.entries
    }

    /// Builds a map from entries already known to have unique keys.
    pub(crate) fn from_entries_unchecked(entries: Vec<(Key, Value)>) -> Self {
        Self { entries }
    }

    /// Inserts an entry at the front. The key must not collide; callers
    /// reindex immediately afterwards.
    pub(crate) fn insert_front(&mut self, key: Key, value: Value) {
        self.entries.insert(0, (key, value));
    }

    /// Removes and returns the last entry.
    pub(crate) fn pop_last(&mut self) -> Option<(Key, Value)> {
        self.entries.pop()
    }

    /// Removes and returns the first entry.
    pub(crate) fn remove_first(&mut self) -> Option<(Key, Value)> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries.remove(0))
    }

    /// Projects the map onto `serde_json::Value`.
    ///
    /// A dense map (keys exactly `0..len-1`) becomes a JSON array; anything
    /// else becomes a JSON object with stringified keys. When an integer key
    /// and a text key stringify to the same object key, the later entry wins.
    pub fn to_json(&self) -> serde_json::Value {
        if self.is_dense() {
            serde_json::Value::Array(self.values().map(Value::to_json).collect())
        } else {
            let mut object = serde_json::Map::with_capacity(self.len());
            for (key, value) in self.iter() {
                object.insert(key.to_string(), value.to_json());
            }
            serde_json::Value::Object(object)
        }
    }

    /// Validates key uniqueness, used after deserializing untrusted input.
    pub(crate) fn ensure_unique_keys(&self) -> Result<(), CollectionError> {
        for (i, (key, _)) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|(prev, _)| prev == key) {
                return Err(CollectionError::DeserializationFailed {
                    reason: format!("duplicate key '{key}' in serialized input"),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(Key, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}

impl IntoIterator for Map {
    type Item = (Key, Value);
    type IntoIter = std::vec::IntoIter<(Key, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<Vec<(Key, Value)>> for Map {
    fn from(pairs: Vec<(Key, Value)>) -> Self {
        Map::from_pairs(pairs)
    }
}

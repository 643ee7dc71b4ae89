//! Fluent, chainable transformations over an ordered keyed collection.
//!
//! This module provides the main public interface of the crate. A
//! [`Collection`] owns one insertion-ordered [`Map`] (the working set) and
//! reworks it through chained operations: every transformation consumes the
//! collection and returns the updated owned value, so chains read linearly and
//! there is no hidden aliasing.
//!
//! # Usage
//!
//! ```
//! use tidepool::{Collection, Value};
//!
//! let result = Collection::from_values([1, 2, 3, 4])
//!     .map(|v| match v {
//!         Value::Int(n) => Value::Int(n * n),
//!         other => other,
//!     })
//!     .filter(|v| v.as_int().is_some_and(|n| n > 1))
//!     .reverse();
//!
//! assert_eq!(result.to_json_string().unwrap(), "[16,9,4]");
//! ```
//!
//! # Shape drift
//!
//! Some operations change the shape of the working set: [`Collection::chunk`]
//! turns a flat mapping into a mapping of groups, and [`Collection::pop`]
//! replaces the whole mapping with a single extracted value. The second case
//! is surfaced in the type system: `pop` returns a [`Scalar`] that exposes
//! only terminal accessors, so mapping operations on a popped result are
//! compile errors rather than runtime surprises.

pub mod errors;
pub mod key;
pub mod map;
pub mod value;


pub use errors::CollectionError;
pub use key::{Key, KeyCase};
pub use map::Map;
pub use value::Value;

use crate::Result;

/// A fluent builder over one insertion-ordered working set.
///
/// `Collection` exclusively owns its [`Map`]. Transformations take `self` by
/// value and return the updated collection; fallible ones return
/// `Result<Self>` and never leave a partially-applied working set behind.
///
/// # Examples
///
/// ## Building and extracting
/// ```
/// # use tidepool::Collection;
/// let collection = Collection::from_values(["a", "b", "c"]);
/// assert_eq!(collection.len(), 3);
/// assert_eq!(collection.to_json_string().unwrap(), r#"["a","b","c"]"#);
/// ```
///
/// ## Chaining
/// ```
/// # use tidepool::Collection;
/// let merged = Collection::from_values([1, 2, 3])
///     .merge(Collection::from_values([4, 5]), false)
///     .reverse();
/// assert_eq!(merged.to_json_string().unwrap(), "[5,4,3,2,1]");
/// ```
///
/// # Concurrency
///
/// There is no interior mutability and no locking. Clone the collection before
/// mutating the same data from more than one thread.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Collection {
    data: Map,
}

impl Collection {
    /// Creates a collection owning `data` as its working set.
    pub fn new(data: Map) -> Self {
        Self { data }
    }

    /// Creates a collection from a sequence of values keyed `0..n-1`.
    pub fn from_values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        let mut data = Map::new();
        for value in values {
            data.push(value.into());
        }
        Self { data }
    }

    /// Creates a collection from key/value pairs; duplicate keys resolve to
    /// the last value at the first occurrence's position.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Key, Value)>) -> Self {
        Self {
            data: Map::from_pairs(pairs),
        }
    }

    /// Returns the number of entries in the working set
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the working set is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // --- Transformations ---

    /// Applies `f` to every value, preserving keys and order.
    pub fn map(self, mut f: impl FnMut(Value) -> Value) -> Self {
        let entries = self
            .data
            .into_entries()
            .into_iter()
            .map(|(k, v)| (k, f(v)))
            .collect();
        Self {
            data: Map::from_entries_unchecked(entries),
        }
    }

    /// Keeps entries whose value passes `f`.
    ///
    /// Surviving entries keep their original keys; nothing is renumbered.
    pub fn filter(self, mut f: impl FnMut(&Value) -> bool) -> Self {
        self.filter_entries(|_, v| f(v))
    }

    /// Keeps entries whose key passes `f`.
    pub fn filter_keys(self, mut f: impl FnMut(&Key) -> bool) -> Self {
        self.filter_entries(|k, _| f(k))
    }

    /// Keeps entries passing `f`, which sees both key and value.
    pub fn filter_entries(self, mut f: impl FnMut(&Key, &Value) -> bool) -> Self {
        let entries = self
            .data
            .into_entries()
            .into_iter()
            .filter(|(k, v)| f(k, v))
            .collect();
        Self {
            data: Map::from_entries_unchecked(entries),
        }
    }

    /// Re-keys every entry by normalizing text keys to `case`.
    ///
    /// Integer keys pass through unchanged. When two text keys collide after
    /// casing, the later entry's value wins at the earlier entry's position.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tidepool::{Collection, Key, KeyCase, Value};
    /// let lowered = Collection::from_pairs([
    ///     (Key::from("Name"), Value::from("Alice")),
    ///     (Key::from(7), Value::from(true)),
    /// ])
    /// .change_key_case(KeyCase::Lower);
    ///
    /// assert!(lowered.as_map().contains_key(&Key::from("name")));
    /// assert!(lowered.as_map().contains_key(&Key::from(7)));
    /// ```
    pub fn change_key_case(self, case: KeyCase) -> Self {
        let mut data = Map::new();
        for (key, value) in self.data {
            data.set(key.with_case(case), value);
        }
        Self { data }
    }

    /// Splits the working set into consecutive groups of at most `size`
    /// elements; the last group may be shorter.
    ///
    /// Groups are keyed `0..`. With `preserve_keys` each group is a
    /// [`Value::Map`] retaining the original keys; otherwise each group is a
    /// freshly 0-indexed [`Value::List`].
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidArgument`] when `size == 0`.
    pub fn chunk(self, size: usize, preserve_keys: bool) -> Result<Self> {
        if size == 0 {
            return Err(CollectionError::InvalidArgument {
                reason: "chunk size must be at least 1".to_string(),
            }
            .into());
        }

        let mut groups: Vec<Vec<(Key, Value)>> = Vec::new();
        for entry in self.data.into_entries() {
            match groups.last_mut() {
                Some(last) if last.len() < size => last.push(entry),
                _ => groups.push(vec![entry]),
            }
        }

        let mut data = Map::new();
        for group in groups {
            if preserve_keys {
                data.push(Value::Map(Map::from_entries_unchecked(group)));
            } else {
                data.push(Value::List(group.into_iter().map(|(_, v)| v).collect()));
            }
        }
        Ok(Self { data })
    }

    /// Extracts `column_key` from every record in a working set of records.
    ///
    /// Rows that are not [`Value::Map`] records, and records missing
    /// `column_key`, are skipped. Without `index_key` the extracted values are
    /// keyed `0..`; with `index_key` each value is keyed by its record's index
    /// value, last write winning on duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::TypeMismatch`] when a record's `index_key`
    /// value is not key-coercible.
    pub fn column(self, column_key: impl Into<Key>, index_key: Option<Key>) -> Result<Self> {
        let column_key = column_key.into();
        let mut data = Map::new();
        for (_, row) in self.data.iter() {
            let Value::Map(record) = row else {
                tracing::debug!(row_type = row.type_name(), "column: skipping non-record row");
                continue;
            };
            let Some(cell) = record.get(&column_key) else {
                continue;
            };
            match index_key.as_ref().and_then(|ik| record.get(ik)) {
                Some(index_value) => data.set(Key::coerce(index_value)?, cell.clone()),
                None => data.push(cell.clone()),
            }
        }
        Ok(Self { data })
    }

    /// Zips the working set pairwise with `other` into a new mapping.
    ///
    /// With `values_flag` true the current values supply the keys and `other`
    /// supplies the values; with false the roles swap. Key-side values are
    /// coerced with [`Key::coerce`]; duplicate keys resolve to the last value.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::LengthMismatch`] when the two sequences
    /// differ in length, and [`CollectionError::TypeMismatch`] when a key-side
    /// value is not key-coercible.
    pub fn combine<V: Into<Value>>(
        self,
        other: impl IntoIterator<Item = V>,
        values_flag: bool,
    ) -> Result<Self> {
        let other: Vec<Value> = other.into_iter().map(Into::into).collect();
        if self.data.len() != other.len() {
            return Err(CollectionError::LengthMismatch {
                left: self.data.len(),
                right: other.len(),
            }
            .into());
        }

        let own: Vec<Value> = self.data.into_entries().into_iter().map(|(_, v)| v).collect();
        let (keys, values) = if values_flag { (own, other) } else { (other, own) };

        let mut data = Map::new();
        for (key_value, value) in keys.iter().zip(values) {
            data.set(Key::coerce(key_value)?, value);
        }
        Ok(Self { data })
    }

    /// Produces a mapping from each distinct value to its occurrence count.
    ///
    /// Only int and text values are countable as keys; everything else is
    /// skipped with a warning (loose-counting convention).
    pub fn count_value_occurrence(self) -> Self {
        let mut counts = Map::new();
        for (_, value) in self.data.iter() {
            let key = match value {
                Value::Int(n) => Key::Int(*n),
                Value::Text(s) => Key::Text(s.clone()),
                other => {
                    tracing::warn!(
                        value_type = other.type_name(),
                        "count_value_occurrence: skipping non-countable value"
                    );
                    continue;
                }
            };
            match counts.get_mut(&key) {
                Some(Value::Int(n)) => *n += 1,
                _ => counts.set(key, Value::Int(1)),
            }
        }
        Self { data: counts }
    }

    /// Concatenates the working set with `other`.
    ///
    /// Integer keys are renumbered sequentially in concatenation order. A text
    /// key appearing in both takes the later-applied value at its first
    /// position. `other_first` puts `other` ahead of the working set.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tidepool::Collection;
    /// let tail = Collection::from_values([1, 2, 3])
    ///     .merge(Collection::from_values([4, 5]), false);
    /// assert_eq!(tail.to_json_string().unwrap(), "[1,2,3,4,5]");
    ///
    /// let head = Collection::from_values([1, 2, 3])
    ///     .merge(Collection::from_values([4, 5]), true);
    /// assert_eq!(head.to_json_string().unwrap(), "[4,5,1,2,3]");
    /// ```
    pub fn merge(self, other: impl Into<Map>, other_first: bool) -> Self {
        let other = other.into();
        let (first, second) = if other_first {
            (other, self.data)
        } else {
            (self.data, other)
        };

        let mut data = Map::new();
        for (key, value) in first.into_iter().chain(second) {
            match key {
                Key::Int(_) => data.push(value),
                text @ Key::Text(_) => data.set(text, value),
            }
        }
        Self { data }
    }

    /// Removes the last entry and adopts its value as the entire result.
    ///
    /// This is a deliberate, non-obvious contract inherited from the loose
    /// array tradition: the popped value *replaces the whole working set*, it
    /// is not handed back alongside the remainder. The returned [`Scalar`]
    /// carries only terminal accessors, so follow-on mapping calls are
    /// compile errors. Use [`Collection::shift`] when you want the remainder.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::EmptyCollection`] when the working set is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tidepool::{Collection, Value};
    /// let popped = Collection::from_values([1, 2, 3]).pop().unwrap();
    /// assert_eq!(popped.into_value(), Value::Int(3));
    /// ```
    pub fn pop(self) -> Result<Scalar> {
        let mut data = self.data;
        match data.pop_last() {
            Some((_, value)) => Ok(Scalar { value }),
            None => Err(CollectionError::EmptyCollection {
                operation: "pop".to_string(),
            }
            .into()),
        }
    }

    /// Appends `value` at the next integer key.
    pub fn push(self, value: impl Into<Value>) -> Self {
        let mut data = self.data;
        data.push(value.into());
        Self { data }
    }

    /// Reverses element order.
    ///
    /// Integer keys are renumbered `0..` in the new order; text keys stay
    /// attached to their (reordered) values.
    pub fn reverse(self) -> Self {
        let mut entries = self.data.into_entries();
        entries.reverse();
        let mut data = Map::from_entries_unchecked(entries);
        data.reindex();
        Self { data }
    }

    /// Removes the first entry; the working set becomes the remainder.
    ///
    /// Remaining integer keys are renumbered from 0, text keys preserved.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::EmptyCollection`] when the working set is
    /// empty.
    pub fn shift(self) -> Result<Self> {
        let mut data = self.data;
        if data.remove_first().is_none() {
            return Err(CollectionError::EmptyCollection {
                operation: "shift".to_string(),
            }
            .into());
        }
        data.reindex();
        Ok(Self { data })
    }

    /// Extracts a contiguous sub-range of entries.
    ///
    /// A negative `offset` counts from the end; a negative `length` stops that
    /// many elements before the end; `None` takes everything from `offset`.
    /// Out-of-range bounds clamp rather than fail. Text keys are always
    /// preserved; integer keys are renumbered unless `preserve_keys`.
    pub fn slice(self, offset: i64, length: Option<i64>, preserve_keys: bool) -> Self {
        let len = self.data.len() as i64;
        let start = if offset < 0 {
            (len + offset).max(0)
        } else {
            offset.min(len)
        };
        let end = match length {
            None => len,
            Some(l) if l < 0 => (len + l).max(start),
            Some(l) => (start.saturating_add(l)).min(len),
        };

        let taken: Vec<(Key, Value)> = self
            .data
            .into_entries()
            .into_iter()
            .skip(start as usize)
            .take((end - start) as usize)
            .collect();
        let mut data = Map::from_entries_unchecked(taken);
        if !preserve_keys {
            data.reindex();
        }
        Self { data }
    }

    /// Prepends `value`; it takes key 0 and existing integer keys are
    /// renumbered after it.
    pub fn unshift(self, value: impl Into<Value>) -> Self {
        let mut data = self.data;
        let placeholder = Key::Int(data.next_int_key());
        data.insert_front(placeholder, value.into());
        data.reindex();
        Self { data }
    }

    /// Applies `f` to each entry for side effects only.
    ///
    /// The stored structure is unchanged; any extra state `f` needs travels as
    /// a closure capture.
    pub fn walk(self, mut f: impl FnMut(&Key, &Value)) -> Self {
        for (key, value) in self.data.iter() {
            f(key, value);
        }
        self
    }

    // --- Terminal accessors ---

    /// Returns the raw working set.
    pub fn as_map(&self) -> &Map {
        &self.data
    }

    /// Consumes the collection, returning the working set.
    pub fn into_map(self) -> Map {
        self.data
    }

    /// Numeric sum of all values.
    ///
    /// Coercion follows the loose-arithmetic convention: ints and floats as-is,
    /// booleans as 1/0, numeric text parsed, everything else contributes 0.
    pub fn sum(&self) -> f64 {
        self.data.values().map(Value::numeric).sum()
    }

    /// One uniformly-selected value using a caller-supplied random source, or
    /// `None` when empty. Supply a seeded RNG for deterministic selection.
    pub fn sample_with<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Option<&Value> {
        if self.data.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.data.len());
        self.data.values().nth(index)
    }

    /// One uniformly-selected value using the thread-local random source.
    pub fn sample(&self) -> Option<&Value> {
        self.sample_with(&mut rand::thread_rng())
    }

    /// Projects the working set onto `serde_json::Value`.
    ///
    /// A dense working set (keys exactly `0..n-1`) becomes a JSON array;
    /// anything else becomes an object with stringified keys.
    pub fn to_json(&self) -> serde_json::Value {
        self.data.to_json()
    }

    /// Serializes the JSON projection of the working set to a string.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(&self.to_json()).map_err(crate::Error::Serialize)
    }

    /// Produces a self-describing serialized form of the working set.
    ///
    /// Unlike [`Collection::to_json_string`], this encoding tags key and value
    /// types and preserves entry order exactly, so
    /// [`Collection::from_serialized`] reconstructs an equivalent collection.
    /// The layout is not a compatibility surface; only the round-trip is.
    pub fn to_serialized(&self) -> Result<String> {
        serde_json::to_string(&self.data).map_err(crate::Error::Serialize)
    }

    /// Reconstructs a collection from [`Collection::to_serialized`] output.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DeserializationFailed`] on malformed input
    /// or duplicate keys.
    pub fn from_serialized(input: &str) -> Result<Self> {
        let data: Map =
            serde_json::from_str(input).map_err(|e| CollectionError::DeserializationFailed {
                reason: e.to_string(),
            })?;
        data.ensure_unique_keys()?;
        Ok(Self { data })
    }
}

impl From<Collection> for Map {
    fn from(collection: Collection) -> Self {
        collection.data
    }
}

impl From<Map> for Collection {
    fn from(data: Map) -> Self {
        Self { data }
    }
}

impl FromIterator<Value> for Collection {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Collection::from_values(iter)
    }
}

impl IntoIterator for Collection {
    type Item = (Key, Value);
    type IntoIter = std::vec::IntoIter<(Key, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// The single value extracted by [`Collection::pop`].
///
/// `Scalar` exists so that the unusual pop contract (the popped value
/// replacing the entire working set) is visible in the type system. It
/// exposes only terminal accessors; there is no way back into the mapping
/// operations without constructing a fresh [`Collection`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Scalar {
    value: Value,
}

impl Scalar {
    /// Returns the extracted value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consumes the scalar, returning the extracted value
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Projects the extracted value onto `serde_json::Value`.
    pub fn to_json(&self) -> serde_json::Value {
        self.value.to_json()
    }

    /// Serializes the JSON projection of the extracted value to a string.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(&self.to_json()).map_err(crate::Error::Serialize)
    }
}

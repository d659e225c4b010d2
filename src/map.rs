//! Map type for tnetstring dicts.
//!
//! [`TnetMap`] is a thin wrapper around [`IndexMap`] keyed by [`Value`]. The
//! wire format allows any value as a dict key, so the map does too; the common
//! case of byte-string keys can be looked up with a plain `&str` or `&[u8]`
//! without building a key value first.
//!
//! Entries iterate in insertion order, which makes rendering deterministic for
//! a given map. Equality ignores order: two maps are equal when they hold the
//! same key/value pairs.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tnetstring::{TnetMap, Value};
//!
//! let mut map = TnetMap::new();
//! map.insert("name", "Alice");
//! map.insert(Value::Integer(7), true);
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! assert_eq!(map.get_value(&Value::Integer(7)), Some(&Value::Bool(true)));
//! ```

use crate::format::Kind;
use crate::Value;
use indexmap::{Equivalent, IndexMap};
use std::hash::{Hash, Hasher};

/// A borrowed byte-string key that hashes and compares like `Value::Bytes`.
struct BytesKey<'a>(&'a [u8]);

impl Hash for BytesKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must match `Value::hash` for `Value::Bytes`.
        Kind::Bytes.hash(state);
        self.0.hash(state);
    }
}

impl Equivalent<Value> for BytesKey<'_> {
    fn equivalent(&self, key: &Value) -> bool {
        matches!(key, Value::Bytes(b) if b.as_slice() == self.0)
    }
}

/// A map of tnetstring values to values.
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::{TnetMap, Value};
///
/// let mut map = TnetMap::new();
/// map.insert("first", 1);
/// map.insert("second", 2);
///
/// let keys: Vec<_> = map.keys().filter_map(Value::as_str).collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TnetMap(IndexMap<Value, Value>);

impl TnetMap {
    #[must_use]
    pub fn new() -> Self {
        TnetMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TnetMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// A repeated key keeps its original position and takes the new value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tnetstring::TnetMap;
    ///
    /// let mut map = TnetMap::new();
    /// assert!(map.insert("key", 42).is_none());
    /// assert!(map.insert("key", 43).is_some());
    /// ```
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value stored under a byte-string key.
    #[must_use]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Value> {
        self.0.get(&BytesKey(key.as_ref()))
    }

    /// Returns the value stored under an arbitrary key.
    #[must_use]
    pub fn get_value(&self, key: &Value) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.0.contains_key(&BytesKey(key.as_ref()))
    }

    /// Removes a byte-string key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: impl AsRef<[u8]>) -> Option<Value> {
        self.0.shift_remove(&BytesKey(key.as_ref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Value, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Value, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Value, Value> {
        self.0.iter()
    }
}

impl IntoIterator for TnetMap {
    type Item = (Value, Value);
    type IntoIter = indexmap::map::IntoIter<Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TnetMap {
    type Item = (&'a Value, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(Value, Value)> for TnetMap {
    fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
        TnetMap(IndexMap::from_iter(iter))
    }
}

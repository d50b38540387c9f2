//! Ordered key/value table for SCF documents.
//!
//! [`Table`] is both the parser's output and the public data model. It keeps
//! pairs in insertion order and tolerates duplicate keys: [`Table::add`]
//! always appends, while every lookup resolves to the *first* pair whose key
//! matches. [`Table::set`] is an upsert that updates that first pair in place.
//!
//! Pairs live in a `Vec`, and an [`IndexMap`] from key to the position of its
//! first pair serves lookups. The index also records the distinct keys in the
//! order they first appeared.
//!
//! ## Examples
//!
//! ```rust
//! use scf::{Table, Value};
//!
//! let mut table = Table::new();
//! table.add("name", "scf");
//! table.add("name", "shadowed");
//! table.set("port", 8080);
//!
//! assert_eq!(table.len(), 3);
//! assert_eq!(table.get_string("name"), Ok(Some("scf")));
//! assert_eq!(table.get_i32("port"), Ok(Some(8080)));
//! ```

use crate::value::{Value, ValueKind};
use crate::TypeError;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::ops::Index;

/// One key bound to one value.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    key: String,
    value: Value,
}

impl Pair {
    /// Creates a pair.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Pair {
            key: key.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Splits the pair into its owned key and value.
    #[must_use]
    pub fn into_parts(self) -> (String, Value) {
        (self.key, self.value)
    }
}

/// An insertion-ordered collection of [`Pair`]s with first-match lookup.
///
/// A table owns every pair, and through them every nested string and table.
/// Dropping it releases the whole subtree.
///
/// # Examples
///
/// ```rust
/// use scf::Table;
///
/// let mut table = Table::new();
/// table.add("first", 1);
/// table.add("second", 2);
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = table.keys().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Table {
    pairs: Vec<Pair>,
    first: IndexMap<String, usize>,
}

impl Table {
    /// Creates an empty `Table`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::Table;
    ///
    /// let table = Table::new();
    /// assert!(table.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Table {
            pairs: Vec::new(),
            first: IndexMap::new(),
        }
    }

    /// Creates an empty `Table` with room for `capacity` pairs.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Table {
            pairs: Vec::with_capacity(capacity),
            first: IndexMap::with_capacity(capacity),
        }
    }

    /// Appends a pair at the end, even if the key is already present.
    ///
    /// A duplicate is kept in iteration order but stays hidden from lookups,
    /// which always see the earliest pair for a key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::{Table, Value};
    ///
    /// let mut table = Table::new();
    /// table.add("include", "a.scf");
    /// table.add("include", "b.scf");
    ///
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.get("include"), Some(&Value::from("a.scf")));
    /// ```
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.push(Pair::new(key, value));
    }

    /// Appends an already built pair.
    pub fn push(&mut self, pair: Pair) {
        let position = self.pairs.len();
        if !self.first.contains_key(pair.key.as_str()) {
            self.first.insert(pair.key.clone(), position);
        }
        self.pairs.push(pair);
    }

    /// Returns `true` if any pair has this key.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.first.contains_key(key)
    }

    /// Returns the value of the first pair with this key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::{Table, Value};
    ///
    /// let mut table = Table::new();
    /// table.add("key", 42);
    /// assert_eq!(table.get("key"), Some(&Value::I32(42)));
    /// assert_eq!(table.get("other"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.first.get(key).map(|&pos| &self.pairs[pos].value)
    }

    /// Returns a mutable reference to the value of the first pair with this key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self.first.get(key) {
            Some(&pos) => Some(&mut self.pairs[pos].value),
            None => None,
        }
    }

    /// Returns every value stored under `key`, in insertion order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.pairs
            .iter()
            .filter(move |pair| pair.key == key)
            .map(|pair| &pair.value)
    }

    /// Updates the first pair with this key in place, or appends a new pair.
    ///
    /// Returns the replaced value, if any. Setting the same key twice never
    /// changes the table's length or order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::{Table, Value};
    ///
    /// let mut table = Table::new();
    /// table.add("a", 1);
    /// table.add("b", 2);
    ///
    /// assert_eq!(table.set("a", 10), Some(Value::I32(1)));
    /// assert_eq!(table.set("c", 3), None);
    ///
    /// let keys: Vec<_> = table.keys().collect();
    /// assert_eq!(keys, vec!["a", "b", "c"]);
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.first.get(key.as_str()) {
            Some(&pos) => Some(std::mem::replace(&mut self.pairs[pos].value, value)),
            None => {
                self.push(Pair { key, value });
                None
            }
        }
    }

    /// Looks up `key` and requires the value to be a boolean.
    ///
    /// `Ok(None)` means the key is absent; `Err` means it holds another kind.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, TypeError> {
        self.typed(key, ValueKind::Bool, Value::as_bool)
    }

    /// Looks up `key` and requires the value to be an `i32`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::Table;
    ///
    /// let mut table = Table::new();
    /// table.add("port", 8080);
    /// table.add("host", "localhost");
    ///
    /// assert_eq!(table.get_i32("port"), Ok(Some(8080)));
    /// assert_eq!(table.get_i32("timeout"), Ok(None));
    /// assert!(table.get_i32("host").is_err());
    /// ```
    pub fn get_i32(&self, key: &str) -> Result<Option<i32>, TypeError> {
        self.typed(key, ValueKind::I32, Value::as_i32)
    }

    /// Looks up `key` and requires the value to be an `f32`.
    pub fn get_f32(&self, key: &str) -> Result<Option<f32>, TypeError> {
        self.typed(key, ValueKind::F32, Value::as_f32)
    }

    /// Looks up `key` and requires the value to be a string.
    pub fn get_string(&self, key: &str) -> Result<Option<&str>, TypeError> {
        self.typed(key, ValueKind::String, Value::as_str)
    }

    /// Looks up `key` and requires the value to be a nested table.
    pub fn get_table(&self, key: &str) -> Result<Option<&Table>, TypeError> {
        self.typed(key, ValueKind::Table, Value::as_table)
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: ValueKind,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, TypeError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        match extract(value) {
            Some(v) => Ok(Some(v)),
            None => Err(TypeError {
                key: key.to_string(),
                expected,
                found: value.kind(),
            }),
        }
    }

    /// Returns the number of pairs, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if the table has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Drops every pair, and with them every nested string and table.
    pub fn clear(&mut self) {
        self.pairs.clear();
        self.first.clear();
    }

    /// Returns an iterator over the key-value pairs, in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.pairs.iter(),
        }
    }

    /// Returns the pairs as a slice, in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Returns an iterator over every key, duplicates included, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.pairs.iter().map(|pair| pair.key.as_str())
    }

    /// Returns an iterator over the distinct keys, in order of first appearance.
    pub fn unique_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.first.keys().map(String::as_str)
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.pairs.iter().map(|pair| &pair.value)
    }

    /// Returns a mutable iterator over the values, in insertion order.
    ///
    /// Keys stay fixed, so lookups keep resolving to the same pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::{Table, Value};
    ///
    /// let mut table: Table = [("a", 1), ("b", 2)].into_iter().collect();
    /// for value in table.values_mut() {
    ///     if let Value::I32(n) = value {
    ///         *n *= 10;
    ///     }
    /// }
    /// assert_eq!(table.get_i32("b"), Ok(Some(20)));
    /// ```
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> + '_ {
        self.pairs.iter_mut().map(|pair| &mut pair.value)
    }
}

/// Tables compare equal when they hold the same pairs in the same order.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs
    }
}

impl Index<&str> for Table {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if the key is absent.
    fn index(&self, key: &str) -> &Value {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no entry found for key: {key}"),
        }
    }
}

/// Borrowing iterator over a table's pairs.
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, Pair>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|pair| (pair.key.as_str(), &pair.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Table {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over a table's pairs.
pub struct IntoIter {
    inner: std::vec::IntoIter<Pair>,
}

impl Iterator for IntoIter {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Pair::into_parts)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for IntoIter {}

impl IntoIterator for Table {
    type Item = (String, Value);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.pairs.into_iter(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Table {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Table::new();
        table.extend(iter);
        table
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Table {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

/// Serializes as a map holding the first pair of each key, in order of first
/// appearance. Shadowed duplicates are left out, as they are for lookups.
impl Serialize for Table {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.first.len()))?;
        for (key, &pos) in &self.first {
            map.serialize_entry(key, &self.pairs[pos].value)?;
        }
        map.end()
    }
}

impl<'de> serde::Deserialize<'de> for Table {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        match Value::deserialize(deserializer)? {
            Value::Table(table) => Ok(table),
            other => Err(D::Error::custom(format!(
                "expected table, found {}",
                other.kind()
            ))),
        }
    }
}

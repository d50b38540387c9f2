//! Dynamic value representation for SCF data.
//!
//! This module provides the [`Value`] enum, the payload half of every
//! key/value pair in a [`Table`]. SCF knows exactly six kinds of value:
//!
//! | Kind | Syntax | Rust payload |
//! |------|--------|--------------|
//! | nil | `nil` | none |
//! | bool | `true`, `false` | `bool` |
//! | i32 | `-12`, `0`, `123` | `i32` |
//! | f32 | `1.5`, `-0.25`, `3.` | `f32` |
//! | string | `"text"` | `String` |
//! | table | `{ ... }` | [`Table`] |
//!
//! ## Extracting Values
//!
//! ```rust
//! use scf::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(42);
//! assert_eq!(value.as_i32(), Some(42));
//! assert_eq!(value.as_f32(), None);
//!
//! let num = i32::try_from(value).unwrap();
//! assert_eq!(num, 42);
//! ```

use crate::{Error, Table};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed SCF value.
///
/// Exactly one payload is live per instance, and asking for the wrong one
/// yields `None` (or a [`TypeError`](crate::TypeError) through the typed
/// table getters) rather than reinterpreting bits.
///
/// # Examples
///
/// ```rust
/// use scf::{Table, Value};
///
/// let nil = Value::Nil;
/// let num = Value::I32(42);
/// let text = Value::String("hello".to_string());
/// let nested = Value::Table(Table::new());
///
/// assert!(nil.is_nil());
/// assert!(num.is_i32());
/// assert!(text.is_string());
/// assert!(nested.is_table());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    I32(i32),
    F32(f32),
    String(String),
    Table(Table),
}

/// The type tag of a [`Value`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    I32,
    F32,
    String,
    Table,
}

impl ValueKind {
    /// Returns the lowercase name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Nil => "nil",
            ValueKind::Bool => "bool",
            ValueKind::I32 => "i32",
            ValueKind::F32 => "f32",
            ValueKind::String => "string",
            ValueKind::Table => "table",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Returns the type tag of this value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::{Value, ValueKind};
    ///
    /// assert_eq!(Value::from(1.5f32).kind(), ValueKind::F32);
    /// assert_eq!(Value::Nil.kind(), ValueKind::Nil);
    /// ```
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::I32(_) => ValueKind::I32,
            Value::F32(_) => ValueKind::F32,
            Value::String(_) => ValueKind::String,
            Value::Table(_) => ValueKind::Table,
        }
    }

    /// Returns `true` if the value is nil.
    #[inline]
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a 32-bit integer.
    #[inline]
    #[must_use]
    pub const fn is_i32(&self) -> bool {
        matches!(self, Value::I32(_))
    }

    /// Returns `true` if the value is a 32-bit float.
    #[inline]
    #[must_use]
    pub const fn is_f32(&self) -> bool {
        matches!(self, Value::F32(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is a nested table.
    #[inline]
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::Value;
    ///
    /// assert_eq!(Value::Bool(true).as_bool(), Some(true));
    /// assert_eq!(Value::from(42).as_bool(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is an integer, returns it. Otherwise returns `None`.
    ///
    /// Floats are never narrowed to integers.
    #[inline]
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(i) => Some(*i),
            _ => None,
        }
    }

    /// If the value is a float, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::F32(f) => Some(*f),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a nested table, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    /// If the value is a nested table, returns a mutable reference to it.
    #[inline]
    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::I32(i) => serializer.serialize_i32(*i),
            Value::F32(f) => serializer.serialize_f32(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Table(table) => table.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid SCF value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i32::try_from(value).map(Value::I32).map_err(|_| {
                    E::invalid_value(de::Unexpected::Signed(value), &"a 32-bit integer")
                })
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i32::try_from(value).map(Value::I32).map_err(|_| {
                    E::invalid_value(de::Unexpected::Unsigned(value), &"a 32-bit integer")
                })
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::F32(value as f32))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Nil)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Nil)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut table = Table::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    table.add(key, value);
                }
                Ok(Value::Table(table))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::custom(format!("expected bool, found {}", other.kind()))),
        }
    }
}

impl TryFrom<Value> for i32 {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::I32(i) => Ok(i),
            other => Err(Error::custom(format!("expected i32, found {}", other.kind()))),
        }
    }
}

impl TryFrom<Value> for f32 {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::F32(f) => Ok(f),
            other => Err(Error::custom(format!("expected f32, found {}", other.kind()))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::custom(format!(
                "expected string, found {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for Table {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Table(table) => Ok(table),
            other => Err(Error::custom(format!("expected table, found {}", other.kind()))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::I32(i32::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::I32(i32::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I32(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::I32(i32::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::I32(i32::from(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::F32(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Table> for Value {
    fn from(value: Table) -> Self {
        Value::Table(value)
    }
}

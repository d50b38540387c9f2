//! Mapping parsed SCF tables onto Rust types.
//!
//! This module provides a serde [`Deserializer`](serde::Deserializer) over an
//! owned [`Value`], so any `T: Deserialize` can be filled from a [`Table`]
//! after parsing. Tables deserialize as maps or structs, `nil` as unit or
//! `None`, and strings as unit enum variants.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Window { width: u32, height: u32, title: Option<String> }
//!
//! let window: Window = scf::from_str("width = 640 height = 480 title = nil").unwrap();
//! assert_eq!(window, Window { width: 640, height: 480, title: None });
//! ```
//!
//! A key bound twice in the same block resolves to its first pair, the same
//! value [`Table::get`] returns. Later pairs with that key are skipped, so maps
//! and structs never see them.

use crate::table::IntoIter;
use crate::{Error, Result, Table, Value};
use serde::de::{self, IntoDeserializer};
use serde::forward_to_deserialize_any;
use std::collections::HashSet;

/// Deserializes a `T` from a parsed table.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
///
/// let table = scf::parse("a = 1 b = 2").unwrap();
/// let map: BTreeMap<String, i32> = scf::from_table(table).unwrap();
/// assert_eq!(map["b"], 2);
/// ```
///
/// # Errors
///
/// Returns an error if the table's shape does not match `T`.
pub fn from_table<T>(table: Table) -> Result<T>
where
    T: de::DeserializeOwned,
{
    from_value(Value::Table(table))
}

/// Deserializes a `T` from any value.
///
/// # Errors
///
/// Returns an error if the value's shape does not match `T`.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: de::DeserializeOwned,
{
    T::deserialize(value)
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}

impl<'de> de::Deserializer<'de> for Value {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Nil => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::I32(i) => visitor.visit_i32(i),
            Value::F32(f) => visitor.visit_f32(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Table(table) => visitor.visit_map(MapDeserializer::new(table)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Nil => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Table(table) if table.unique_keys().count() == 1 => {
                match table.into_iter().next() {
                    Some((variant, value)) => {
                        visitor.visit_enum(EnumDeserializer::new(variant, value))
                    }
                    None => Err(Error::custom("expected a table with one key for an enum")),
                }
            }
            Value::Table(_) => Err(Error::custom("expected a table with one key for an enum")),
            other => Err(Error::custom(format!(
                "expected enum, found {}",
                other.kind()
            ))),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        drop(self);
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier
    }
}

/// Yields the first pair of every key, in order.
struct MapDeserializer {
    iter: IntoIter,
    seen: HashSet<String>,
    remaining: usize,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(table: Table) -> Self {
        let remaining = table.unique_keys().count();
        MapDeserializer {
            iter: table.into_iter(),
            seen: HashSet::with_capacity(remaining),
            remaining,
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        for (key, value) in self.iter.by_ref() {
            if self.seen.insert(key.clone()) {
                self.remaining -= 1;
                self.value = Some(value);
                return seed.deserialize(Value::String(key)).map(Some);
            }
        }
        Ok(None)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(value),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl EnumDeserializer {
    fn new(variant: String, value: Value) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(Value::String(self.variant))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Nil => Ok(()),
            other => Err(Error::custom(format!(
                "expected nil for unit variant, found {}",
                other.kind()
            ))),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.value)
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::custom("tuple variants are not representable in SCF"))
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Table(table) => visitor.visit_map(MapDeserializer::new(table)),
            other => Err(Error::custom(format!(
                "expected table for struct variant, found {}",
                other.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use serde::Deserialize;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Deserialize, Debug, PartialEq)]
    struct Server {
        host: String,
        port: u16,
        debug: bool,
        ratio: f32,
        limits: Limits,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Limits {
        connections: i64,
        timeout: Option<f64>,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Level {
        Debug,
        Info,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    enum Shape {
        Circle { radius: f32 },
        Square(i32),
    }

    #[test]
    fn test_struct_from_table() {
        let table = parse(
            "host = \"localhost\" port = 8080 debug = false ratio = 0.5
             limits { connections = 64 timeout = nil }",
        )
        .unwrap();
        let server: Server = from_table(table).unwrap();
        assert_eq!(
            server,
            Server {
                host: "localhost".to_string(),
                port: 8080,
                debug: false,
                ratio: 0.5,
                limits: Limits {
                    connections: 64,
                    timeout: None,
                },
            }
        );
    }

    #[test]
    fn test_option_some() {
        let limits: Limits =
            from_table(parse("connections = 1 timeout = 2.5").unwrap()).unwrap();
        assert_eq!(limits.timeout, Some(2.5));
    }

    #[test]
    fn test_missing_field() {
        let err = from_table::<Limits>(parse("timeout = 1.0").unwrap()).unwrap_err();
        assert!(err.to_string().contains("connections"));
    }

    #[test]
    fn test_out_of_range_for_target_type() {
        #[derive(Deserialize, Debug)]
        #[allow(dead_code)]
        struct Small {
            n: u8,
        }
        assert!(from_table::<Small>(parse("n = 300").unwrap()).is_err());
        assert!(from_table::<Small>(parse("n = -1").unwrap()).is_err());
    }

    #[test]
    fn test_unit_enum_from_string() {
        let level: Level = from_value(Value::from("info")).unwrap();
        assert_eq!(level, Level::Info);
        assert!(from_value::<Level>(Value::from("trace")).is_err());
        assert!(from_value::<Level>(Value::I32(1)).is_err());
        let _ = Level::Debug;
    }

    #[test]
    fn test_data_enums_from_single_entry_table() {
        let shape: Shape = from_table(parse("Circle { radius = 2.0 }").unwrap()).unwrap();
        assert_eq!(shape, Shape::Circle { radius: 2.0 });

        let shape: Shape = from_table(parse("Square = 3").unwrap()).unwrap();
        assert_eq!(shape, Shape::Square(3));

        assert!(from_table::<Shape>(parse("Square = 3 Circle {}").unwrap()).is_err());
    }

    #[test]
    fn test_map_keeps_all_keys() {
        let map: HashMap<String, Value> =
            from_table(parse("a = 1 b = \"x\" c { }").unwrap()).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map["b"], Value::from("x"));
        assert_eq!(map["c"], Value::Table(Table::new()));
    }

    #[test]
    fn test_duplicate_key_resolves_to_first_in_map() {
        let table = parse("a = 1 b = 3 a = 2").unwrap();
        assert_eq!(table.get_i32("a"), Ok(Some(1)));

        let map: BTreeMap<String, i32> = from_table(table).unwrap();
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_duplicate_field_resolves_to_first_in_struct() {
        let limits: Limits =
            from_table(parse("connections = 1 timeout = nil connections = 2").unwrap()).unwrap();
        assert_eq!(limits.connections, 1);
    }

    #[test]
    fn test_duplicate_keys_in_nested_blocks() {
        let map: BTreeMap<String, BTreeMap<String, i32>> =
            from_table(parse("s { x = 1 x = 2 } s { x = 3 }").unwrap()).unwrap();
        assert_eq!(map["s"]["x"], 1);
    }

    #[test]
    fn test_enum_ignores_shadowed_duplicates() {
        let shape: Shape = from_table(parse("Square = 3 Square = 4").unwrap()).unwrap();
        assert_eq!(shape, Shape::Square(3));
    }

    #[test]
    fn test_ignored_fields() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Only {
            keep: i32,
        }
        let only: Only = from_table(parse("skip { deep = 1 } keep = 2").unwrap()).unwrap();
        assert_eq!(only, Only { keep: 2 });
    }
}

//! Deserialization of tnetstrings into Rust types.
//!
//! The [`Deserializer`] pops one frame at a time off a byte slice with the
//! native hooks and then drives the visitor from the resulting [`Value`].
//! Because values are decoded into owned data first, types that borrow from
//! the input (`&str`, `&[u8]` fields) are not supported; use owned types.
//!
//! Byte strings are offered to visitors as strings when they are valid UTF-8
//! and as byte buffers otherwise.
//!
//! ## Usage
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_tnetstring::from_slice;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Data { x: i32, y: i32 }
//!
//! let data: Data = from_slice(b"16:1:x,1:1#1:y,1:2#}").unwrap();
//! assert_eq!(data, Data { x: 1, y: 2 });
//! ```
//!
//! ## Streams
//!
//! Several frames back to back can be read with [`Deserializer::into_iter`]:
//!
//! ```rust
//! use serde_tnetstring::Deserializer;
//!
//! let stream = Deserializer::from_slice(b"1:1#1:2#1:3#").into_iter::<i32>();
//! let numbers: Vec<i32> = stream.collect::<Result<_, _>>().unwrap();
//! assert_eq!(numbers, vec![1, 2, 3]);
//! ```

use crate::hooks::NativeHooks;
use crate::parser::pop_with;
use crate::{Error, ParseErrorKind, Result, TnetMap, TnetOptions, Value};
use serde::de::{self, DeserializeOwned, Deserializer as _, IntoDeserializer, Unexpected};
use std::marker::PhantomData;

/// A deserializer reading tnetstring frames from a byte slice.
///
/// Created via [`Deserializer::from_slice`] or [`Deserializer::with_options`].
pub struct Deserializer<'de> {
    input: &'de [u8],
    position: usize,
    options: TnetOptions,
}

impl<'de> Deserializer<'de> {
    pub fn from_slice(input: &'de [u8]) -> Self {
        Deserializer::with_options(input, TnetOptions::default())
    }

    pub fn with_options(input: &'de [u8], options: TnetOptions) -> Self {
        Deserializer {
            input,
            position: 0,
            options,
        }
    }

    /// Returns the number of bytes consumed so far.
    #[inline]
    #[must_use]
    pub fn byte_offset(&self) -> usize {
        self.position
    }

    /// Checks that the whole input has been consumed.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseErrorKind::TrailingBytes`] error if input remains.
    pub fn end(&self) -> Result<()> {
        if self.position < self.input.len() {
            return Err(Error::parse(
                ParseErrorKind::TrailingBytes,
                self.position,
                &format!(
                    "{} bytes after the top-level value",
                    self.input.len() - self.position
                ),
            ));
        }
        Ok(())
    }

    /// Turns this deserializer into an iterator over consecutive frames.
    #[allow(clippy::should_implement_trait)]
    pub fn into_iter<T>(self) -> StreamDeserializer<'de, T>
    where
        T: DeserializeOwned,
    {
        StreamDeserializer {
            de: self,
            failed: false,
            output: PhantomData,
        }
    }

    /// Pops the next frame, reporting error offsets relative to the whole input.
    fn next_value(&mut self) -> Result<Value> {
        let rest = &self.input[self.position..];
        match pop_with(&mut NativeHooks, rest, &self.options) {
            Ok((value, used)) => {
                self.position += used;
                Ok(value)
            }
            Err(Error::Parse { kind, offset, msg }) => Err(Error::Parse {
                kind,
                offset: offset + self.position,
                msg,
            }),
            Err(err) => Err(err),
        }
    }
}

macro_rules! deserialize_next_value {
    ($($method:ident ( $($arg:ident : $ty:ty),* )),* $(,)?) => {
        $(
            fn $method<V>(self, $($arg: $ty,)* visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                ValueDeserializer::new(self.next_value()?).$method($($arg,)* visitor)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = Error;

    deserialize_next_value! {
        deserialize_any(),
        deserialize_bool(),
        deserialize_i8(),
        deserialize_i16(),
        deserialize_i32(),
        deserialize_i64(),
        deserialize_i128(),
        deserialize_u8(),
        deserialize_u16(),
        deserialize_u32(),
        deserialize_u64(),
        deserialize_u128(),
        deserialize_f32(),
        deserialize_f64(),
        deserialize_char(),
        deserialize_str(),
        deserialize_string(),
        deserialize_bytes(),
        deserialize_byte_buf(),
        deserialize_option(),
        deserialize_unit(),
        deserialize_unit_struct(name: &'static str),
        deserialize_newtype_struct(name: &'static str),
        deserialize_seq(),
        deserialize_tuple(len: usize),
        deserialize_tuple_struct(name: &'static str, len: usize),
        deserialize_map(),
        deserialize_struct(name: &'static str, fields: &'static [&'static str]),
        deserialize_enum(name: &'static str, variants: &'static [&'static str]),
        deserialize_identifier(),
        deserialize_ignored_any(),
    }
}

/// An iterator deserializing consecutive frames from one buffer.
///
/// Iteration ends at the end of input, or after the first error.
pub struct StreamDeserializer<'de, T> {
    de: Deserializer<'de>,
    failed: bool,
    output: PhantomData<T>,
}

impl<'de, T> StreamDeserializer<'de, T> {
    /// Returns the number of bytes consumed so far.
    #[must_use]
    pub fn byte_offset(&self) -> usize {
        self.de.position
    }
}

impl<'de, T> Iterator for StreamDeserializer<'de, T>
where
    T: DeserializeOwned,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        if self.failed || self.de.position >= self.de.input.len() {
            return None;
        }
        let item = self.de.next_value().and_then(from_value);
        self.failed = item.is_err();
        Some(item)
    }
}

/// Deserializes an instance of `T` from a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::{from_value, tnet};
///
/// let pair: (i64, String) = from_value(tnet!([1, "one"])).unwrap();
/// assert_eq!(pair, (1, "one".to_string()));
/// ```
///
/// # Errors
///
/// Returns an error if the value's shape does not match `T`.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Integer(i) => Unexpected::Signed(*i),
        Value::Float(f) => Unexpected::Float(*f),
        Value::Bytes(b) => match std::str::from_utf8(b) {
            Ok(s) => Unexpected::Str(s),
            Err(_) => Unexpected::Bytes(b),
        },
        Value::List(_) => Unexpected::Seq,
        Value::Dict(_) => Unexpected::Map,
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<Value, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: TnetMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
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
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: Value,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(self.variant))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Value::Null) | None => Ok(()),
            Some(other) => Err(de::Error::invalid_type(unexpected(&other), &"unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"newtype variant",
            )),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::List(items)) => visitor.visit_seq(SeqDeserializer::new(items)),
            Some(other) => Err(de::Error::invalid_type(unexpected(&other), &"tuple variant")),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"tuple variant",
            )),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Dict(map)) => visitor.visit_map(MapDeserializer::new(map)),
            Some(other) => Err(de::Error::invalid_type(
                unexpected(&other),
                &"struct variant",
            )),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"struct variant",
            )),
        }
    }
}

/// A deserializer reading from an owned [`Value`].
///
/// Also available through [`IntoDeserializer`] on `Value`.
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer::new(self)
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Bytes(bytes) => match String::from_utf8(bytes) {
                Ok(s) => visitor.visit_string(s),
                Err(err) => visitor.visit_byte_buf(err.into_bytes()),
            },
            Value::List(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Value::Dict(map) => visitor.visit_map(MapDeserializer::new(map)),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Bytes(bytes) => visitor.visit_byte_buf(bytes),
            other => ValueDeserializer::new(other).deserialize_any(visitor),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
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
        match self.value {
            Value::Bytes(name) => visitor.visit_enum(EnumDeserializer {
                variant: Value::Bytes(name),
                value: None,
            }),
            Value::Dict(map) if map.len() == 1 => {
                let mut entries = map.into_iter();
                match entries.next() {
                    Some((variant, value)) => visitor.visit_enum(EnumDeserializer {
                        variant,
                        value: Some(value),
                    }),
                    None => Err(Error::custom("enum dict has no entry")),
                }
            }
            other => Err(de::Error::invalid_type(
                unexpected(&other),
                &"variant name or single-entry dict",
            )),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        unit unit_struct seq tuple tuple_struct map struct identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Deserialize, Debug, PartialEq)]
    enum Shape {
        Empty,
        Circle(f64),
        Segment(i32, i32),
        Rect { w: u8, h: u8 },
    }

    #[test]
    fn test_scalars_from_value() {
        assert_eq!(from_value::<i32>(Value::Integer(-4)).unwrap(), -4);
        assert_eq!(from_value::<f64>(Value::Integer(2)).unwrap(), 2.0);
        assert_eq!(from_value::<String>(Value::from("hi")).unwrap(), "hi");
        assert_eq!(from_value::<Option<u8>>(Value::Null).unwrap(), None);
        assert_eq!(from_value::<char>(Value::from("x")).unwrap(), 'x');
        assert!(from_value::<u8>(Value::Integer(300)).is_err());
    }

    #[test]
    fn test_non_utf8_bytes_stay_bytes() {
        let value = Value::Bytes(vec![0xff, 0x00]);
        assert!(from_value::<String>(value.clone()).is_err());
        assert_eq!(from_value::<Value>(value.clone()).unwrap(), value);
    }

    #[test]
    fn test_enum_shapes() {
        assert_eq!(from_value::<Shape>(Value::from("Empty")).unwrap(), Shape::Empty);

        let mut map = TnetMap::new();
        map.insert("Circle", 1.5);
        assert_eq!(
            from_value::<Shape>(Value::Dict(map)).unwrap(),
            Shape::Circle(1.5)
        );

        let mut map = TnetMap::new();
        map.insert("Segment", vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(
            from_value::<Shape>(Value::Dict(map)).unwrap(),
            Shape::Segment(1, 2)
        );

        let mut fields = TnetMap::new();
        fields.insert("w", 3);
        fields.insert("h", 4);
        let mut map = TnetMap::new();
        map.insert("Rect", fields);
        assert_eq!(
            from_value::<Shape>(Value::Dict(map)).unwrap(),
            Shape::Rect { w: 3, h: 4 }
        );

        assert!(from_value::<Shape>(Value::Integer(1)).is_err());
    }

    #[test]
    fn test_integer_map_keys() {
        let mut map = TnetMap::new();
        map.insert(1, "one");
        map.insert(2, "two");
        let out: BTreeMap<i64, String> = from_value(Value::Dict(map)).unwrap();
        assert_eq!(out.get(&2).map(String::as_str), Some("two"));
    }

    #[test]
    fn test_stream_yields_frames_then_stops_on_error() {
        let mut stream = Deserializer::from_slice(b"1:1#3:abc,1:2#").into_iter::<i64>();
        assert_eq!(stream.next().unwrap().unwrap(), 1);
        assert!(stream.next().unwrap().is_err());
        assert!(stream.next().is_none());
        assert_eq!(stream.byte_offset(), 10);
    }

    #[test]
    fn test_error_offsets_are_absolute() {
        let mut de = Deserializer::from_slice(b"1:1#5:ab,");
        let first: i64 = Deserialize::deserialize(&mut de).unwrap();
        assert_eq!(first, 1);
        let err = <i64 as Deserialize>::deserialize(&mut de).unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::Truncated));
        assert!(err.offset().unwrap() >= 4);
    }

    #[test]
    fn test_end_reports_trailing_bytes() {
        let mut de = Deserializer::from_slice(b"0:~0:~");
        let () = Deserialize::deserialize(&mut de).unwrap();
        let err = de.end().unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::TrailingBytes));
        assert_eq!(err.offset(), Some(3));
    }
}

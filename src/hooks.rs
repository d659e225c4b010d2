//! The hook interface between the codec engine and a host value model.
//!
//! The parser and renderer never touch concrete value types. A host plugs its
//! own model in by implementing two traits:
//!
//! - [`Construct`]: builds values while parsing, and releases half-built
//!   containers when a parse fails partway through
//! - [`Inspect`]: classifies and reads values while rendering
//!
//! [`NativeHooks`] implements both for this crate's [`Value`]. The
//! `custom_hooks` demo and the `hooks_tests` suite plug in `serde_json::Value`
//! the same way.
//!
//! ## Ownership
//!
//! A value returned by a construction hook belongs to the engine until it is
//! handed back to the host through `list_append`, `dict_insert`, or as the
//! parse result. A container obtained from `new_list`/`new_dict` is always
//! returned through exactly one of `finish_*` or `discard_*`.

use crate::format::Kind;
use crate::{TnetMap, Value};
use std::borrow::Cow;
use std::fmt;

/// A failure reported by a host hook.
///
/// The engine wraps it into a parse or render [`Error`](crate::Error) with
/// the kind and position it was raised at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookError(String);

impl HookError {
    pub fn new<T: fmt::Display>(msg: T) -> Self {
        HookError(msg.to_string())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for HookError {}

pub type HookResult<T> = std::result::Result<T, HookError>;

/// Construction hooks, called by the parser.
///
/// Methods take `&mut self` so a host can keep state such as an arena or
/// allocation counters.
pub trait Construct {
    /// The host's value type.
    type Value;
    /// A list under construction.
    type List;
    /// A dict under construction.
    type Dict;

    fn make_null(&mut self) -> HookResult<Self::Value>;

    fn make_bool(&mut self, value: bool) -> HookResult<Self::Value>;

    fn make_bytes(&mut self, data: &[u8]) -> HookResult<Self::Value>;

    /// Builds an integer from the whole of `text`, or returns `None` if the
    /// text is not an integer the host can represent.
    fn make_integer(&mut self, text: &str) -> Option<Self::Value>;

    /// Builds a float from the whole of `text`, or returns `None`.
    fn make_float(&mut self, text: &str) -> Option<Self::Value>;

    fn new_list(&mut self) -> HookResult<Self::List>;

    fn list_append(&mut self, list: &mut Self::List, item: Self::Value) -> HookResult<()>;

    fn finish_list(&mut self, list: Self::List) -> Self::Value;

    /// Releases a list abandoned because its contents failed to parse.
    fn discard_list(&mut self, list: Self::List) {
        drop(list);
    }

    fn new_dict(&mut self) -> HookResult<Self::Dict>;

    fn dict_insert(
        &mut self,
        dict: &mut Self::Dict,
        key: Self::Value,
        value: Self::Value,
    ) -> HookResult<()>;

    fn finish_dict(&mut self, dict: Self::Dict) -> Self::Value;

    /// Releases a dict abandoned because its contents failed to parse.
    fn discard_dict(&mut self, dict: Self::Dict) {
        drop(dict);
    }
}

/// A dict key as yielded by [`Inspect::dict_pairs`].
///
/// Hosts whose maps are keyed by plain strings can hand out the key bytes
/// directly instead of materializing a host value per key.
#[derive(Debug, Clone, Copy)]
pub enum Key<'a, V> {
    /// A key rendered as a byte string.
    Bytes(&'a [u8]),
    /// A key rendered as an arbitrary host value.
    Value(&'a V),
}

/// Inspection hooks, called by the renderer.
pub trait Inspect {
    /// The host's value type.
    type Value;

    /// Iterator over list elements. Must be double-ended: lists are rendered
    /// last element first.
    type Items<'a>: DoubleEndedIterator<Item = &'a Self::Value>
    where
        Self: 'a,
        Self::Value: 'a;

    /// Iterator over dict pairs, in whatever order the host provides.
    type Pairs<'a>: Iterator<Item = (Key<'a, Self::Value>, &'a Self::Value)>
    where
        Self: 'a,
        Self::Value: 'a;

    /// Maps a value onto one of the wire kinds, or `None` if it has no
    /// tnetstring representation.
    fn classify(&self, value: &Self::Value) -> Option<Kind>;

    fn bool_value(&self, value: &Self::Value) -> HookResult<bool>;

    fn integer_value(&self, value: &Self::Value) -> HookResult<i64>;

    fn float_value(&self, value: &Self::Value) -> HookResult<f64>;

    fn bytes_of<'a>(&'a self, value: &'a Self::Value) -> HookResult<Cow<'a, [u8]>>;

    fn list_items<'a>(&'a self, value: &'a Self::Value) -> HookResult<Self::Items<'a>>;

    fn dict_pairs<'a>(&'a self, value: &'a Self::Value) -> HookResult<Self::Pairs<'a>>;
}

/// Hooks for this crate's own [`Value`] model.
///
/// Dict keys may be any value, so every well-formed input parses.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeHooks;

impl Construct for NativeHooks {
    type Value = Value;
    type List = Vec<Value>;
    type Dict = TnetMap;

    fn make_null(&mut self) -> HookResult<Value> {
        Ok(Value::Null)
    }

    fn make_bool(&mut self, value: bool) -> HookResult<Value> {
        Ok(Value::Bool(value))
    }

    fn make_bytes(&mut self, data: &[u8]) -> HookResult<Value> {
        Ok(Value::Bytes(data.to_vec()))
    }

    fn make_integer(&mut self, text: &str) -> Option<Value> {
        text.parse::<i64>().ok().map(Value::Integer)
    }

    fn make_float(&mut self, text: &str) -> Option<Value> {
        text.parse::<f64>().ok().map(Value::Float)
    }

    fn new_list(&mut self) -> HookResult<Vec<Value>> {
        Ok(Vec::new())
    }

    fn list_append(&mut self, list: &mut Vec<Value>, item: Value) -> HookResult<()> {
        list.push(item);
        Ok(())
    }

    fn finish_list(&mut self, list: Vec<Value>) -> Value {
        Value::List(list)
    }

    fn new_dict(&mut self) -> HookResult<TnetMap> {
        Ok(TnetMap::new())
    }

    fn dict_insert(&mut self, dict: &mut TnetMap, key: Value, value: Value) -> HookResult<()> {
        dict.insert(key, value);
        Ok(())
    }

    fn finish_dict(&mut self, dict: TnetMap) -> Value {
        Value::Dict(dict)
    }
}

/// Adapts [`TnetMap`] iteration to the pair shape the renderer expects.
pub struct NativePairs<'a> {
    inner: indexmap::map::Iter<'a, Value, Value>,
}

impl<'a> Iterator for NativePairs<'a> {
    type Item = (Key<'a, Value>, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (Key::Value(k), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

fn mismatch(expected: Kind, value: &Value) -> HookError {
    HookError::new(format!("expected {}, found {}", expected, value.kind()))
}

impl Inspect for NativeHooks {
    type Value = Value;
    type Items<'a> = std::slice::Iter<'a, Value> where Self: 'a;
    type Pairs<'a> = NativePairs<'a> where Self: 'a;

    fn classify(&self, value: &Value) -> Option<Kind> {
        Some(value.kind())
    }

    fn bool_value(&self, value: &Value) -> HookResult<bool> {
        value.as_bool().ok_or_else(|| mismatch(Kind::Bool, value))
    }

    fn integer_value(&self, value: &Value) -> HookResult<i64> {
        match value {
            Value::Integer(i) => Ok(*i),
            _ => Err(mismatch(Kind::Integer, value)),
        }
    }

    fn float_value(&self, value: &Value) -> HookResult<f64> {
        match value {
            Value::Float(f) => Ok(*f),
            _ => Err(mismatch(Kind::Float, value)),
        }
    }

    fn bytes_of<'a>(&'a self, value: &'a Value) -> HookResult<Cow<'a, [u8]>> {
        value
            .as_bytes()
            .map(Cow::Borrowed)
            .ok_or_else(|| mismatch(Kind::Bytes, value))
    }

    fn list_items<'a>(&'a self, value: &'a Value) -> HookResult<std::slice::Iter<'a, Value>> {
        value
            .as_list()
            .map(|items| items.iter())
            .ok_or_else(|| mismatch(Kind::List, value))
    }

    fn dict_pairs<'a>(&'a self, value: &'a Value) -> HookResult<NativePairs<'a>> {
        value
            .as_dict()
            .map(|map| NativePairs { inner: map.iter() })
            .ok_or_else(|| mismatch(Kind::Dict, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_number_constructors() {
        let mut hooks = NativeHooks;
        assert_eq!(hooks.make_integer("-12"), Some(Value::Integer(-12)));
        assert_eq!(hooks.make_integer("1.5"), None);
        assert_eq!(hooks.make_float("1.5"), Some(Value::Float(1.5)));
        assert_eq!(hooks.make_float("abc"), None);
    }

    #[test]
    fn test_native_inspection_rejects_mismatched_kind() {
        let hooks = NativeHooks;
        let value = Value::from("text");
        assert!(hooks.integer_value(&value).is_err());
        assert_eq!(hooks.bytes_of(&value).unwrap().as_ref(), b"text");
        let err = hooks.bool_value(&value).unwrap_err();
        assert_eq!(err.message(), "expected bool, found bytes");
    }

    #[test]
    fn test_native_list_items_are_double_ended() {
        let hooks = NativeHooks;
        let value = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
        let last = hooks.list_items(&value).unwrap().next_back();
        assert_eq!(last, Some(&Value::Integer(2)));
    }
}

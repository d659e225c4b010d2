//! Rendering a foreign value model by implementing the inspection hooks.
//!
//! `serde_json::Value` objects are keyed by `String`, so the pairs iterator
//! hands keys to the renderer as raw bytes.
//!
//! Run with: cargo run --example custom_hooks

use serde_json::json;
use serde_tnetstring::render::render_with;
use serde_tnetstring::{parse, HookError, HookResult, Inspect, Key, Kind, TnetOptions};
use std::borrow::Cow;
use std::error::Error;

struct Json;

struct Pairs<'a>(serde_json::map::Iter<'a>);

impl<'a> Iterator for Pairs<'a> {
    type Item = (Key<'a, serde_json::Value>, &'a serde_json::Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (Key::Bytes(k.as_bytes()), v))
    }
}

impl Inspect for Json {
    type Value = serde_json::Value;
    type Items<'a> = std::slice::Iter<'a, serde_json::Value> where Self: 'a;
    type Pairs<'a> = Pairs<'a> where Self: 'a;

    fn classify(&self, value: &serde_json::Value) -> Option<Kind> {
        Some(match value {
            serde_json::Value::Null => Kind::Null,
            serde_json::Value::Bool(_) => Kind::Bool,
            serde_json::Value::Number(n) if n.is_f64() => Kind::Float,
            serde_json::Value::Number(_) => Kind::Integer,
            serde_json::Value::String(_) => Kind::Bytes,
            serde_json::Value::Array(_) => Kind::List,
            serde_json::Value::Object(_) => Kind::Dict,
        })
    }

    fn bool_value(&self, value: &serde_json::Value) -> HookResult<bool> {
        value.as_bool().ok_or_else(|| HookError::new("not a bool"))
    }

    fn integer_value(&self, value: &serde_json::Value) -> HookResult<i64> {
        value
            .as_i64()
            .ok_or_else(|| HookError::new(format!("{} is out of range", value)))
    }

    fn float_value(&self, value: &serde_json::Value) -> HookResult<f64> {
        value.as_f64().ok_or_else(|| HookError::new("not a float"))
    }

    fn bytes_of<'a>(&'a self, value: &'a serde_json::Value) -> HookResult<Cow<'a, [u8]>> {
        value
            .as_str()
            .map(|s| Cow::Borrowed(s.as_bytes()))
            .ok_or_else(|| HookError::new("not a string"))
    }

    fn list_items<'a>(
        &'a self,
        value: &'a serde_json::Value,
    ) -> HookResult<std::slice::Iter<'a, serde_json::Value>> {
        value
            .as_array()
            .map(|items| items.iter())
            .ok_or_else(|| HookError::new("not an array"))
    }

    fn dict_pairs<'a>(&'a self, value: &'a serde_json::Value) -> HookResult<Pairs<'a>> {
        value
            .as_object()
            .map(|map| Pairs(map.iter()))
            .ok_or_else(|| HookError::new("not an object"))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let doc = json!({
        "service": "indexer",
        "replicas": 3,
        "load": 0.75,
        "regions": ["eu", "us"],
        "paused": false
    });

    let bytes = render_with(&Json, &doc, &TnetOptions::default())?;
    println!("json:       {}", doc);
    println!("tnetstring: {}", String::from_utf8_lossy(&bytes));

    // Any host can read what another rendered.
    let native = parse(&bytes)?;
    println!("native:     {:?}", native);

    let too_big = json!([u64::MAX]);
    let err = render_with(&Json, &too_big, &TnetOptions::default()).unwrap_err();
    println!("\nrejected:   {}", err);

    Ok(())
}

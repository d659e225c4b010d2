//! # serde_tnetstring
//!
//! A tnetstring codec with a Serde bridge.
//!
//! ## What is a tnetstring?
//!
//! A tnetstring is a length-prefixed, type-tagged binary serialization:
//!
//! ```text
//! <length>:<payload><tag>
//! ```
//!
//! `length` is the decimal byte count of `payload`, and the single `tag` byte
//! says how to read it: `,` bytes, `#` number, `!` boolean, `~` null,
//! `]` list, `}` dict. Because every value announces its size up front, a
//! reader never scans for delimiters and byte strings need no escaping.
//!
//! ## Key Features
//!
//! - **Pluggable value model**: the [`parser`] and [`render`](mod@render) engines talk to
//!   values only through the [`Construct`] and [`Inspect`] hook traits
//! - **Single-pass rendering**: output is written back to front and reversed
//!   once, so container lengths never need a pre-pass
//! - **Framing**: [`pop`] decodes one value and hands back the rest of the
//!   buffer, for splitting consecutive frames off a stream
//! - **Serde compatible**: works with `#[derive(Serialize, Deserialize)]`
//! - **Hardened**: nesting depth is bounded and allocation failure is reported
//!   as an error instead of aborting
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_tnetstring::{from_slice, to_vec};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! let bytes = to_vec(&user).unwrap();
//! assert_eq!(bytes, b"42:2:id,3:123#4:name,5:Alice,6:active,4:true!}".to_vec());
//!
//! let user_back: User = from_slice(&bytes).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Dynamic Values
//!
//! ```rust
//! use serde_tnetstring::{parse, render, tnet, Value};
//!
//! let value = tnet!({ "foo": [1, 2] });
//! let bytes = render(&value).unwrap();
//! assert_eq!(bytes, b"17:3:foo,8:1:1#1:2#]}".to_vec());
//! assert_eq!(parse(&bytes).unwrap(), value);
//! ```
//!
//! ### Framing
//!
//! ```rust
//! use serde_tnetstring::{pop, Value};
//!
//! let (first, rest) = pop(b"5:hello,4:true!").unwrap();
//! assert_eq!(first, Value::from("hello"));
//! assert_eq!(rest, b"4:true!");
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade: completed
//! parses and renders at `trace`, rejected input and failed renders at
//! `debug`. The crate never installs a logger.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Serde round trip of a struct
//! - **`framing.rs`** - Splitting a byte stream into frames
//! - **`custom_hooks.rs`** - Plugging `serde_json::Value` into the engine
//!
//! Run any of them with: `cargo run --example <name>`

pub mod buffer;
pub mod de;
pub mod error;
pub mod format;
pub mod hooks;
pub mod macros;
pub mod map;
pub mod options;
pub mod parser;
pub mod render;
pub mod ser;
pub mod value;

pub use de::{from_value, Deserializer, StreamDeserializer};
pub use error::{Error, ParseErrorKind, RenderErrorKind, Result};
pub use format::{Kind, Tag};
pub use hooks::{Construct, HookError, HookResult, Inspect, Key, NativeHooks};
pub use map::TnetMap;
pub use options::TnetOptions;
pub use ser::{to_value, ValueSerializer};
pub use value::Value;

use serde::{Deserialize, Serialize};
use std::io;

/// Decodes one value from the front of `input`, returning it with the
/// unconsumed remainder.
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::{pop, Value};
///
/// let (value, rest) = pop(b"1:5#trailing").unwrap();
/// assert_eq!(value, Value::Integer(5));
/// assert_eq!(rest, b"trailing");
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] if the front of `input` is not a well-formed value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn pop(input: &[u8]) -> Result<(Value, &[u8])> {
    pop_with_options(input, &TnetOptions::default())
}

/// [`pop`] with custom options.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the front of `input` is not a well-formed value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn pop_with_options<'a>(input: &'a [u8], options: &TnetOptions) -> Result<(Value, &'a [u8])> {
    let (value, used) = parser::pop_with(&mut NativeHooks, input, options)?;
    Ok((value, &input[used..]))
}

/// Decodes exactly one value spanning all of `input`.
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::{parse, ParseErrorKind, Value};
///
/// assert_eq!(parse(b"4:true!").unwrap(), Value::Bool(true));
///
/// let err = parse(b"4:true!0:~").unwrap_err();
/// assert_eq!(err.parse_kind(), Some(ParseErrorKind::TrailingBytes));
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] if `input` is malformed or holds anything after
/// the value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(input: &[u8]) -> Result<Value> {
    parse_with_options(input, &TnetOptions::default())
}

/// [`parse`] with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::{parse_with_options, ParseErrorKind, TnetOptions};
///
/// let options = TnetOptions::new().with_max_depth(1);
/// assert!(parse_with_options(b"3:0:]]", &options).is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] if `input` is malformed, nests deeper than
/// allowed, or holds anything after the value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(input: &[u8], options: &TnetOptions) -> Result<Value> {
    parser::parse_with(&mut NativeHooks, input, options)
}

/// Encodes a [`Value`] as tnetstring bytes.
///
/// # Errors
///
/// Returns an error if the value nests deeper than the default limit or the
/// output buffer cannot be allocated.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn render(value: &Value) -> Result<Vec<u8>> {
    render_with_options(value, &TnetOptions::default())
}

/// [`render`] with custom options.
///
/// # Errors
///
/// Returns an error if the value nests deeper than `options.max_depth` or the
/// output buffer cannot be allocated.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn render_with_options(value: &Value, options: &TnetOptions) -> Result<Vec<u8>> {
    render::render_with(&NativeHooks, value, options)
}

/// Serializes any `T: Serialize` to tnetstring bytes.
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::to_vec;
///
/// assert_eq!(to_vec(&vec![1, 2]).unwrap(), b"8:1:1#1:2#]".to_vec());
/// assert_eq!(to_vec(&Some("hi")).unwrap(), b"2:hi,".to_vec());
/// ```
///
/// # Errors
///
/// Returns an error if `value` holds an integer outside the `i64` range or
/// cannot be rendered.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_vec_with_options(value, &TnetOptions::default())
}

/// [`to_vec`] with custom options.
///
/// # Errors
///
/// Returns an error if `value` cannot be converted or rendered.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_with_options<T>(value: &T, options: &TnetOptions) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    render_with_options(&to_value(value)?, options)
}

/// Serializes any `T: Serialize` to a writer.
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &true).unwrap();
/// assert_eq!(buffer, b"4:true!".to_vec());
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let bytes = to_vec(value)?;
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserializes an instance of `T` from one tnetstring spanning all of `v`.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_tnetstring::from_slice;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_slice(b"16:1:x,1:1#1:y,1:2#}").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are malformed, have trailing data, or do
/// not match the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<'a, T>(v: &'a [u8]) -> Result<T>
where
    T: Deserialize<'a>,
{
    from_slice_with_options(v, TnetOptions::default())
}

/// [`from_slice`] with custom options.
///
/// # Errors
///
/// Returns an error if the bytes are malformed, have trailing data, or do
/// not match the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options<'a, T>(v: &'a [u8], options: TnetOptions) -> Result<T>
where
    T: Deserialize<'a>,
{
    let mut deserializer = Deserializer::with_options(v, options);
    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

/// Deserializes an instance of `T` from an I/O stream holding one tnetstring.
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::from_reader;
/// use std::io::Cursor;
///
/// let names: Vec<String> = from_reader(Cursor::new(b"10:1:a,3:bcd,]")).unwrap();
/// assert_eq!(names, vec!["a".to_string(), "bcd".to_string()]);
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not a
/// single well-formed tnetstring, or the data cannot be deserialized to `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: for<'de> Deserialize<'de>,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

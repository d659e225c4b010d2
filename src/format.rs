//! The tnetstring wire format.
//!
//! # Grammar
//!
//! ```text
//! value   := length ":" payload tag
//! length  := 1*DIGIT            ; decimal byte count of payload
//! payload := length raw bytes   ; never scanned for delimiters
//! tag     := "," | "#" | "!" | "~" | "]" | "}"
//! ```
//!
//! | Tag | Type | Payload |
//! |-----|------|---------|
//! | `,` | Bytes | raw bytes, any content |
//! | `#` | Integer / Float | decimal text (`42`, `-7`, `1.5`, `1e-7`) |
//! | `!` | Bool | exactly `true` or `false` |
//! | `~` | Null | empty (`0:~`) |
//! | `]` | List | concatenated encoded elements |
//! | `}` | Dict | concatenated encoded key, value, key, value, ... |
//!
//! Because the payload boundary is given by the length, a reader can skip a
//! value without looking inside it, and several values may be written back to
//! back in one stream.
//!
//! ```text
//! {"foo": [1, 2]}  =>  17:3:foo,8:1:1#1:2#]}
//! ```
//!
//! Integers are written in canonical decimal with an optional leading `-`.
//! Floats are written in the shortest text that reads back to the same bits
//! and always include a `.` or an exponent (or are `NaN`, `inf`, `-inf`), so a
//! float never comes back as an integer.

use std::fmt;

/// The type tag that closes every encoded value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    String,
    Number,
    Bool,
    Null,
    List,
    Dict,
}

impl Tag {
    /// Maps a wire byte to its tag, or `None` for unknown bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tnetstring::format::Tag;
    ///
    /// assert_eq!(Tag::from_byte(b']'), Some(Tag::List));
    /// assert_eq!(Tag::from_byte(b'&'), None);
    /// ```
    #[inline]
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Tag> {
        match byte {
            b',' => Some(Tag::String),
            b'#' => Some(Tag::Number),
            b'!' => Some(Tag::Bool),
            b'~' => Some(Tag::Null),
            b']' => Some(Tag::List),
            b'}' => Some(Tag::Dict),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_byte(&self) -> u8 {
        match self {
            Tag::String => b',',
            Tag::Number => b'#',
            Tag::Bool => b'!',
            Tag::Null => b'~',
            Tag::List => b']',
            Tag::Dict => b'}',
        }
    }
}

/// The closed set of value categories the engine knows how to encode.
///
/// Host value models map their own types onto this enumeration through
/// [`Inspect::classify`](crate::hooks::Inspect::classify); the renderer
/// branches on nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Integer,
    Float,
    Bytes,
    List,
    Dict,
}

impl Kind {
    /// The tag this kind is written with. Integers and floats share `#`.
    #[inline]
    #[must_use]
    pub const fn tag(&self) -> Tag {
        match self {
            Kind::Null => Tag::Null,
            Kind::Bool => Tag::Bool,
            Kind::Integer | Kind::Float => Tag::Number,
            Kind::Bytes => Tag::String,
            Kind::List => Tag::List,
            Kind::Dict => Tag::Dict,
        }
    }

    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Kind::List | Kind::Dict)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Bytes => "bytes",
            Kind::List => "list",
            Kind::Dict => "dict",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `true` if `text` has integer syntax: an optional sign followed by digits.
///
/// Such payloads are never reinterpreted as floats, so integers outside the
/// 64-bit range fail instead of losing precision.
pub(crate) fn is_integer_syntax(text: &str) -> bool {
    let digits = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_bytes_are_inverse() {
        for tag in [
            Tag::String,
            Tag::Number,
            Tag::Bool,
            Tag::Null,
            Tag::List,
            Tag::Dict,
        ] {
            assert_eq!(Tag::from_byte(tag.as_byte()), Some(tag));
        }
        assert_eq!(Tag::from_byte(b':'), None);
        assert_eq!(Tag::from_byte(b'0'), None);
    }

    #[test]
    fn test_numbers_share_a_tag() {
        assert_eq!(Kind::Integer.tag(), Tag::Number);
        assert_eq!(Kind::Float.tag(), Tag::Number);
        assert!(Kind::Dict.is_container());
        assert!(!Kind::Bytes.is_container());
    }

    #[test]
    fn test_integer_syntax() {
        assert!(is_integer_syntax("0"));
        assert!(is_integer_syntax("-42"));
        assert!(is_integer_syntax("+7"));
        assert!(is_integer_syntax("99999999999999999999"));
        assert!(!is_integer_syntax(""));
        assert!(!is_integer_syntax("-"));
        assert!(!is_integer_syntax("1.5"));
        assert!(!is_integer_syntax("1e5"));
        assert!(!is_integer_syntax("NaN"));
    }
}

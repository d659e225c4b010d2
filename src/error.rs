//! Error types for tnetstring parsing and rendering.
//!
//! Every failure the codec can report is a variant of [`Error`]:
//!
//! - **Parse errors**: grammar violations, each tagged with a [`ParseErrorKind`]
//!   and the byte offset where the problem was detected
//! - **Render errors**: values the host model could not classify or inspect,
//!   tagged with a [`RenderErrorKind`]
//! - **Out of memory**: the output buffer could not grow
//! - **I/O and custom errors**: raised by the Serde bridge and the writer helpers
//!
//! No partial value or partial output is ever returned alongside an error.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tnetstring::{parse, ParseErrorKind};
//!
//! let err = parse(b"3:abc&").unwrap_err();
//! assert_eq!(err.parse_kind(), Some(ParseErrorKind::UnknownTag));
//! assert_eq!(err.offset(), Some(5));
//! ```

use std::fmt;
use thiserror::Error;

/// The grammar rule a parse failed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The length prefix is missing, signed, or does not fit in `usize`.
    MalformedLength,
    /// The length prefix is not followed by `:`.
    MissingSeparator,
    /// The input ends before the declared payload and its tag.
    Truncated,
    /// The byte after the payload is not a known type tag.
    UnknownTag,
    /// A `#` payload is neither a 64-bit integer nor a float.
    InvalidNumber,
    /// A `!` payload is not exactly `true` or `false`.
    InvalidBool,
    /// A `~` value carries a payload.
    InvalidNull,
    /// A child value runs past the end of its enclosing container.
    ContainerOverrun,
    /// A dict payload ends after a key with no value.
    DanglingKey,
    /// Containers are nested deeper than the configured limit.
    DepthLimitExceeded,
    /// Bytes remain after the top-level value in an exhaustive parse.
    TrailingBytes,
    /// The host value model refused to build a value.
    HookFailure,
}

impl ParseErrorKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::MalformedLength => "malformed length",
            ParseErrorKind::MissingSeparator => "missing separator",
            ParseErrorKind::Truncated => "truncated input",
            ParseErrorKind::UnknownTag => "unknown tag",
            ParseErrorKind::InvalidNumber => "invalid number",
            ParseErrorKind::InvalidBool => "invalid bool",
            ParseErrorKind::InvalidNull => "invalid null",
            ParseErrorKind::ContainerOverrun => "container overrun",
            ParseErrorKind::DanglingKey => "dangling key",
            ParseErrorKind::DepthLimitExceeded => "depth limit exceeded",
            ParseErrorKind::TrailingBytes => "trailing bytes",
            ParseErrorKind::HookFailure => "hook failure",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reason a render failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderErrorKind {
    /// The host could not classify a value as one of the wire types.
    UnsupportedValueType,
    /// An inspection hook failed while reading a value.
    HookFailure,
    /// The value graph is nested deeper than the configured limit.
    DepthLimitExceeded,
}

impl RenderErrorKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RenderErrorKind::UnsupportedValueType => "unsupported value type",
            RenderErrorKind::HookFailure => "hook failure",
            RenderErrorKind::DepthLimitExceeded => "depth limit exceeded",
        }
    }
}

impl fmt::Display for RenderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents all possible errors that can occur while parsing or rendering tnetstrings.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed input, with the offset of the offending byte
    #[error("Parse error at byte {offset}: {kind}: {msg}")]
    Parse {
        kind: ParseErrorKind,
        offset: usize,
        msg: String,
    },

    /// A value that could not be rendered
    #[error("Render error: {kind}: {msg}")]
    Render { kind: RenderErrorKind, msg: String },

    /// The output buffer could not grow; the render was abandoned
    #[error("Out of memory: could not grow output buffer to {requested} bytes")]
    OutOfMemory { requested: usize },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a parse error of the given kind at a byte offset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tnetstring::{Error, ParseErrorKind};
    ///
    /// let err = Error::parse(ParseErrorKind::MissingSeparator, 3, "expected ':'");
    /// assert!(err.to_string().contains("byte 3"));
    /// ```
    pub fn parse(kind: ParseErrorKind, offset: usize, msg: &str) -> Self {
        Error::Parse {
            kind,
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates a render error of the given kind.
    pub fn render(kind: RenderErrorKind, msg: &str) -> Self {
        Error::Render {
            kind,
            msg: msg.to_string(),
        }
    }

    pub fn out_of_memory(requested: usize) -> Self {
        Error::OutOfMemory { requested }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tnetstring::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the parse error kind, if this is a parse error.
    #[must_use]
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            Error::Parse { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns the render error kind, if this is a render error.
    #[must_use]
    pub fn render_kind(&self) -> Option<RenderErrorKind> {
        match self {
            Error::Render { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns the byte offset a parse error was detected at.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Parse { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Error::OutOfMemory { .. })
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_accessors() {
        let err = Error::parse(ParseErrorKind::DanglingKey, 12, "key without value");
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::DanglingKey));
        assert_eq!(err.render_kind(), None);
        assert_eq!(err.offset(), Some(12));
        assert!(!err.is_out_of_memory());
    }

    #[test]
    fn test_display_includes_kind_and_offset() {
        let err = Error::parse(ParseErrorKind::InvalidBool, 4, "expected 'true' or 'false'");
        let text = err.to_string();
        assert!(text.contains("byte 4"));
        assert!(text.contains("invalid bool"));
    }

    #[test]
    fn test_render_error_accessors() {
        let err = Error::render(RenderErrorKind::UnsupportedValueType, "opaque handle");
        assert_eq!(err.render_kind(), Some(RenderErrorKind::UnsupportedValueType));
        assert_eq!(err.offset(), None);
        assert!(err.to_string().contains("unsupported value type"));
    }

    #[test]
    fn test_out_of_memory() {
        let err = Error::out_of_memory(1 << 40);
        assert!(err.is_out_of_memory());
        assert!(err.to_string().contains("1099511627776"));
    }
}

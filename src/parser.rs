//! The tnetstring parser.
//!
//! The parser is a recursive descent over an explicit cursor into the input.
//! It builds values exclusively through a [`Construct`] implementation, so it
//! works for any host value model.
//!
//! Parsing has "pop" semantics: [`pop_with`] decodes exactly one value from
//! the front of the buffer and reports how many bytes it used. Whatever
//! follows is left for the caller, which is how consecutive frames on one
//! stream are split.
//!
//! ```rust
//! use serde_tnetstring::hooks::NativeHooks;
//! use serde_tnetstring::parser::pop_with;
//! use serde_tnetstring::{TnetOptions, Value};
//!
//! let input = b"5:hello,4:true!";
//! let (value, used) = pop_with(&mut NativeHooks, input, &TnetOptions::default()).unwrap();
//! assert_eq!(value, Value::from("hello"));
//! assert_eq!(&input[used..], b"4:true!");
//! ```
//!
//! If a list or dict fails partway through, the half-built container is
//! returned to the host through `discard_list`/`discard_dict` at every level
//! before the error is reported.

use crate::format::{is_integer_syntax, Tag};
use crate::hooks::{Construct, HookError};
use crate::{Error, ParseErrorKind, Result, TnetOptions};

/// Parses one value from the front of `input`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
///
/// Returns [`Error::Parse`] describing the first grammar violation found. No
/// partially built value is returned.
pub fn pop_with<H: Construct>(
    hooks: &mut H,
    input: &[u8],
    options: &TnetOptions,
) -> Result<(H::Value, usize)> {
    let mut parser = Parser {
        input,
        pos: 0,
        hooks,
        max_depth: options.max_depth,
    };
    match parser.parse_value(input.len(), 0) {
        Ok(value) => {
            log::trace!("parsed tnetstring frame of {} bytes", parser.pos);
            Ok((value, parser.pos))
        }
        Err(err) => {
            log::debug!("rejected tnetstring input: {}", err);
            Err(err)
        }
    }
}

/// Parses exactly one value spanning all of `input`.
///
/// # Errors
///
/// As [`pop_with`], plus [`ParseErrorKind::TrailingBytes`] if anything
/// follows the value.
pub fn parse_with<H: Construct>(
    hooks: &mut H,
    input: &[u8],
    options: &TnetOptions,
) -> Result<H::Value> {
    let (value, used) = pop_with(hooks, input, options)?;
    if used != input.len() {
        log::debug!(
            "rejected tnetstring input: {} trailing bytes",
            input.len() - used
        );
        return Err(Error::parse(
            ParseErrorKind::TrailingBytes,
            used,
            &format!("{} bytes after the top-level value", input.len() - used),
        ));
    }
    Ok(value)
}

struct Parser<'a, 'h, H> {
    input: &'a [u8],
    pos: usize,
    hooks: &'h mut H,
    max_depth: usize,
}

impl<'a, 'h, H: Construct> Parser<'a, 'h, H> {
    /// Running out of room is truncation at the top level and an overrun
    /// inside a container, whose payload boundary is the limit.
    fn out_of_room(&self, depth: usize, offset: usize, expected: &str) -> Error {
        if depth == 0 {
            Error::parse(ParseErrorKind::Truncated, offset, expected)
        } else {
            Error::parse(
                ParseErrorKind::ContainerOverrun,
                offset,
                &format!("{} runs past the end of the enclosing container", expected),
            )
        }
    }

    fn hook_failed(&self, offset: usize, err: HookError) -> Error {
        Error::parse(ParseErrorKind::HookFailure, offset, err.message())
    }

    /// Reads the length prefix and separator, leaving the cursor on the payload.
    fn parse_length(&mut self, end: usize, depth: usize) -> Result<usize> {
        let start = self.pos;
        let mut length: usize = 0;
        while self.pos < end && self.input[self.pos].is_ascii_digit() {
            let digit = (self.input[self.pos] - b'0') as usize;
            length = length
                .checked_mul(10)
                .and_then(|l| l.checked_add(digit))
                .ok_or_else(|| {
                    Error::parse(
                        ParseErrorKind::MalformedLength,
                        start,
                        "length prefix overflows",
                    )
                })?;
            self.pos += 1;
        }

        if self.pos == start {
            if self.pos >= end {
                return Err(self.out_of_room(depth, self.pos, "expected a length prefix"));
            }
            return Err(Error::parse(
                ParseErrorKind::MalformedLength,
                self.pos,
                "expected a decimal digit",
            ));
        }
        if self.pos >= end {
            return Err(self.out_of_room(depth, self.pos, "expected ':' after the length"));
        }
        if self.input[self.pos] != b':' {
            return Err(Error::parse(
                ParseErrorKind::MissingSeparator,
                self.pos,
                "expected ':' after the length",
            ));
        }
        self.pos += 1;
        Ok(length)
    }

    fn parse_value(&mut self, end: usize, depth: usize) -> Result<H::Value> {
        let length = self.parse_length(end, depth)?;
        let payload_start = self.pos;

        // The payload must be followed by its tag byte.
        if length >= end - payload_start {
            return Err(self.out_of_room(
                depth,
                payload_start,
                &format!("payload of {} bytes plus tag", length),
            ));
        }
        let input = self.input;
        let payload_end = payload_start + length;
        let tag_byte = input[payload_end];
        let tag = Tag::from_byte(tag_byte).ok_or_else(|| {
            Error::parse(
                ParseErrorKind::UnknownTag,
                payload_end,
                &format!("unknown tag byte 0x{:02x}", tag_byte),
            )
        })?;
        let payload = &input[payload_start..payload_end];

        let value = match tag {
            Tag::String => self
                .hooks
                .make_bytes(payload)
                .map_err(|e| self.hook_failed(payload_start, e))?,
            Tag::Number => self.parse_number(payload, payload_start)?,
            Tag::Bool => {
                let b = match payload {
                    b"true" => true,
                    b"false" => false,
                    _ => {
                        return Err(Error::parse(
                            ParseErrorKind::InvalidBool,
                            payload_start,
                            "expected 'true' or 'false'",
                        ))
                    }
                };
                self.hooks
                    .make_bool(b)
                    .map_err(|e| self.hook_failed(payload_start, e))?
            }
            Tag::Null => {
                if length != 0 {
                    return Err(Error::parse(
                        ParseErrorKind::InvalidNull,
                        payload_start,
                        "null must have an empty payload",
                    ));
                }
                self.hooks
                    .make_null()
                    .map_err(|e| self.hook_failed(payload_start, e))?
            }
            Tag::List => {
                self.enter_container(depth, payload_start)?;
                self.parse_list(payload_end, depth + 1)?
            }
            Tag::Dict => {
                self.enter_container(depth, payload_start)?;
                self.parse_dict(payload_end, depth + 1)?
            }
        };

        self.pos = payload_end + 1;
        Ok(value)
    }

    fn enter_container(&self, depth: usize, offset: usize) -> Result<()> {
        if depth >= self.max_depth {
            log::debug!("tnetstring nesting exceeds depth limit {}", self.max_depth);
            return Err(Error::parse(
                ParseErrorKind::DepthLimitExceeded,
                offset,
                &format!("containers nested deeper than {}", self.max_depth),
            ));
        }
        Ok(())
    }

    fn parse_number(&mut self, payload: &[u8], offset: usize) -> Result<H::Value> {
        let invalid = |msg: &str| Error::parse(ParseErrorKind::InvalidNumber, offset, msg);
        let text = std::str::from_utf8(payload).map_err(|_| invalid("number is not ASCII"))?;

        if let Some(value) = self.hooks.make_integer(text) {
            return Ok(value);
        }
        if is_integer_syntax(text) {
            return Err(invalid("integer does not fit in 64 bits"));
        }
        self.hooks
            .make_float(text)
            .ok_or_else(|| invalid("expected an integer or float"))
    }

    fn parse_list(&mut self, end: usize, depth: usize) -> Result<H::Value> {
        let offset = self.pos;
        let mut list = self
            .hooks
            .new_list()
            .map_err(|e| self.hook_failed(offset, e))?;
        match self.fill_list(&mut list, end, depth) {
            Ok(()) => Ok(self.hooks.finish_list(list)),
            Err(err) => {
                self.hooks.discard_list(list);
                Err(err)
            }
        }
    }

    fn fill_list(&mut self, list: &mut H::List, end: usize, depth: usize) -> Result<()> {
        while self.pos < end {
            let offset = self.pos;
            let item = self.parse_value(end, depth)?;
            self.hooks
                .list_append(list, item)
                .map_err(|e| self.hook_failed(offset, e))?;
        }
        Ok(())
    }

    fn parse_dict(&mut self, end: usize, depth: usize) -> Result<H::Value> {
        let offset = self.pos;
        let mut dict = self
            .hooks
            .new_dict()
            .map_err(|e| self.hook_failed(offset, e))?;
        match self.fill_dict(&mut dict, end, depth) {
            Ok(()) => Ok(self.hooks.finish_dict(dict)),
            Err(err) => {
                self.hooks.discard_dict(dict);
                Err(err)
            }
        }
    }

    fn fill_dict(&mut self, dict: &mut H::Dict, end: usize, depth: usize) -> Result<()> {
        while self.pos < end {
            let offset = self.pos;
            let key = self.parse_value(end, depth)?;
            if self.pos >= end {
                return Err(Error::parse(
                    ParseErrorKind::DanglingKey,
                    offset,
                    "dict key has no value",
                ));
            }
            let value = self.parse_value(end, depth)?;
            self.hooks
                .dict_insert(dict, key, value)
                .map_err(|e| self.hook_failed(offset, e))?;
        }
        Ok(())
    }
}

//! The tnetstring renderer.
//!
//! Rendering walks a host value through an [`Inspect`] implementation and
//! writes into a [`ReverseBuffer`] back to front. Each node is emitted as its
//! tag, then its payload reversed, then `:` and the reversed length digits,
//! once the payload size is known. Lists are walked last element first and
//! dict pairs value first, so that one reversal of the finished buffer yields
//! the forward encoding with no length pre-pass.
//!
//! ```rust
//! use serde_tnetstring::hooks::NativeHooks;
//! use serde_tnetstring::render::render_with;
//! use serde_tnetstring::{tnet, TnetOptions};
//!
//! let value = tnet!({ "foo": [1, 2] });
//! let bytes = render_with(&NativeHooks, &value, &TnetOptions::default()).unwrap();
//! assert_eq!(bytes, b"17:3:foo,8:1:1#1:2#]}".to_vec());
//! ```

use crate::buffer::ReverseBuffer;
use crate::format::{Kind, Tag};
use crate::hooks::{HookError, Inspect, Key};
use crate::{Error, RenderErrorKind, Result, TnetOptions};
use std::fmt::Write as _;

/// Renders `value` to tnetstring bytes.
///
/// # Errors
///
/// Returns [`Error::Render`] if a value cannot be classified or a hook fails,
/// and [`Error::OutOfMemory`] if the output buffer cannot grow. Nothing is
/// returned on failure.
pub fn render_with<H: Inspect>(
    hooks: &H,
    value: &H::Value,
    options: &TnetOptions,
) -> Result<Vec<u8>> {
    let mut renderer = Renderer {
        hooks,
        buf: ReverseBuffer::with_capacity(options.initial_capacity)?,
        max_depth: options.max_depth,
    };
    if let Err(err) = renderer.render_value(value, 0) {
        log::debug!("tnetstring render failed: {}", err);
        return Err(err);
    }
    let bytes = renderer.buf.into_forward();
    log::trace!("rendered tnetstring of {} bytes", bytes.len());
    Ok(bytes)
}

struct Renderer<'h, H> {
    hooks: &'h H,
    buf: ReverseBuffer,
    max_depth: usize,
}

fn hook_failed(err: HookError) -> Error {
    Error::render(RenderErrorKind::HookFailure, err.message())
}

impl<'h, H: Inspect> Renderer<'h, H> {
    fn render_value(&mut self, value: &H::Value, depth: usize) -> Result<()> {
        let hooks = self.hooks;
        let kind = hooks.classify(value).ok_or_else(|| {
            Error::render(
                RenderErrorKind::UnsupportedValueType,
                "value has no tnetstring representation",
            )
        })?;
        if kind.is_container() && depth >= self.max_depth {
            return Err(Error::render(
                RenderErrorKind::DepthLimitExceeded,
                &format!("containers nested deeper than {}", self.max_depth),
            ));
        }

        let start = self.buf.len();
        self.buf.push(kind.tag().as_byte())?;
        match kind {
            Kind::Null => {}
            Kind::Bool => {
                let text: &[u8] = if hooks.bool_value(value).map_err(hook_failed)? {
                    b"true"
                } else {
                    b"false"
                };
                self.buf.push_reversed(text)?;
            }
            Kind::Integer => {
                let n = hooks.integer_value(value).map_err(hook_failed)?;
                self.buf.push_integer(n)?;
            }
            Kind::Float => {
                let f = hooks.float_value(value).map_err(hook_failed)?;
                self.push_float(f)?;
            }
            Kind::Bytes => {
                let bytes = hooks.bytes_of(value).map_err(hook_failed)?;
                self.buf.push_reversed(&bytes)?;
            }
            Kind::List => {
                let items = hooks.list_items(value).map_err(hook_failed)?;
                for item in items.rev() {
                    self.render_value(item, depth + 1)?;
                }
            }
            Kind::Dict => {
                let pairs = hooks.dict_pairs(value).map_err(hook_failed)?;
                for (key, item) in pairs {
                    self.render_value(item, depth + 1)?;
                    match key {
                        Key::Value(key) => self.render_value(key, depth + 1)?,
                        Key::Bytes(bytes) => self.render_bytes(bytes)?,
                    }
                }
            }
        }
        self.buf.close_frame(start)
    }

    fn render_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let start = self.buf.len();
        self.buf.push(Tag::String.as_byte())?;
        self.buf.push_reversed(bytes)?;
        self.buf.close_frame(start)
    }

    /// Writes the shortest text that parses back to the same float.
    ///
    /// `Debug` formatting keeps a `.0` on integral values and uses an
    /// exponent for very large or small magnitudes, so the text can never be
    /// mistaken for an integer.
    fn push_float(&mut self, f: f64) -> Result<()> {
        let mut text = String::with_capacity(24);
        write!(text, "{:?}", f).map_err(Error::custom)?;
        self.buf.push_reversed(text.as_bytes())
    }
}

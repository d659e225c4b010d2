//! Backward-growing output buffer used by the renderer.
//!
//! A container's length prefix can only be written once its children have been
//! written. Instead of computing lengths in a separate pass, the renderer
//! appends every frame *back to front*: tag, payload reversed, `:`, then the
//! length digits reversed. A single reversal of the whole buffer at the end
//! produces the forward wire bytes.
//!
//! ```rust
//! use serde_tnetstring::buffer::ReverseBuffer;
//!
//! let mut buf = ReverseBuffer::with_capacity(16).unwrap();
//! let start = buf.len();
//! buf.push(b',').unwrap();
//! buf.push_reversed(b"hello").unwrap();
//! buf.close_frame(start).unwrap();
//! assert_eq!(buf.into_forward(), b"5:hello,".to_vec());
//! ```

use crate::{Error, Result};

/// An append-only byte buffer whose contents are read in reverse.
///
/// Capacity doubles on overflow. Growth goes through fallible reservation, so
/// an allocation failure surfaces as [`Error::OutOfMemory`] instead of
/// aborting the process.
#[derive(Debug, Default)]
pub struct ReverseBuffer {
    bytes: Vec<u8>,
}

impl ReverseBuffer {
    /// Creates a buffer holding at least `capacity` bytes before it grows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the initial allocation fails.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(capacity)
            .map_err(|_| Error::out_of_memory(capacity))?;
        Ok(ReverseBuffer { bytes })
    }

    /// Number of bytes written so far.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    fn reserve(&mut self, additional: usize) -> Result<()> {
        let len = self.bytes.len();
        let needed = len
            .checked_add(additional)
            .ok_or_else(|| Error::out_of_memory(usize::MAX))?;
        if needed <= self.bytes.capacity() {
            return Ok(());
        }

        let mut target = self.bytes.capacity().max(1);
        while target < needed {
            target = target.checked_mul(2).unwrap_or(needed);
        }
        self.bytes
            .try_reserve_exact(target - len)
            .map_err(|_| Error::out_of_memory(target))
    }

    /// Appends a single byte.
    #[inline]
    pub fn push(&mut self, byte: u8) -> Result<()> {
        self.reserve(1)?;
        self.bytes.push(byte);
        Ok(())
    }

    /// Appends `data` in reverse byte order.
    pub fn push_reversed(&mut self, data: &[u8]) -> Result<()> {
        self.reserve(data.len())?;
        self.bytes.extend(data.iter().rev());
        Ok(())
    }

    /// Appends the decimal digits of `n`, least significant first.
    pub fn push_decimal(&mut self, mut n: u64) -> Result<()> {
        // u64::MAX has 20 digits
        self.reserve(20)?;
        loop {
            self.bytes.push(b'0' + (n % 10) as u8);
            n /= 10;
            if n == 0 {
                return Ok(());
            }
        }
    }

    /// Appends the canonical decimal text of `n`, reversed.
    pub fn push_integer(&mut self, n: i64) -> Result<()> {
        self.push_decimal(n.unsigned_abs())?;
        if n < 0 {
            self.push(b'-')?;
        }
        Ok(())
    }

    /// Closes the frame opened at `start`.
    ///
    /// Everything written since `start` is the frame's tag followed by its
    /// payload; this appends the `:` separator and the payload length.
    pub fn close_frame(&mut self, start: usize) -> Result<()> {
        let payload_len = self.bytes.len() - start - 1;
        self.push(b':')?;
        self.push_decimal(payload_len as u64)
    }

    /// Reverses the buffer once, yielding the forward wire bytes.
    #[must_use]
    pub fn into_forward(mut self) -> Vec<u8> {
        self.bytes.reverse();
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_doubles() {
        let mut buf = ReverseBuffer::with_capacity(4).unwrap();
        assert!(buf.capacity() >= 4);
        buf.push_reversed(b"abcd").unwrap();
        let before = buf.capacity();
        buf.push(b'e').unwrap();
        assert!(buf.capacity() >= before * 2);
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn test_grows_from_zero_capacity() {
        let mut buf = ReverseBuffer::with_capacity(0).unwrap();
        assert!(buf.is_empty());
        buf.push_reversed(&[7u8; 100]).unwrap();
        assert_eq!(buf.len(), 100);
    }

    #[test]
    fn test_integer_digits_come_out_forward() {
        let mut buf = ReverseBuffer::default();
        buf.push_integer(-1203).unwrap();
        assert_eq!(buf.into_forward(), b"-1203".to_vec());

        let mut buf = ReverseBuffer::default();
        buf.push_integer(0).unwrap();
        assert_eq!(buf.into_forward(), b"0".to_vec());
    }

    #[test]
    fn test_integer_extremes() {
        let mut buf = ReverseBuffer::default();
        buf.push_integer(i64::MIN).unwrap();
        assert_eq!(buf.into_forward(), i64::MIN.to_string().into_bytes());

        let mut buf = ReverseBuffer::default();
        buf.push_integer(i64::MAX).unwrap();
        assert_eq!(buf.into_forward(), i64::MAX.to_string().into_bytes());
    }

    #[test]
    fn test_nested_frames() {
        // [1] written back to front
        let mut buf = ReverseBuffer::default();
        let outer = buf.len();
        buf.push(b']').unwrap();
        let inner = buf.len();
        buf.push(b'#').unwrap();
        buf.push_integer(1).unwrap();
        buf.close_frame(inner).unwrap();
        buf.close_frame(outer).unwrap();
        assert_eq!(buf.into_forward(), b"4:1:1#]".to_vec());
    }

    #[test]
    fn test_impossible_reservation_is_out_of_memory() {
        let err = ReverseBuffer::with_capacity(usize::MAX).unwrap_err();
        assert!(err.is_out_of_memory());
    }
}

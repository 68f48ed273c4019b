use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

use crate::cursor::{Cursor, CursorError, Result};
use crate::encoding::{Ascii, TextEncoding};

/// Reads values from a borrowed slice of bytes, at a byte and bit position that the caller can
/// move freely.
///
/// Fixed-size scalars are decoded from their little-endian byte representation, starting at the
/// current byte pointer. They may start at any offset; there are no alignment requirements.
/// Booleans are single bits, numbered from the least-significant bit of each byte.
///
/// Byte reads ignore the bit pointer. If a caller interleaves `read_bool` with byte reads, it
/// must realign the cursor itself (for example with `offset(1, true)` or `seek`). A byte read
/// that starts while the bit pointer is nonzero still leaves the bit pointer where it was.
///
/// Every `read_*` method first moves the cursor past the value, then checks that the new
/// position is within the buffer. When that check fails, the method returns
/// `Err(CursorError::OutOfRange)` and the cursor stays at the invalid position it tried to
/// reach. Nothing is read outside the buffer.
///
/// A `SpanReader` borrows its buffer for `'a`, and every slice it returns borrows from the same
/// buffer, not from the reader.
#[derive(Clone, Debug)]
pub struct SpanReader<'a> {
    data: &'a [u8],
    cursor: Cursor,
}

impl<'a> SpanReader<'a> {
    /// Constructor. The cursor starts at byte 0, bit 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            cursor: Cursor::new(),
        }
    }

    /// The whole underlying buffer, regardless of the cursor position.
    pub fn buffer(&self) -> &'a [u8] {
        self.data
    }

    /// The current position.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The current byte index.
    pub fn byte_pointer(&self) -> usize {
        self.cursor.byte_pointer()
    }

    /// The current bit index within the current byte, in `0..8`.
    pub fn bit_pointer(&self) -> u8 {
        self.cursor.bit_pointer()
    }

    /// The length of the buffer. This never changes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Moves to `byte_position`, bit 0. This never fails; an out-of-range position is reported
    /// by the next read.
    pub fn seek(&mut self, byte_position: usize) {
        self.cursor.seek(byte_position);
    }

    /// Moves to `byte_position` plus `bit_position` bits.
    pub fn seek_bits(&mut self, byte_position: usize, bit_position: usize) {
        self.cursor.seek_bits(byte_position, bit_position);
    }

    /// See [`Cursor::offset`].
    pub fn offset(&mut self, byte_delta: isize, reset_bit: bool) -> Result<()> {
        self.cursor.offset(byte_delta, reset_bit)
    }

    /// See [`Cursor::offset_bits`].
    pub fn offset_bits(&mut self, byte_delta: isize, bit_delta: isize) -> Result<()> {
        self.cursor.offset_bits(byte_delta, bit_delta)
    }

    /// Reads a slice of bytes whose length is `len`. This function returns a slice reference
    /// to the bytes; it does not copy them.
    #[inline(always)]
    pub fn read_span(&mut self, len: usize) -> Result<&'a [u8]> {
        let start = self.cursor.advance(len);
        self.cursor.validate(self.data.len())?;
        Ok(&self.data[start..self.cursor.byte_pointer()])
    }

    /// Reads `len` bytes and copies them into a new `Vec`.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        Ok(self.read_span(len)?.to_vec())
    }

    /// Reads `len` bytes and copies them into a new boxed slice.
    pub fn read_memory(&mut self, len: usize) -> Result<Box<[u8]>> {
        Ok(Box::from(self.read_span(len)?))
    }

    /// Reads a small array of bytes, with a constant length.
    #[inline(always)]
    pub fn read_cbytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.read_span(N)?);
        Ok(bytes)
    }

    /// Fills all of `target` with the next `target.len()` bytes.
    pub fn read_to(&mut self, target: &mut [u8]) -> Result<()> {
        target.copy_from_slice(self.read_span(target.len())?);
        Ok(())
    }

    /// Copies the next `len` bytes into the front of `target`.
    ///
    /// If `target` is shorter than `len`, this returns `Err(CursorError::OutOfRange)`. As with
    /// every other read, the cursor has already moved by `len` at that point.
    pub fn read_to_len(&mut self, target: &mut [u8], len: usize) -> Result<()> {
        let src = self.read_span(len)?;
        let dst = target.get_mut(..len).ok_or(CursorError::OutOfRange)?;
        dst.copy_from_slice(src);
        Ok(())
    }

    /// Reads a single `u8` value.
    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8> {
        let [b] = self.read_cbytes()?;
        Ok(b)
    }

    /// Reads a single `i8` value.
    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Reads a one-byte character. The byte value is the code point (Latin-1).
    #[inline(always)]
    pub fn read_char(&mut self) -> Result<char> {
        Ok(self.read_u8()? as char)
    }

    /// Reads a `u16` in little-endian byte order.
    #[inline(always)]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a `i16` in little-endian byte order.
    #[inline(always)]
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a `u32` in little-endian byte order.
    #[inline(always)]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a `i32` in little-endian byte order.
    #[inline(always)]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a `u64` in little-endian byte order.
    #[inline(always)]
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a `i64` in little-endian byte order.
    #[inline(always)]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a `u128` in little-endian byte order.
    #[inline(always)]
    pub fn read_u128(&mut self) -> Result<u128> {
        Ok(u128::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a `i128` in little-endian byte order.
    #[inline(always)]
    pub fn read_i128(&mut self) -> Result<i128> {
        Ok(i128::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a half-precision float from its 2-byte little-endian representation.
    #[cfg(feature = "half")]
    #[inline(always)]
    pub fn read_f16(&mut self) -> Result<half::f16> {
        Ok(half::f16::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads an `f32` from its 4-byte little-endian representation. The bits are preserved
    /// exactly, including NaN payloads.
    #[inline(always)]
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads an `f64` from its 8-byte little-endian representation.
    #[inline(always)]
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads the bit at the current bit pointer and advances by one bit.
    ///
    /// Bits are numbered from the least-significant bit. After bit 7, the cursor moves to bit 0
    /// of the next byte.
    pub fn read_bool(&mut self) -> Result<bool> {
        let (byte, bit) = self.cursor.advance_bit();
        self.cursor.validate(self.data.len())?;
        Ok((self.data[byte] >> bit) & 1 == 1)
    }

    /// Reads a fixed-width ASCII string field of `len` bytes. Trailing NUL characters are
    /// removed.
    pub fn read_string(&mut self, len: usize) -> Result<String> {
        self.read_string_with(len, Ascii)
    }

    /// Reads a fixed-width string field of `len` bytes, decoded with `encoding`. Trailing NUL
    /// characters are removed from the decoded text.
    pub fn read_string_with<E: TextEncoding>(&mut self, len: usize, encoding: E) -> Result<String> {
        let mut s = encoding.decode(self.read_span(len)?);
        let trimmed = s.trim_end_matches('\0').len();
        s.truncate(trimmed);
        Ok(s)
    }

    /// Reads a fixed-width string field of `len` bytes without decoding or copying it. Trailing
    /// NUL bytes are removed.
    ///
    /// The caller must handle validating the contents, if necessary.
    #[cfg(feature = "bstr")]
    pub fn read_bstr(&mut self, len: usize) -> Result<&'a bstr::BStr> {
        let bytes = self.read_span(len)?;
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        Ok(bstr::BStr::new(&bytes[..end]))
    }

    /// Reads a `T` in place, without copying.
    ///
    /// `T` must be `Unaligned`, so it can be viewed at any offset. Multi-byte fields inside `T`
    /// should use the `zerocopy::byteorder` types to pin their byte order.
    pub fn read_ref<T>(&mut self) -> Result<&'a T>
    where
        T: FromBytes + KnownLayout + Immutable + Unaligned,
    {
        let bytes = self.read_span(core::mem::size_of::<T>())?;
        T::ref_from_bytes(bytes).map_err(|_| CursorError::OutOfRange)
    }
}

impl<'a> From<&'a [u8]> for SpanReader<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for SpanReader<'a> {
    fn from(data: &'a [u8; N]) -> Self {
        Self::new(data)
    }
}

impl<'a> From<&'a Vec<u8>> for SpanReader<'a> {
    fn from(data: &'a Vec<u8>) -> Self {
        Self::new(data)
    }
}

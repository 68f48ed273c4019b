use alloc::boxed::Box;
use alloc::vec;

use zerocopy::{Immutable, IntoBytes};

use crate::cursor::{Cursor, CursorError, Result};
use crate::encoding::{Ascii, TextEncoding};

/// Writes values into a fixed-size buffer, at a byte and bit position that the caller can move
/// freely.
///
/// The encoding rules mirror [`SpanReader`](crate::SpanReader): little-endian scalars at any
/// offset, booleans as single bits numbered from the least-significant bit, and fixed-width
/// strings padded with NUL bytes.
///
/// The buffer never grows. Every `write_*` method first moves the cursor past the value, then
/// checks that the new position is within the buffer. When that check fails, the method returns
/// `Err(CursorError::OutOfRange)`, writes nothing, and leaves the cursor at the invalid position
/// it tried to reach.
///
/// The writer keeps a high-water mark so that it can report the logical length of the data it
/// has produced, even after seeking backward to patch an earlier field. See [`SpanWriter::len`].
///
/// `B` is the storage. Use `&mut [u8]` (or `&mut Vec<u8>`) to write into a buffer you own, or
/// [`SpanWriter::allocate`] to have the writer start from fresh storage, which you take back
/// with [`SpanWriter::into_inner`].
#[derive(Debug)]
pub struct SpanWriter<B> {
    out: B,
    cursor: Cursor,
    high_water: usize,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> SpanWriter<B> {
    /// Constructor. The cursor starts at byte 0, bit 0.
    pub fn new(out: B) -> Self {
        Self {
            out,
            cursor: Cursor::new(),
            high_water: 0,
        }
    }

    /// Extracts the inner buffer
    pub fn into_inner(self) -> B {
        self.out
    }

    /// Accesses the inner buffer
    pub fn get_ref(&self) -> &B {
        &self.out
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

    /// The size of the underlying buffer.
    pub fn capacity(&self) -> usize {
        self.out.as_ref().len()
    }

    /// The logical length of the written data: the larger of the furthest extent reached before
    /// any `seek`, and the current extent. A partially written byte counts as a whole byte.
    ///
    /// Seeking back to rewrite a header does not shrink this value. `offset` does not record the
    /// extent it leaves behind; use `seek` when moving backward over data that must stay counted.
    pub fn len(&self) -> usize {
        self.high_water.max(self.cursor.extent())
    }

    /// Returns `true` if `len()` is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records the current extent in the high-water mark, then moves to `byte_position`, bit 0.
    pub fn seek(&mut self, byte_position: usize) {
        self.high_water = self.len();
        self.cursor.seek(byte_position);
    }

    /// Records the current extent in the high-water mark, then moves to `byte_position` plus
    /// `bit_position` bits.
    pub fn seek_bits(&mut self, byte_position: usize, bit_position: usize) {
        self.high_water = self.len();
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

    /// The written data, `0..len()`.
    pub fn as_span(&self) -> Result<&[u8]> {
        self.as_span_from(0)
    }

    /// The written data from `start`, `start..len()`.
    ///
    /// Fails if `start > len()`, or if a failed write left `len()` past the end of the buffer.
    pub fn as_span_from(&self, start: usize) -> Result<&[u8]> {
        self.out
            .as_ref()
            .get(start..self.len())
            .ok_or(CursorError::OutOfRange)
    }

    /// `len` bytes of the buffer starting at `start`. This ignores the logical length and only
    /// requires the range to fit in the buffer.
    pub fn as_span_range(&self, start: usize, len: usize) -> Result<&[u8]> {
        let end = start.checked_add(len).ok_or(CursorError::OutOfRange)?;
        self.out
            .as_ref()
            .get(start..end)
            .ok_or(CursorError::OutOfRange)
    }

    /// Moves the cursor past `len` bytes and returns them for writing.
    #[inline(always)]
    fn reserve(&mut self, len: usize) -> Result<&mut [u8]> {
        let capacity = self.capacity();
        let start = self.cursor.advance(len);
        self.cursor.validate(capacity)?;
        let end = self.cursor.byte_pointer();
        Ok(&mut self.out.as_mut()[start..end])
    }

    /// Writes `bytes` to the output.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Writes `count` bytes of `bytes`, starting at index `start`.
    ///
    /// If the range does not fit in `bytes`, this returns `Err(CursorError::OutOfRange)` without
    /// moving the cursor.
    pub fn write_bytes_range(&mut self, bytes: &[u8], start: usize, count: usize) -> Result<()> {
        let src = start
            .checked_add(count)
            .and_then(|end| bytes.get(start..end))
            .ok_or(CursorError::OutOfRange)?;
        self.write_bytes(src)
    }

    /// Writes a small, fixed-size array of bytes.
    #[inline(always)]
    pub fn write_cbytes<const N: usize>(&mut self, value: [u8; N]) -> Result<()> {
        self.write_bytes(&value)
    }

    /// Writes a single `u8` value
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_cbytes([value])
    }

    /// Writes a single `i8` value
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_cbytes([value as u8])
    }

    /// Writes a one-byte character (Latin-1). Characters above U+00FF are written as `?`.
    pub fn write_char(&mut self, value: char) -> Result<()> {
        self.write_u8(u8::try_from(value).unwrap_or(b'?'))
    }

    /// Writes a single `u16` value
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_cbytes(value.to_le_bytes())
    }

    /// Writes a single `i16` value
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_cbytes(value.to_le_bytes())
    }

    /// Writes a single `u32` value
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_cbytes(value.to_le_bytes())
    }

    /// Writes a single `i32` value
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_cbytes(value.to_le_bytes())
    }

    /// Writes a single `u64` value
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.write_cbytes(value.to_le_bytes())
    }

    /// Writes a single `i64` value
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_cbytes(value.to_le_bytes())
    }

    /// Writes a single `u128` value
    pub fn write_u128(&mut self, value: u128) -> Result<()> {
        self.write_cbytes(value.to_le_bytes())
    }

    /// Writes a single `i128` value
    pub fn write_i128(&mut self, value: i128) -> Result<()> {
        self.write_cbytes(value.to_le_bytes())
    }

    /// Writes an `f16` value, using its 2-byte little-endian representation.
    #[cfg(feature = "half")]
    pub fn write_f16(&mut self, value: half::f16) -> Result<()> {
        self.write_cbytes(value.to_le_bytes())
    }

    /// Writes an `f32` value, using its 4-byte little-endian representation.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_cbytes(value.to_le_bytes())
    }

    /// Writes an `f64` value, using its 8-byte little-endian representation.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_cbytes(value.to_le_bytes())
    }

    /// Sets or clears the bit at the current bit pointer and advances by one bit. The other
    /// bits of the byte are left alone.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        let (byte, bit) = self.cursor.advance_bit();
        self.cursor.validate(self.capacity())?;
        let b = &mut self.out.as_mut()[byte];
        if value {
            *b |= 1 << bit;
        } else {
            *b &= !(1 << bit);
        }
        Ok(())
    }

    /// Writes `value` as ASCII, using exactly as many bytes as it has characters.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_str_with(value, Ascii)
    }

    /// Writes `value` encoded with `encoding`, using exactly `encoding.encoded_len(value)` bytes.
    pub fn write_str_with<E: TextEncoding>(&mut self, value: &str, encoding: E) -> Result<()> {
        let dst = self.reserve(encoding.encoded_len(value))?;
        encoding.encode(value, dst);
        Ok(())
    }

    /// Writes `value` as ASCII into a field of exactly `len` bytes.
    pub fn write_str_fixed(&mut self, value: &str, len: usize) -> Result<()> {
        self.write_str_fixed_with(value, len, Ascii)
    }

    /// Writes `value` encoded with `encoding` into a field of exactly `len` bytes.
    ///
    /// A value that does not fit is truncated. A shorter value is followed by NUL bytes up to
    /// `len`, which `SpanReader::read_string_with` strips again.
    pub fn write_str_fixed_with<E: TextEncoding>(
        &mut self,
        value: &str,
        len: usize,
        encoding: E,
    ) -> Result<()> {
        let dst = self.reserve(len)?;
        let n = encoding.encode(value, dst);
        if let Some(padding) = dst.get_mut(n..) {
            padding.fill(0);
        }
        Ok(())
    }

    /// Writes the in-memory bytes of `value`.
    ///
    /// Multi-byte fields inside `value` should use the `zerocopy::byteorder` types to pin their
    /// byte order.
    pub fn write_value<T: IntoBytes + Immutable + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.write_bytes(value.as_bytes())
    }
}

impl SpanWriter<Box<[u8]>> {
    /// Creates a writer over `len` freshly allocated, zeroed bytes.
    ///
    /// The writer owns the storage until [`SpanWriter::into_inner`] hands it back.
    pub fn allocate(len: usize) -> Self {
        Self::new(vec![0u8; len].into_boxed_slice())
    }
}

impl<'a> From<&'a mut [u8]> for SpanWriter<&'a mut [u8]> {
    fn from(out: &'a mut [u8]) -> Self {
        Self::new(out)
    }
}

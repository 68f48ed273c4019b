/// Result type for cursor operations.
pub type Result<T> = core::result::Result<T, CursorError>;

/// A position inside a buffer, addressed as a byte index plus a bit index within that byte.
///
/// The bit index is counted from the least-significant bit and is always normalized into
/// `0..8`. Any arithmetic that would push it outside that range carries into the byte index.
///
/// A `Cursor` knows nothing about the buffer it points into. Bounds are only checked when
/// [`Cursor::validate`] is called with the buffer's length; moving the cursor never fails
/// unless the new position would be before the start of the buffer.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Cursor {
    byte: usize,
    bit: u8,
}

impl Cursor {
    /// Creates a cursor at byte 0, bit 0.
    pub const fn new() -> Self {
        Self { byte: 0, bit: 0 }
    }

    /// The byte index.
    #[inline(always)]
    pub fn byte_pointer(&self) -> usize {
        self.byte
    }

    /// The bit index within the current byte, in `0..8`.
    #[inline(always)]
    pub fn bit_pointer(&self) -> u8 {
        self.bit
    }

    /// The number of bytes touched up to this position. A partially consumed byte counts as a
    /// whole byte.
    #[inline(always)]
    pub fn extent(&self) -> usize {
        self.byte.saturating_add((self.bit != 0) as usize)
    }

    /// Moves to `byte_position` and clears the bit index.
    pub fn seek(&mut self, byte_position: usize) {
        self.byte = byte_position;
        self.bit = 0;
    }

    /// Moves to `byte_position` plus `bit_position` bits. Whole bytes contained in
    /// `bit_position` carry into the byte index.
    pub fn seek_bits(&mut self, byte_position: usize, bit_position: usize) {
        self.byte = byte_position.saturating_add(bit_position >> 3);
        self.bit = (bit_position & 7) as u8;
    }

    /// Moves the byte index by `byte_delta`. If `reset_bit` is true, the bit index is cleared,
    /// otherwise it is left alone.
    ///
    /// Returns `Err(CursorError::OutOfRange)`, and leaves the cursor unchanged, if the result
    /// would be before byte 0.
    pub fn offset(&mut self, byte_delta: isize, reset_bit: bool) -> Result<()> {
        self.byte = self
            .byte
            .checked_add_signed(byte_delta)
            .ok_or(CursorError::OutOfRange)?;
        if reset_bit {
            self.bit = 0;
        }
        Ok(())
    }

    /// Moves the cursor by `byte_delta` bytes and `bit_delta` bits.
    ///
    /// The bit delta is added to the bit index first, then carried into the byte index using
    /// floor division, so a negative `bit_delta` borrows from the byte index and the bit index
    /// stays in `0..8`. For example, starting at byte 3, bit 1, `offset_bits(0, -2)` moves to
    /// byte 2, bit 7.
    ///
    /// Returns `Err(CursorError::OutOfRange)`, and leaves the cursor unchanged, if the result
    /// would be before byte 0.
    pub fn offset_bits(&mut self, byte_delta: isize, bit_delta: isize) -> Result<()> {
        let bits = (self.bit as isize)
            .checked_add(bit_delta)
            .ok_or(CursorError::OutOfRange)?;
        let carry = bits.div_euclid(8);
        let byte = byte_delta
            .checked_add(carry)
            .and_then(|delta| self.byte.checked_add_signed(delta))
            .ok_or(CursorError::OutOfRange)?;
        self.byte = byte;
        self.bit = bits.rem_euclid(8) as u8;
        Ok(())
    }

    /// Advances the byte index by `len` and returns the byte index before the move. The bit
    /// index is not touched.
    ///
    /// On overflow the byte index saturates, which guarantees that the next call to
    /// [`Cursor::validate`] fails.
    #[inline(always)]
    pub(crate) fn advance(&mut self, len: usize) -> usize {
        let start = self.byte;
        self.byte = self.byte.saturating_add(len);
        start
    }

    /// Advances by one bit and returns the position before the move.
    #[inline(always)]
    pub(crate) fn advance_bit(&mut self) -> (usize, u8) {
        let start = (self.byte, self.bit);
        let bits = self.bit + 1;
        self.byte = self.byte.saturating_add((bits >> 3) as usize);
        self.bit = bits & 7;
        start
    }

    /// Checks that this position lies within a buffer of `len` bytes. The end of the buffer
    /// (byte `len`, bit 0) is a valid position.
    #[inline(always)]
    pub fn validate(&self, len: usize) -> Result<()> {
        if self.byte > len || (self.byte == len && self.bit > 0) {
            Err(CursorError::OutOfRange)
        } else {
            Ok(())
        }
    }
}

/// Error type for `SpanReader` and `SpanWriter`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CursorError {
    /// The operation moved the cursor past the end of the buffer (or before its start), or it
    /// named a range that does not fit in the buffer.
    ///
    /// A `read_*` or `write_*` call that fails with this error has still moved the cursor to the
    /// position it attempted to reach. Callers that want to continue must `seek` back to a valid
    /// position. No bytes are read or written by the failing call.
    OutOfRange,
}

impl core::error::Error for CursorError {}

impl core::fmt::Display for CursorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfRange => f.write_str("memory out of range"),
        }
    }
}

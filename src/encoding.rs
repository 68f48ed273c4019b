//! Text encodings used by the string operations of `SpanReader` and `SpanWriter`.
//!
//! The cursors never look inside string bytes themselves. They hand the bytes of a field to a
//! [`TextEncoding`] and only deal with lengths and NUL padding.

use alloc::string::String;
use zerocopy::byteorder::{LE, U16};
use zerocopy::FromBytes;

/// Converts between `str` and an encoded byte representation.
///
/// Implementations must not fail. Characters that cannot be represented are replaced (usually
/// with `?` on encode and U+FFFD on decode).
pub trait TextEncoding {
    /// The number of bytes that `encode` would write for `s` given unlimited space.
    fn encoded_len(&self, s: &str) -> usize;

    /// Encodes as many whole characters of `s` as fit into `dst`, and returns the number of
    /// bytes written. Bytes in `dst` past the returned length are not modified.
    fn encode(&self, s: &str, dst: &mut [u8]) -> usize;

    /// Decodes all of `src`.
    fn decode(&self, src: &[u8]) -> String;
}

impl<E: TextEncoding + ?Sized> TextEncoding for &E {
    fn encoded_len(&self, s: &str) -> usize {
        (**self).encoded_len(s)
    }

    fn encode(&self, s: &str, dst: &mut [u8]) -> usize {
        (**self).encode(s, dst)
    }

    fn decode(&self, src: &[u8]) -> String {
        (**self).decode(src)
    }
}

/// 7-bit ASCII, one byte per character. This is the default encoding.
///
/// Characters above U+007F are written as `?`. Bytes above 0x7F are read as `?`.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Ascii;

impl TextEncoding for Ascii {
    fn encoded_len(&self, s: &str) -> usize {
        s.chars().count()
    }

    fn encode(&self, s: &str, dst: &mut [u8]) -> usize {
        single_byte_encode(s, dst, 0x7f)
    }

    fn decode(&self, src: &[u8]) -> String {
        src.iter()
            .map(|&b| if b.is_ascii() { b as char } else { '?' })
            .collect()
    }
}

/// ISO-8859-1, one byte per character. Each byte value is its own code point.
///
/// Characters above U+00FF are written as `?`.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Latin1;

impl TextEncoding for Latin1 {
    fn encoded_len(&self, s: &str) -> usize {
        s.chars().count()
    }

    fn encode(&self, s: &str, dst: &mut [u8]) -> usize {
        single_byte_encode(s, dst, 0xff)
    }

    fn decode(&self, src: &[u8]) -> String {
        src.iter().map(|&b| b as char).collect()
    }
}

fn single_byte_encode(s: &str, dst: &mut [u8], max: u32) -> usize {
    let mut n = 0;
    for (slot, c) in dst.iter_mut().zip(s.chars()) {
        *slot = if (c as u32) <= max { c as u8 } else { b'?' };
        n += 1;
    }
    n
}

/// UTF-8.
///
/// When the destination is too small, the output is cut at the last code point boundary that
/// fits. Invalid input is decoded with U+FFFD in place of the bad sequences.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Utf8;

impl TextEncoding for Utf8 {
    fn encoded_len(&self, s: &str) -> usize {
        s.len()
    }

    fn encode(&self, s: &str, dst: &mut [u8]) -> usize {
        let mut n = s.len().min(dst.len());
        while !s.is_char_boundary(n) {
            n -= 1;
        }
        dst[..n].copy_from_slice(&s.as_bytes()[..n]);
        n
    }

    fn decode(&self, src: &[u8]) -> String {
        String::from_utf8_lossy(src).into_owned()
    }
}

/// UTF-16, little-endian code units.
///
/// Surrogate pairs are never split when truncating. On decode, a trailing odd byte is ignored
/// and unpaired surrogates become U+FFFD.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Utf16Le;

impl TextEncoding for Utf16Le {
    fn encoded_len(&self, s: &str) -> usize {
        s.encode_utf16().count() * 2
    }

    fn encode(&self, s: &str, dst: &mut [u8]) -> usize {
        let mut n = 0;
        let mut units = [0u16; 2];
        for c in s.chars() {
            let encoded = c.encode_utf16(&mut units);
            let Some(slot) = dst.get_mut(n..n + encoded.len() * 2) else {
                break;
            };
            for (pair, unit) in slot.chunks_exact_mut(2).zip(encoded.iter()) {
                pair.copy_from_slice(&unit.to_le_bytes());
            }
            n += encoded.len() * 2;
        }
        n
    }

    fn decode(&self, src: &[u8]) -> String {
        let even = &src[..src.len() & !1];
        let Ok(wchars) = <[U16<LE>]>::ref_from_bytes(even) else {
            return String::new();
        };
        char::decode_utf16(wchars.iter().map(|c| c.get()))
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}

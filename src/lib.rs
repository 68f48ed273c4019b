//! Cursors that read and write fixed-width values, strings, byte ranges and single bits in a
//! caller-supplied buffer.
//!
//! [`SpanReader`] decodes from a `&[u8]`. [`SpanWriter`] encodes into a fixed-size mutable
//! buffer and never grows it. Both track a byte pointer and a bit pointer that the caller can
//! `seek` or `offset` at any time, which makes it easy to skip fields, pack flags into bits, or
//! come back later to fill in a length prefix.
//!
//! # Encoding rules
//! * Scalars (`u8` through `u128`, `i8` through `i128`, `f16`, `f32`, `f64`) use their
//!   little-endian byte representation and need no alignment.
//! * Booleans are one bit each, least-significant bit first, packed across byte boundaries.
//! * Strings are fixed-width fields, padded with NUL bytes on write and trimmed of trailing NUL
//!   characters on read. The text encoding is pluggable, see [`encoding`].
//!
//! # Bounds
//! Every read or write first advances the cursor and then checks it against the buffer length.
//! Moving the cursor past the end is allowed; the next access fails with
//! [`CursorError::OutOfRange`] and the cursor keeps the position it tried to reach.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

extern crate alloc;

mod cursor;
pub mod encoding;
mod reader;
mod writer;


pub use cursor::{Cursor, CursorError, Result};
pub use encoding::TextEncoding;
pub use reader::SpanReader;
pub use writer::SpanWriter;

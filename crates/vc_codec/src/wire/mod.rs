//! Fixed, self-delimiting encodings for scalars, text and proxy identities.
//!
//! ## Layout
//!
//! - Integers and floats: fixed width, little-endian.
//! - `bool`: one byte, `0` or `1`.
//! - `char`: four bytes holding the Unicode scalar value.
//! - Text: a presence byte (`0` absent, `1` present), then an `i32` count of
//!   UTF-16 code units, then the code units. Empty text is present with a
//!   zero count and is distinct from absent text.
//! - Lengths: `i32`. Negative values are corrupt.
//! - [`ProxyId`](crate::ProxyId): eight bytes.
//!
//! Writing is synchronous into a call-local buffer ([`WireWriter`]).
//! Reading is asynchronous over any [`AsyncRead`](futures_lite::io::AsyncRead)
//! source ([`WireReader`]).

// -----------------------------------------------------------------------------
// Modules

mod reader;
mod writer;

pub mod tag;

// -----------------------------------------------------------------------------
// Exports

pub use reader::WireReader;
pub use writer::WireWriter;

// -----------------------------------------------------------------------------
// Shared constants

/// Presence byte of absent text or an absent nested value.
pub const ABSENT: u8 = 0;

/// Presence byte of present text or a present nested value.
pub const PRESENT: u8 = 1;

/// Upper bound on capacity reserved from a length prefix before the
/// elements are actually read.
pub(crate) const PREALLOC_LIMIT: usize = 1024;

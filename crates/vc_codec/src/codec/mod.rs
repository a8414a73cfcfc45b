//! Strategy-driven encoding and decoding.
//!
//! ## Encoding
//!
//! [`EncodeDriver`] walks a value synchronously into a [`WireWriter`]. It asks
//! the [`StrategyDispatcher`] for the strategy of each declared type it meets
//! and recurses into container elements and nested fields. Nothing reaches a
//! byte sink until the whole value encoded.
//!
//! ## Decoding
//!
//! [`DecodeDriver`] reads from an [`AsyncRead`] source through a
//! [`WireReader`]. Recursion goes through boxed futures, so arbitrarily
//! nested values decode with a bounded stack. The cancellation signal is
//! checked before each container element and before each field of a bag.
//!
//! ## Wire shape per strategy
//!
//! | strategy | bytes |
//! |---|---|
//! | scalar | the scalar, untagged |
//! | self-describing | `[count:i32]` then `count` × `[name:text][tag:u8][payload]` |
//! | container | `[count:i32]` then `count` × element |
//! | proxy reference | `[id:u64]` |
//!
//! A nested field payload is a presence byte followed, if present, by the
//! nested value in the strategy of its declared type.
//!
//! [`WireWriter`]: crate::wire::WireWriter
//! [`WireReader`]: crate::wire::WireReader
//! [`StrategyDispatcher`]: crate::strategy::StrategyDispatcher
//! [`AsyncRead`]: futures_lite::io::AsyncRead

// -----------------------------------------------------------------------------
// Modules

mod de;
mod ser;

#[cfg(test)]
pub(crate) mod fixtures;

// -----------------------------------------------------------------------------
// Exports

pub use de::{BoxedDecode, DecodeDriver};
pub use ser::EncodeDriver;

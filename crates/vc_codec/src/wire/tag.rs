//! Value tags written before every field of a field bag.

pub const BOOL: u8 = 0x01;
pub const I8: u8 = 0x02;
pub const I16: u8 = 0x03;
pub const I32: u8 = 0x04;
pub const I64: u8 = 0x05;
pub const U8: u8 = 0x06;
pub const U16: u8 = 0x07;
pub const U32: u8 = 0x08;
pub const U64: u8 = 0x09;
pub const F32: u8 = 0x0A;
pub const F64: u8 = 0x0B;
pub const CHAR: u8 = 0x0C;
/// Nullable text. `String` and `Option<String>` share this tag.
pub const TEXT: u8 = 0x0D;
/// A nested value encoded with its own strategy, behind a presence byte.
pub const NESTED: u8 = 0x20;

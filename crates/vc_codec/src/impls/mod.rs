//! Built-in registrations.
//!
//! ## Implemented Menu
//!
//! - scalars: `bool`, `char`, `i8`-`i64`, `u8`-`u64`, `f32`, `f64`,
//!   `String`, `Option<String>`
//! - containers: `Vec<T>`, `VecDeque<T>`
//! - proxy references: `Arc<T>` where `T: ProxyReference`

// -----------------------------------------------------------------------------
// Modules

mod collections;
mod native;
mod sync;

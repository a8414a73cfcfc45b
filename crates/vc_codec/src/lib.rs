#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// The derive macro emits `::vc_codec::...` paths, which must also resolve
// inside this crate's own tests.
extern crate self as vc_codec;

// -----------------------------------------------------------------------------
// no_std support

// Async byte sinks/sources are `futures_lite::io` traits, which require `std`.
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod cancel;
mod config;
mod error;
mod impls;
mod serializer;
mod utils;

pub mod codec;
pub mod object;
pub mod proxy;
pub mod registry;
pub mod strategy;
pub mod wire;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use cancel::CancelSignal;
pub use config::CodecConfig;
pub use error::{CodecError, ProxyError, StateError};
pub use object::{FieldBag, SelfDescribing};
pub use proxy::{ProxyId, ProxyReference, ResolveProxyIds};
pub use registry::DeclaredType;
pub use serializer::Serializer;
pub use vc_codec_derive as derive;

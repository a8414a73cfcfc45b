//! Type strategy dispatch.
//!
//! Every declared type maps to exactly one [`EncodingStrategy`], computed
//! once by the [`StrategyDispatcher`] and cached for its lifetime.

// -----------------------------------------------------------------------------
// Modules

mod dispatcher;
mod encoding;

// -----------------------------------------------------------------------------
// Exports

pub use dispatcher::StrategyDispatcher;
pub use encoding::{EncodingStrategy, StrategyKind};

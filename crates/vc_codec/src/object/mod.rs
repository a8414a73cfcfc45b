//! The self-describing object contract.
//!
//! A type implementing [`SelfDescribing`] exports its state as a
//! [`FieldBag`] and is rebuilt from one, bypassing its normal
//! initialization.

// -----------------------------------------------------------------------------
// Modules

mod field_bag;
mod self_describing;

// -----------------------------------------------------------------------------
// Exports

pub use field_bag::{FieldBag, FieldScalar, FieldValue, NestedValue};
pub use self_describing::SelfDescribing;

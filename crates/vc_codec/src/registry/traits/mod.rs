// -----------------------------------------------------------------------------
// Modules

mod container;
mod proxy;
mod scalar;
mod self_describing;

// -----------------------------------------------------------------------------
// Exports

pub use container::{Container, TypeTraitContainer};
pub use proxy::TypeTraitProxy;
pub use scalar::{ScalarKind, TypeTraitScalar};
pub use self_describing::TypeTraitSelfDescribing;

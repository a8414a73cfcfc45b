// -----------------------------------------------------------------------------
// Modules

mod container;
mod driver;
mod object;
mod proxy;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use driver::EncodeDriver;

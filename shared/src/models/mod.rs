//! Domain models for the Taxi Service

mod car;
mod driver;
mod manufacturer;

pub use car::*;
pub use driver::*;
pub use manufacturer::*;

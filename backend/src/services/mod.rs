//! Business logic services for the Taxi Service

pub mod auth;
pub mod car;
pub mod driver;
pub mod manufacturer;

pub use auth::AuthService;
pub use car::CarService;
pub use driver::DriverService;
pub use manufacturer::ManufacturerService;

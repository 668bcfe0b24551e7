//! Dormitory workflow engine: shared-facility bookings, room holds and leases, invoicing,
//! payments and maintenance tickets over an in-memory directory.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use error::AppError;
pub use workflows::dorm;

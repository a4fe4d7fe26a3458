//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the HTTP layer.

pub mod measurement;
pub mod stats;
pub mod user;

pub use measurement::MeasurementService;
pub use stats::StatsService;
pub use user::UserService;

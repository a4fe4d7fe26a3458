//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod measurement;
pub mod user;

pub use measurement::{BmiSample, CreateMeasurement, MeasurementRecord, MeasurementRepository};
pub use user::{UserRecord, UserRepository};

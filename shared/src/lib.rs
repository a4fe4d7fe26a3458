//! BMI Tracker Shared Library
//!
//! Types, models, and calculations shared by the backend and its clients.
//! Everything here is pure: no I/O, no global state.

pub mod errors;
pub mod health_metrics;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use health_metrics::*;
pub use models::{Measurement, Role};
pub use types::*;
pub use validation::{parse_measurement, MeasurementInput, MAX_MEASUREMENT_VALUE};

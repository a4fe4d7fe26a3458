//! Error types shared between the API and its clients

use thiserror::Error;

/// Rejection reasons for a submitted weight/height pair
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeasurementInputError {
    #[error("Weight and height are required")]
    Missing,

    #[error("Weight and height must be numbers")]
    NotNumeric,

    #[error("Weight and height must be positive numbers")]
    OutOfRange,

    #[error("Weight and height are outside the supported range")]
    Unsupported,
}

/// Authentication error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing authorization header")]
    MissingToken,

    #[error("Invalid authorization format")]
    InvalidScheme,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Administrator role required")]
    AdminRequired,
}

//! Input validation functions
//!
//! Weight and height come from untrusted clients as JSON numbers or numeric
//! strings. They are parsed explicitly here instead of being coerced later.

use serde_json::Value;

use crate::errors::MeasurementInputError;

/// Largest weight (kg) or height (cm) accepted from a client
pub const MAX_MEASUREMENT_VALUE: f64 = 1_000_000.0;

/// A validated weight/height pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementInput {
    pub weight_kg: f64,
    pub height_cm: f64,
}

/// Values a client can send that count as "not provided"
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Parse a single numeric field
fn parse_number(value: &Value) -> Result<f64, MeasurementInputError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or(MeasurementInputError::NotNumeric)?;

    if parsed.is_nan() {
        return Err(MeasurementInputError::NotNumeric);
    }
    if parsed.is_infinite() || parsed <= 0.0 {
        return Err(MeasurementInputError::OutOfRange);
    }
    if parsed > MAX_MEASUREMENT_VALUE {
        return Err(MeasurementInputError::Unsupported);
    }
    Ok(parsed)
}

/// Validate a weight (kg) and height (cm) submission
///
/// Presence is checked for both fields before either is parsed, so a missing
/// height is reported as missing even when the weight is malformed.
pub fn parse_measurement(
    weight: Option<&Value>,
    height: Option<&Value>,
) -> Result<MeasurementInput, MeasurementInputError> {
    let (weight, height) = match (weight, height) {
        (Some(w), Some(h)) if !is_blank(w) && !is_blank(h) => (w, h),
        _ => return Err(MeasurementInputError::Missing),
    };

    Ok(MeasurementInput {
        weight_kg: parse_number(weight)?,
        height_cm: parse_number(height)?,
    })
}

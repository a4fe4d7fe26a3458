//! BMI record service
//!
//! Turns a validated weight/height pair into a stored record and reads a
//! user's history back. BMI and category are always computed here, never
//! taken from the client.

use crate::error::ApiError;
use crate::repositories::{CreateMeasurement, MeasurementRecord, MeasurementRepository};
use bmi_tracker_shared::{BmiCategory, BmiReading, Measurement, MeasurementInput, MeasurementInputError};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// BMI record service
pub struct MeasurementService;

impl MeasurementService {
    /// Compute and persist a record for `user_id`
    pub async fn record(
        pool: &PgPool,
        user_id: Uuid,
        input: MeasurementInput,
    ) -> Result<Measurement, ApiError> {
        let reading = BmiReading::assess(input.weight_kg, input.height_cm);

        let create = CreateMeasurement {
            user_id,
            weight: to_nonzero_decimal(input.weight_kg)?,
            height: to_nonzero_decimal(input.height_cm)?,
            bmi: to_decimal(reading.bmi)?,
            category: reading.category.as_str().to_string(),
        };

        let record = MeasurementRepository::create(pool, create)
            .await
            .map_err(|e| {
                // The token outlived its account
                if is_foreign_key_violation(&e) {
                    ApiError::Unauthorized("User not found".to_string())
                } else {
                    ApiError::Internal(e)
                }
            })?;

        info!(
            user_id = %user_id,
            record_id = %record.id,
            bmi = reading.bmi,
            category = %reading.category,
            "BMI recorded"
        );

        to_measurement(record).map_err(ApiError::Internal)
    }

    /// Every record owned by `user_id`, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Measurement>, ApiError> {
        let records = MeasurementRepository::list_by_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        records
            .into_iter()
            .map(to_measurement)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(ApiError::Internal)
    }
}

/// Values too large for a `Decimal` are rejected as unsupported input
fn to_decimal(value: f64) -> Result<Decimal, ApiError> {
    Decimal::from_f64(value).ok_or_else(|| MeasurementInputError::Unsupported.into())
}

/// Weight and height must stay positive once stored; values below the
/// `Decimal` resolution would otherwise collapse to zero
fn to_nonzero_decimal(value: f64) -> Result<Decimal, ApiError> {
    let decimal = to_decimal(value)?;
    if decimal.is_zero() {
        return Err(MeasurementInputError::Unsupported.into());
    }
    Ok(decimal)
}

fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_foreign_key_violation())
        .unwrap_or(false)
}

pub(crate) fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn to_measurement(record: MeasurementRecord) -> anyhow::Result<Measurement> {
    let category: BmiCategory = record
        .category
        .parse()
        .map_err(|e: String| anyhow::anyhow!("Record {}: {}", record.id, e))?;

    Ok(Measurement {
        id: record.id,
        user_id: record.user_id,
        weight: decimal_to_f64(record.weight),
        height: decimal_to_f64(record.height),
        bmi: decimal_to_f64(record.bmi),
        category,
        created_at: record.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_to_decimal_keeps_short_form() {
        assert_eq!(to_decimal(75.3).unwrap(), dec("75.3"));
        assert_eq!(to_decimal(23.15).unwrap(), dec("23.15"));
    }

    #[test]
    fn test_to_decimal_rejects_huge_values() {
        assert!(matches!(to_decimal(1e300), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_tiny_measurements_are_rejected() {
        match to_nonzero_decimal(1e-30) {
            Err(ApiError::Validation(msg)) => {
                assert_eq!(msg, "Weight and height are outside the supported range")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(to_nonzero_decimal(0.5).unwrap(), dec("0.5"));
    }

    #[test]
    fn test_zero_bmi_is_still_storable() {
        assert_eq!(to_decimal(0.0).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_non_database_error_is_not_a_missing_owner() {
        assert!(!is_foreign_key_violation(&anyhow::anyhow!("boom")));
        assert!(!is_foreign_key_violation(&anyhow::Error::new(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_record_maps_to_measurement() {
        let record = MeasurementRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            weight: dec("75"),
            height: dec("180"),
            bmi: dec("23.15"),
            category: "Normal".to_string(),
            created_at: Utc::now(),
        };

        let m = to_measurement(record).unwrap();
        assert_eq!(m.bmi, 23.15);
        assert_eq!(m.weight, 75.0);
        assert_eq!(m.category, BmiCategory::Normal);
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let record = MeasurementRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            weight: dec("75"),
            height: dec("180"),
            bmi: dec("23.15"),
            category: "Healthy".to_string(),
            created_at: Utc::now(),
        };
        assert!(to_measurement(record).is_err());
    }
}

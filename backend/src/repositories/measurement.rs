//! BMI record repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// BMI record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MeasurementRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weight: Decimal,
    pub height: Decimal,
    pub bmi: Decimal,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Just the columns the admin aggregate needs
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BmiSample {
    pub bmi: Decimal,
    pub category: String,
}

/// Input for creating a BMI record
#[derive(Debug, Clone)]
pub struct CreateMeasurement {
    pub user_id: Uuid,
    pub weight: Decimal,
    pub height: Decimal,
    pub bmi: Decimal,
    pub category: String,
}

/// BMI record repository
pub struct MeasurementRepository;

impl MeasurementRepository {
    /// Insert a new record; `created_at` is assigned by the database
    pub async fn create(pool: &PgPool, input: CreateMeasurement) -> Result<MeasurementRecord> {
        let record = sqlx::query_as::<_, MeasurementRecord>(
            r#"
            INSERT INTO bmi_records (user_id, weight, height, bmi, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, weight, height, bmi, category, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.weight)
        .bind(input.height)
        .bind(input.bmi)
        .bind(&input.category)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// All records owned by a user, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<MeasurementRecord>> {
        let records = sqlx::query_as::<_, MeasurementRecord>(
            r#"
            SELECT id, user_id, weight, height, bmi, category, created_at
            FROM bmi_records
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// `bmi` and `category` of every record in the system
    pub async fn list_samples(pool: &PgPool) -> Result<Vec<BmiSample>> {
        let samples = sqlx::query_as::<_, BmiSample>(
            r#"
            SELECT bmi, category
            FROM bmi_records
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(samples)
    }
}

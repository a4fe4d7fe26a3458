//! System-wide statistics for administrators
//!
//! `compute` takes an `AdminUser`, so it cannot be reached without a
//! verified administrator role.

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::repositories::{MeasurementRepository, UserRepository};
use crate::services::measurement::decimal_to_f64;
use bmi_tracker_shared::{round_to_hundredths, BmiCategory, Role, StatsResponse};
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use std::collections::BTreeMap;
use tracing::info;

/// Admin statistics service
pub struct StatsService;

impl StatsService {
    /// Aggregate every BMI record in the system
    ///
    /// Record count, average and distribution all come from the same fetch,
    /// so the distribution always sums to `totalRecords`.
    pub async fn compute(pool: &PgPool, admin: &AdminUser) -> Result<StatsResponse, ApiError> {
        let total_users = UserRepository::count_by_role(pool, Role::User)
            .await
            .map_err(ApiError::Internal)?;

        let samples = MeasurementRepository::list_samples(pool)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(|s| {
                s.category
                    .parse::<BmiCategory>()
                    .map(|category| (s.bmi, category))
                    .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let stats = summarize(total_users, &samples);
        info!(
            admin_id = %admin.user_id(),
            total_records = stats.total_records,
            "Admin statistics computed"
        );

        Ok(stats)
    }
}

/// Fold stored `(bmi, category)` pairs into the admin summary
///
/// The average is taken over the already-rounded stored values and then
/// rounded to two decimals; with no records it is `0`. Categories with no
/// records are left out of the distribution.
pub fn summarize(total_users: i64, samples: &[(Decimal, BmiCategory)]) -> StatsResponse {
    let mut distribution = BTreeMap::new();
    for (_, category) in samples {
        *distribution.entry(*category).or_insert(0i64) += 1;
    }

    StatsResponse {
        total_users,
        total_records: samples.len() as i64,
        average_bmi: average_bmi(samples),
        category_distribution: distribution,
    }
}

fn average_bmi(samples: &[(Decimal, BmiCategory)]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let exact = samples
        .iter()
        .try_fold(Decimal::ZERO, |sum, (bmi, _)| sum.checked_add(*bmi))
        .and_then(|sum| sum.checked_div(Decimal::from(samples.len())));

    match exact {
        Some(mean) => decimal_to_f64(
            mean.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        ),
        // Sum does not fit in a Decimal
        None => {
            let sum: f64 = samples.iter().map(|(bmi, _)| decimal_to_f64(*bmi)).sum();
            round_to_hundredths(sum / samples.len() as f64)
        }
    }
}

//! BMI record routes
//!
//! Both endpoints act only on the caller's own records; the owner always
//! comes from the verified token, never from the request body.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::MeasurementService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bmi_tracker_shared::{parse_measurement, MeasurementResponse, RecordBmiRequest};
use tracing::warn;

/// Create BMI routes
pub fn bmi_routes() -> Router<AppState> {
    Router::new().route("/", get(list_records).post(record_bmi))
}

/// Record a new BMI reading
///
/// POST /api/bmi
async fn record_bmi(
    State(state): State<AppState>,
    auth_user: AuthUser,
    req: Result<Json<RecordBmiRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MeasurementResponse>)> {
    let Json(req) = req?;
    let input = parse_measurement(req.weight.as_ref(), req.height.as_ref()).map_err(|e| {
        warn!(user_id = %auth_user.user_id, error = %e, "Rejected BMI input");
        e
    })?;

    let measurement = MeasurementService::record(&state.db, auth_user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(measurement.into())))
}

/// The caller's BMI history, newest first
///
/// GET /api/bmi
async fn list_records(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<Vec<MeasurementResponse>>> {
    let measurements = MeasurementService::list_for_user(&state.db, auth_user.user_id).await?;
    Ok(Json(measurements.into_iter().map(Into::into).collect()))
}

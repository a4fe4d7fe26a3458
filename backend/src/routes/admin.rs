//! Administrator routes

use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::services::StatsService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use bmi_tracker_shared::StatsResponse;

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

/// System-wide BMI statistics
///
/// GET /api/admin/stats
async fn get_stats(
    State(state): State<AppState>,
    admin: AdminUser,
) -> ApiResult<Json<StatsResponse>> {
    let stats = StatsService::compute(&state.db, &admin).await?;
    Ok(Json(stats))
}

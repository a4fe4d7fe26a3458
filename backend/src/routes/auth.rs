//! Authentication routes
//!
//! Registration, login, token refresh and the current user's profile.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bmi_tracker_shared::{AuthSession, LoginRequest, RegisterRequest, UserProfile};
use serde::Deserialize;

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/me", get(get_profile))
}

/// Register a new user
///
/// POST /api/auth/register
async fn register(
    State(state): State<AppState>,
    req: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthSession>)> {
    let Json(req) = req?;
    let session = UserService::register(&state.db, state.jwt(), req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Login with email and password
///
/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    req: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthSession>> {
    let Json(req) = req?;
    let session = UserService::login(&state.db, state.jwt(), req).await?;
    Ok(Json(session))
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Exchange a refresh token for a new session
///
/// POST /api/auth/refresh
async fn refresh_token(
    State(state): State<AppState>,
    req: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> ApiResult<Json<AuthSession>> {
    let Json(req) = req?;
    let session = UserService::refresh_token(&state.db, state.jwt(), &req.refresh_token).await?;
    Ok(Json(session))
}

/// Current user's profile
///
/// GET /api/auth/me
async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::get_profile(&state.db, auth_user.user_id).await?;
    Ok(Json(profile))
}

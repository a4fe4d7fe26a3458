//! Request extractors for authenticated callers
//!
//! `AuthUser` proves a valid access token was presented. `AdminUser` further
//! proves the token was issued to an administrator; handlers that take one
//! cannot run for anybody else.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use bmi_tracker_shared::{AuthError, Role};
use tracing::{debug, warn};
use uuid::Uuid;

/// Authenticated user extracted from JWT
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

/// Authenticated caller holding the `ADMIN` role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl AdminUser {
    #[inline]
    pub fn user_id(&self) -> Uuid {
        self.0.user_id
    }
}

impl TryFrom<AuthUser> for AdminUser {
    type Error = AuthError;

    fn try_from(user: AuthUser) -> Result<Self, Self::Error> {
        if user.role.is_admin() {
            Ok(AdminUser(user))
        } else {
            Err(AuthError::AdminRequired)
        }
    }
}

/// Pull the bearer token out of the `Authorization` header
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidScheme)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = bearer_token(parts)?;

        let claims = app_state.jwt().validate_access_token(token).map_err(|e| {
            debug!(error = %e, "Rejected access token");
            AuthError::InvalidToken
        })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthUser {
            user_id,
            role: claims.role,
        })
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let user_id = user.user_id;

        AdminUser::try_from(user).map_err(|e| {
            warn!(user_id = %user_id, "Non-admin caller denied admin route");
            ApiError::from(e)
        })
    }
}

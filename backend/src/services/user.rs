//! User service for authentication and account management
//!
//! Password hashing and verification run on the blocking thread pool; the
//! JWT service is passed by reference with its keys already derived.

use crate::auth::{JwtService, PasswordService};
use crate::config::AdminSeedConfig;
use crate::error::ApiError;
use crate::repositories::{UserRecord, UserRepository};
use bmi_tracker_shared::{AuthError, AuthSession, LoginRequest, RegisterRequest, Role, UserProfile};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new account with the `USER` role
    pub async fn register(
        pool: &PgPool,
        jwt_service: &JwtService,
        request: RegisterRequest,
    ) -> Result<AuthSession, ApiError> {
        let request = RegisterRequest {
            name: request.name.trim().to_string(),
            email: normalize_email(&request.email),
            password: request.password,
        };
        request.validate()?;

        if UserRepository::email_exists(pool, &request.email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(request.password)
            .await
            .map_err(ApiError::Internal)?;

        let user = UserRepository::create(
            pool,
            &request.email,
            &request.name,
            &password_hash,
            Role::User,
        )
        .await
        .map_err(|e| {
            // Lost a race with a concurrent registration for the same email
            if is_unique_violation(&e) {
                ApiError::Conflict("Email already registered".to_string())
            } else {
                ApiError::Internal(e)
            }
        })?;

        info!(user_id = %user.id, "User registered");
        Self::issue_session(jwt_service, user)
    }

    /// Login with email and password
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        request: LoginRequest,
    ) -> Result<AuthSession, ApiError> {
        let email = normalize_email(&request.email);

        let user = UserRepository::find_by_email(pool, &email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = PasswordService::verify_async(request.password, user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        Self::issue_session(jwt_service, user)
    }

    /// Exchange a refresh token for a new session
    ///
    /// The role is read again from the database, so a demotion or promotion
    /// takes effect at the next refresh.
    pub async fn refresh_token(
        pool: &PgPool,
        jwt_service: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthSession, ApiError> {
        let claims = jwt_service
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        Self::issue_session(jwt_service, user)
    }

    /// Get user profile
    pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        to_profile(user).map_err(ApiError::Internal)
    }

    /// Create the configured administrator account if it does not exist
    ///
    /// An existing account with the seed email is returned unchanged.
    pub async fn ensure_admin(pool: &PgPool, seed: &AdminSeedConfig) -> anyhow::Result<UserProfile> {
        let email = normalize_email(&seed.email);

        if let Some(existing) = UserRepository::find_by_email(pool, &email).await? {
            info!(user_id = %existing.id, "Administrator seed already present");
            return to_profile(existing);
        }

        let password_hash = PasswordService::hash_async(seed.password.clone()).await?;
        let user = match UserRepository::insert_if_absent(
            pool,
            &email,
            &seed.name,
            &password_hash,
            Role::Admin,
        )
        .await?
        {
            Some(user) => user,
            // Created concurrently by another instance
            None => UserRepository::find_by_email(pool, &email)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Administrator {} vanished during seeding", email))?,
        };

        info!(user_id = %user.id, email = %user.email, "Administrator account seeded");
        to_profile(user)
    }

    fn issue_session(jwt_service: &JwtService, user: UserRecord) -> Result<AuthSession, ApiError> {
        let role = user.role().map_err(ApiError::Internal)?;

        let access_token = jwt_service
            .generate_access_token(user.id, role)
            .map_err(ApiError::Internal)?;
        let refresh_token = jwt_service
            .generate_refresh_token(user.id, role)
            .map_err(ApiError::Internal)?;

        Ok(AuthSession {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_service.access_token_expiry_secs(),
            user: to_profile(user).map_err(ApiError::Internal)?,
        })
    }
}

fn to_profile(user: UserRecord) -> anyhow::Result<UserProfile> {
    let role = user.role()?;
    Ok(UserProfile {
        id: user.id.to_string(),
        email: user.email,
        name: user.name,
        role,
        created_at: user.created_at,
    })
}

/// Emails are matched case-insensitively by storing them lowercased
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

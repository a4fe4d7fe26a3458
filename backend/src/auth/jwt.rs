//! JWT token generation and validation
//!
//! Tokens carry the user's role so the boundary can authorize a request
//! without another database round trip.

use anyhow::Result;
use bmi_tracker_shared::Role;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role at the time the token was issued
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Token type: "access" or "refresh"
    pub token_type: String,
}

/// Pre-computed JWT keys, shared behind `Arc`
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// JWT service for token operations
///
/// Built once at startup and stored in `AppState`.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_token_expiry_secs: i64,
    refresh_token_expiry_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_expiry_secs: i64, refresh_token_expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            access_token_expiry_secs,
            refresh_token_expiry_secs,
        }
    }

    /// Generate an access token for a user
    #[inline]
    pub fn generate_access_token(&self, user_id: Uuid, role: Role) -> Result<String> {
        self.generate_token(user_id, role, ACCESS, self.access_token_expiry_secs)
    }

    /// Generate a refresh token for a user
    #[inline]
    pub fn generate_refresh_token(&self, user_id: Uuid, role: Role) -> Result<String> {
        self.generate_token(user_id, role, REFRESH, self.refresh_token_expiry_secs)
    }

    fn generate_token(
        &self,
        user_id: Uuid,
        role: Role,
        token_type: &str,
        expiry_secs: i64,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(expiry_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: token_type.to_string(),
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate {} token: {}", token_type, e))
    }

    /// Validate a token and return claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }

    /// Validate an access token specifically
    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        let claims = self.validate_token(token)?;
        if claims.token_type != ACCESS {
            anyhow::bail!("Not an access token");
        }
        Ok(claims)
    }

    /// Validate a refresh token specifically
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims> {
        let claims = self.validate_token(token)?;
        if claims.token_type != REFRESH {
            anyhow::bail!("Not a refresh token");
        }
        Ok(claims)
    }

    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_secs
    }
}

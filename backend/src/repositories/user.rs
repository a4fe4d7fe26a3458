//! User repository for database operations

use anyhow::Result;
use bmi_tracker_shared::Role;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Parsed role; the column CHECK constraint keeps this total
    pub fn role(&self) -> Result<Role> {
        self.role
            .parse()
            .map_err(|e: String| anyhow::anyhow!("User {} has {}", self.id, e))
    }
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(
        pool: &PgPool,
        email: &str,
        name: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Insert an account unless `email` is already taken
    ///
    /// Returns `None` when a row for `email` already exists; that row is left
    /// as it is.
    pub async fn insert_if_absent(
        pool: &PgPool,
        email: &str,
        name: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, name, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, name, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, name, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Check if email exists
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Number of accounts holding `role`
    pub async fn count_by_role(pool: &PgPool, role: Role) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users WHERE role = $1
            "#,
        )
        .bind(role.as_str())
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(role: &str) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            name: "User".to_string(),
            password_hash: String::new(),
            role: role.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_column_parses() {
        assert_eq!(record("USER").role().unwrap(), Role::User);
        assert_eq!(record("ADMIN").role().unwrap(), Role::Admin);
        assert!(record("ROOT").role().is_err());
    }
}

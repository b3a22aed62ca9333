use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use crate::core::database::{with_deadline, StoreTimeouts};
use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{PackageTier, SetPackageDto, UserResponseDto};
use crate::features::users::models::{NewUser, User};
use crate::shared::constants::{
    ACCOUNT_STATUS_APPROVED, ACCOUNT_STATUS_PENDING, PACKAGE_FREE, ROLE_USER,
};
use crate::shared::object_id::ObjectId;

const USER_COLUMNS: &str = "id, username, email, password_hash, role, status, package, \
     package_expires_at, hospital, created_at, updated_at";

/// Convert unique-constraint violations into a conflict the client can act on
fn handle_db_error(e: AppError) -> AppError {
    if let AppError::Database(sqlx::Error::Database(db_err)) = &e {
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return AppError::Conflict("Username or email already registered".to_string());
        }
    }
    e
}

/// Compute the expiry of a package assignment
fn package_expiry(
    tier: PackageTier,
    expiry_days: Option<i64>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>> {
    match tier {
        PackageTier::Plus => {
            let days = expiry_days.ok_or_else(|| {
                AppError::Validation("expiry_days is required for the plus package".to_string())
            })?;
            Ok(Some(now + Duration::days(days)))
        }
        PackageTier::Free | PackageTier::Premium => Ok(None),
    }
}

/// Service for account storage and administration
pub struct UserService {
    pool: PgPool,
    timeouts: StoreTimeouts,
}

impl UserService {
    pub fn new(pool: PgPool, timeouts: StoreTimeouts) -> Self {
        Self { pool, timeouts }
    }

    /// Insert a freshly registered account (pending, free package, user role)
    pub async fn create(&self, new_user: NewUser) -> Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, status, package, hospital)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = with_deadline(
            self.timeouts.query,
            "create user",
            sqlx::query_as::<_, User>(&sql)
                .bind(ObjectId::new())
                .bind(&new_user.username)
                .bind(&new_user.email)
                .bind(&new_user.password_hash)
                .bind(ROLE_USER)
                .bind(ACCOUNT_STATUS_PENDING)
                .bind(PACKAGE_FREE)
                .bind(&new_user.hospital)
                .fetch_one(&self.pool),
        )
        .await
        .map_err(handle_db_error)?;

        tracing::info!("User registered: id={}, username={}", user.id, user.username);
        Ok(user)
    }

    /// Find an account by email or username
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE email = $1 OR username = $1 LIMIT 1",
            USER_COLUMNS
        );

        with_deadline(
            self.timeouts.query,
            "find user by identifier",
            sqlx::query_as::<_, User>(&sql)
                .bind(identifier)
                .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<User> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        with_deadline(
            self.timeouts.query,
            "find user by id",
            sqlx::query_as::<_, User>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// List all accounts
    pub async fn list(&self) -> Result<Vec<UserResponseDto>> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at DESC", USER_COLUMNS);

        let users = with_deadline(
            self.timeouts.list,
            "list users",
            sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool),
        )
        .await?;

        Ok(users.into_iter().map(UserResponseDto::from).collect())
    }

    /// Mark an account as approved
    pub async fn approve(&self, id: &ObjectId) -> Result<UserResponseDto> {
        let sql = format!(
            r#"
            UPDATE users
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = with_deadline(
            self.timeouts.query,
            "approve user",
            sqlx::query_as::<_, User>(&sql)
                .bind(id)
                .bind(ACCOUNT_STATUS_APPROVED)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!("User {} approved", user.id);
        Ok(user.into())
    }

    /// Assign a package and optionally change the role
    pub async fn set_package(&self, id: &ObjectId, dto: &SetPackageDto) -> Result<UserResponseDto> {
        let expires_at = package_expiry(dto.package, dto.expiry_days, Utc::now())?;

        let sql = format!(
            r#"
            UPDATE users
            SET package = $2,
                package_expires_at = $3,
                role = COALESCE($4, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = with_deadline(
            self.timeouts.query,
            "set user package",
            sqlx::query_as::<_, User>(&sql)
                .bind(id)
                .bind(dto.package.as_str())
                .bind(expires_at)
                .bind(dto.role.map(|r| r.as_str()))
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(
            "User {} package set to {} (role={}, expires_at={:?})",
            user.id,
            user.package,
            user.role,
            user.package_expires_at
        );
        Ok(user.into())
    }

    /// Permanently remove an account
    pub async fn delete(&self, id: &ObjectId) -> Result<()> {
        let result = with_deadline(
            self.timeouts.query,
            "delete user",
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!("User {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus_package_expires_after_days() {
        let now = Utc::now();
        let expiry = package_expiry(PackageTier::Plus, Some(30), now).unwrap();
        assert_eq!(expiry, Some(now + Duration::days(30)));
    }

    #[test]
    fn test_plus_package_requires_days() {
        let result = package_expiry(PackageTier::Plus, None, Utc::now());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_premium_and_free_never_expire() {
        let now = Utc::now();
        assert_eq!(package_expiry(PackageTier::Premium, Some(10), now).unwrap(), None);
        assert_eq!(package_expiry(PackageTier::Free, None, now).unwrap(), None);
    }
}

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::shared::object_id::ObjectId;

/// Database model for an account
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub package: String,
    pub package_expires_at: Option<DateTime<Utc>>,
    pub hospital: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a new account
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub hospital: String,
}

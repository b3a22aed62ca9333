use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::Role;
use crate::features::users::models::User;
use crate::shared::object_id::ObjectId;

/// Account as returned to clients (never includes the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_expires_at: Option<DateTime<Utc>>,
    pub hospital: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            status: u.status,
            package: u.package,
            package_expires_at: u.package_expires_at,
            hospital: u.hospital,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PackageTier {
    Free,
    Plus,
    Premium,
}

impl PackageTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageTier::Free => "free",
            PackageTier::Plus => "plus",
            PackageTier::Premium => "premium",
        }
    }
}

/// Request DTO for assigning a package (and optionally a role) to an account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetPackageDto {
    pub package: PackageTier,

    /// New role; the current role is kept when omitted
    pub role: Option<Role>,

    /// Days until a `plus` package expires (required for `plus`, ignored otherwise)
    #[validate(range(min = 1, max = 3650, message = "expiry_days must be between 1 and 3650"))]
    pub expiry_days: Option<i64>,
}

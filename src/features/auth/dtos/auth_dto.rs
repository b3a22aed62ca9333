use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::UserResponseDto;
use crate::shared::validation::USERNAME_REGEX;

/// Request DTO for account registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3-50 characters"),
        regex(
            path = *USERNAME_REGEX,
            message = "Username must start with a letter or underscore and contain only letters, digits and underscores"
        )
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 200, message = "Hospital is required"))]
    pub hospital: String,
}

/// Request DTO for login with email or username
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    /// Email address or username
    #[validate(length(min = 1, message = "Email or username is required"))]
    pub identifier: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response DTO for login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// HS256 access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    pub user: UserResponseDto,
}

/// Response DTO for the current principal
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub user_id: String,
    pub role: String,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            role: user.role.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_dto(username: &str, hospital: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            username: username.to_string(),
            email: "drg.sari@example.com".to_string(),
            password: "s3cretpass".to_string(),
            hospital: hospital.to_string(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register_dto("drg_sari", "RSGM Unpad").validate().is_ok());
        assert!(register_dto("1sari", "RSGM Unpad").validate().is_err());
        assert!(register_dto("drg_sari", "").validate().is_err());
    }

    #[test]
    fn test_login_requires_identifier() {
        let dto = LoginRequestDto {
            identifier: String::new(),
            password: "whatever".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}

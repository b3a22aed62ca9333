use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, RegisterRequestDto};
use crate::features::auth::model::Role;
use crate::features::auth::services::password::{hash_password, verify_password};
use crate::features::auth::services::token_service::TokenService;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::NewUser;
use crate::features::users::UserService;

const INVALID_CREDENTIALS: &str = "Invalid email/username or password";

/// Service for authentication operations (register, login)
pub struct AuthService {
    user_service: Arc<UserService>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_service: Arc<UserService>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_service,
            token_service,
        }
    }

    /// Register a new account; it starts pending with the free package
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<UserResponseDto> {
        let password_hash = hash_password(dto.password).await?;

        let user = self
            .user_service
            .create(NewUser {
                username: dto.username.trim().to_string(),
                email: dto.email.trim().to_lowercase(),
                password_hash,
                hospital: dto.hospital.trim().to_string(),
            })
            .await?;

        Ok(user.into())
    }

    /// Login with email or username
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let identifier = dto.identifier.trim();
        let user = self
            .user_service
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(dto.password, user.password_hash.clone()).await? {
            tracing::warn!("Failed login attempt for user {}", user.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self
            .token_service
            .create_token(&user.id, Role::from_stored(&user.role))?;

        tracing::info!("User {} logged in", user.id);
        Ok(AuthResponseDto {
            access_token: token.access_token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
            user: user.into(),
        })
    }
}

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{Claims, Role};
use crate::shared::object_id::ObjectId;

/// Issued access token with its lifetime
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

/// Service for signing HS256 access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    ttl_secs: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_secs: config.token_ttl.as_secs(),
        }
    }

    pub fn create_token(&self, user_id: &ObjectId, role: Role) -> Result<IssuedToken> {
        let iat = Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat,
            exp: iat + self.ttl_secs,
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign access token: {:?}", e);
            AppError::Internal("Failed to issue access token".to_string())
        })?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.ttl_secs as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::JwtValidator;
    use std::time::Duration;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            token_ttl: Duration::from_secs(72 * 3600),
            jwt_leeway: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_issued_token_validates() {
        let cfg = config("test-secret");
        let id = ObjectId::new();
        let token = TokenService::new(&cfg).create_token(&id, Role::Admin).unwrap();
        assert_eq!(token.expires_in, 72 * 3600);

        let user = JwtValidator::new(&cfg)
            .validate_token(&token.access_token)
            .unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = TokenService::new(&config("one"))
            .create_token(&ObjectId::new(), Role::User)
            .unwrap();
        let result = JwtValidator::new(&config("two")).validate_token(&token.access_token);
        assert!(matches!(result, Err(AppError::Auth(_))));
    }
}

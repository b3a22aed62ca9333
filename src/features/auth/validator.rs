use super::model::{AuthenticatedUser, Claims};
use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use crate::shared::object_id::ObjectId;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

/// Verifies HS256 access tokens issued by `TokenService`
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.jwt_leeway.as_secs();
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))?;

        let claims = token_data.claims;
        let user_id = ObjectId::parse(&claims.sub)
            .map_err(|_| AppError::Auth("Token subject is not a valid user id".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            role: claims.role,
        })
    }
}

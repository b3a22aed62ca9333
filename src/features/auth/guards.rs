//! Role-based authorization guards.
//!
//! Question and notification routes only require authentication. `RequireAdmin`
//! protects account administration, and `ensure_self_or_admin` keeps per-user
//! listings (`/api/users/{user_id}/...`) to their owner and administrators.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::object_id::ObjectId;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for checking if user is an administrator.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}

/// Per-user resources are reachable by their owner and by administrators.
pub fn ensure_self_or_admin(user: &AuthenticatedUser, owner: &ObjectId) -> Result<(), AppError> {
    if user.is_admin() || user.user_id == *owner {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "You can only access your own resources".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_admin, create_user};

    #[test]
    fn test_ensure_self_or_admin() {
        let user = create_user();
        let other = create_user();
        assert!(ensure_self_or_admin(&user, &user.user_id).is_ok());
        assert!(ensure_self_or_admin(&create_admin(), &user.user_id).is_ok());
        assert!(matches!(
            ensure_self_or_admin(&other, &user.user_id),
            Err(AppError::Forbidden(_))
        ));
    }
}

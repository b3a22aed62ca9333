use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::users::dtos::{SetPackageDto, UserResponseDto};
use crate::features::users::services::UserService;
use crate::shared::object_id::ObjectId;
use crate::shared::types::{ApiResponse, Meta};

/// List all accounts
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "List of accounts", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let users = service.list().await?;
    let total = users.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(users),
        None,
        Some(Meta::total(total)),
    )))
}

/// Approve a pending account
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/approve",
    params(
        ("id" = String, Path, description = "User ID (24-char hex)")
    ),
    responses(
        (status = 200, description = "Account approved", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Invalid user ID"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "User not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn approve_user(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let id = ObjectId::parse_param(&id, "user")?;
    let user = service.approve(&id).await?;

    tracing::info!("Admin {} approved user {}", admin.user_id, id);
    Ok(Json(ApiResponse::success(
        Some(user),
        Some("User approved".to_string()),
        None,
    )))
}

/// Assign a package (and optionally a role) to an account
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/package",
    params(
        ("id" = String, Path, description = "User ID (24-char hex)")
    ),
    request_body = SetPackageDto,
    responses(
        (status = 200, description = "Package updated", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "User not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn set_package(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<SetPackageDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let id = ObjectId::parse_param(&id, "user")?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.set_package(&id, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(user),
        Some("Package updated".to_string()),
        None,
    )))
}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(
        ("id" = String, Path, description = "User ID (24-char hex)")
    ),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 400, description = "Invalid user ID"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "User not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let id = ObjectId::parse_param(&id, "user")?;
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "Administrators cannot delete their own account".to_string(),
        ));
    }

    service.delete(&id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("User deleted".to_string()),
        None,
    )))
}

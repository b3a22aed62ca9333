use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::packages::dtos::PackageResponseDto;
use crate::features::packages::services::PackageService;
use crate::shared::types::{ApiResponse, Meta};

/// List available subscription packages
#[utoipa::path(
    get,
    path = "/api/packages",
    responses(
        (status = 200, description = "List of packages", body = ApiResponse<Vec<PackageResponseDto>>)
    ),
    tag = "packages"
)]
pub async fn list_packages(
    State(service): State<Arc<PackageService>>,
) -> Result<Json<ApiResponse<Vec<PackageResponseDto>>>> {
    let packages = service.list().await?;
    let total = packages.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(packages),
        None,
        Some(Meta::total(total)),
    )))
}

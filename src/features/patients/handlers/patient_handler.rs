use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::patients::dtos::{PatientRequestDto, PatientResponseDto};
use crate::features::patients::services::PatientService;
use crate::shared::object_id::ObjectId;
use crate::shared::types::{ApiResponse, Meta};

/// Create a patient record
#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = PatientRequestDto,
    responses(
        (status = 201, description = "Patient record created", body = ApiResponse<PatientResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "patients",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_patient(
    _user: AuthenticatedUser,
    State(service): State<Arc<PatientService>>,
    AppJson(dto): AppJson<PatientRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<PatientResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let patient = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(patient), None, None)),
    ))
}

/// List patient records
#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "List of patient records", body = ApiResponse<Vec<PatientResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "patients",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_patients(
    _user: AuthenticatedUser,
    State(service): State<Arc<PatientService>>,
) -> Result<Json<ApiResponse<Vec<PatientResponseDto>>>> {
    let patients = service.list().await?;
    let total = patients.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(patients),
        None,
        Some(Meta::total(total)),
    )))
}

/// Replace a patient record's clinical fields
#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    params(
        ("id" = String, Path, description = "Patient ID (24-char hex)")
    ),
    request_body = PatientRequestDto,
    responses(
        (status = 200, description = "Patient record updated", body = ApiResponse<PatientResponseDto>),
        (status = 400, description = "Validation error or invalid ID"),
        (status = 404, description = "Patient not found")
    ),
    tag = "patients",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_patient(
    _user: AuthenticatedUser,
    State(service): State<Arc<PatientService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<PatientRequestDto>,
) -> Result<Json<ApiResponse<PatientResponseDto>>> {
    let id = ObjectId::parse_param(&id, "patient")?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let patient = service.update(&id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(patient),
        Some("Patient updated successfully".to_string()),
        None,
    )))
}

/// Delete a patient record
#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    params(
        ("id" = String, Path, description = "Patient ID (24-char hex)")
    ),
    responses(
        (status = 200, description = "Patient record deleted"),
        (status = 400, description = "Invalid patient ID"),
        (status = 404, description = "Patient not found")
    ),
    tag = "patients",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_patient(
    _user: AuthenticatedUser,
    State(service): State<Arc<PatientService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let id = ObjectId::parse_param(&id, "patient")?;
    service.delete(&id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Patient deleted successfully".to_string()),
        None,
    )))
}

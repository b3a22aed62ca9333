use sqlx::PgPool;

use crate::core::database::{with_deadline, StoreTimeouts};
use crate::core::error::{AppError, Result};
use crate::features::patients::dtos::{PatientRequestDto, PatientResponseDto};
use crate::features::patients::models::Patient;
use crate::shared::object_id::ObjectId;

const PATIENT_COLUMNS: &str = "id, image_name, confirmation, age, gender, duration_of_lesion, \
     expansion, paresthesia, number_of_lesions, created_at, updated_at";

/// Service for patient record operations
pub struct PatientService {
    pool: PgPool,
    timeouts: StoreTimeouts,
}

impl PatientService {
    pub fn new(pool: PgPool, timeouts: StoreTimeouts) -> Self {
        Self { pool, timeouts }
    }

    pub async fn create(&self, dto: PatientRequestDto) -> Result<PatientResponseDto> {
        let sql = format!(
            r#"
            INSERT INTO patients (id, image_name, confirmation, age, gender, duration_of_lesion,
                                  expansion, paresthesia, number_of_lesions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            PATIENT_COLUMNS
        );

        let patient = with_deadline(
            self.timeouts.query,
            "create patient",
            sqlx::query_as::<_, Patient>(&sql)
                .bind(ObjectId::new())
                .bind(&dto.image_name)
                .bind(dto.confirmation.as_str())
                .bind(dto.age)
                .bind(&dto.gender)
                .bind(&dto.duration_of_lesion)
                .bind(&dto.expansion)
                .bind(dto.paresthesia)
                .bind(&dto.number_of_lesions)
                .fetch_one(&self.pool),
        )
        .await?;

        tracing::info!("Patient record created: {}", patient.id);
        Ok(patient.into())
    }

    /// List all patient records, newest first
    pub async fn list(&self) -> Result<Vec<PatientResponseDto>> {
        let sql = format!(
            "SELECT {} FROM patients ORDER BY created_at DESC",
            PATIENT_COLUMNS
        );

        let patients = with_deadline(
            self.timeouts.list,
            "list patients",
            sqlx::query_as::<_, Patient>(&sql).fetch_all(&self.pool),
        )
        .await?;

        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Replace the clinical fields of a record
    pub async fn update(&self, id: &ObjectId, dto: PatientRequestDto) -> Result<PatientResponseDto> {
        let sql = format!(
            r#"
            UPDATE patients
            SET image_name = $2,
                confirmation = $3,
                age = $4,
                gender = $5,
                duration_of_lesion = $6,
                expansion = $7,
                paresthesia = $8,
                number_of_lesions = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PATIENT_COLUMNS
        );

        let patient = with_deadline(
            self.timeouts.query,
            "update patient",
            sqlx::query_as::<_, Patient>(&sql)
                .bind(id)
                .bind(&dto.image_name)
                .bind(dto.confirmation.as_str())
                .bind(dto.age)
                .bind(&dto.gender)
                .bind(&dto.duration_of_lesion)
                .bind(&dto.expansion)
                .bind(dto.paresthesia)
                .bind(&dto.number_of_lesions)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;

        Ok(patient.into())
    }

    pub async fn delete(&self, id: &ObjectId) -> Result<()> {
        let result = with_deadline(
            self.timeouts.query,
            "delete patient",
            sqlx::query("DELETE FROM patients WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Patient not found".to_string()));
        }

        tracing::info!("Patient record deleted: {}", id);
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::patients::models::Patient;
use crate::shared::object_id::ObjectId;

/// Whether the patient agreed to the case being used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Confirmation {
    Agree,
    Disagree,
}

impl Confirmation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confirmation::Agree => "agree",
            Confirmation::Disagree => "disagree",
        }
    }
}

/// Request DTO for creating or replacing a patient record
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PatientRequestDto {
    #[validate(length(min = 1, max = 255, message = "image_name must be 1-255 characters"))]
    pub image_name: String,

    #[serde(rename = "confirm")]
    pub confirmation: Confirmation,

    #[validate(range(min = 0, max = 150, message = "age must be between 0 and 150"))]
    pub age: i32,

    /// e.g. male, female
    #[validate(length(min = 1, max = 20, message = "gender must be 1-20 characters"))]
    pub gender: String,

    /// e.g. weeks, months, years
    #[validate(length(min = 1, max = 50))]
    pub duration_of_lesion: String,

    /// e.g. buccolingual, anteroposterior
    #[validate(length(min = 1, max = 50))]
    pub expansion: String,

    pub paresthesia: bool,

    /// e.g. single, multiple
    #[validate(length(min = 1, max = 50))]
    pub number_of_lesions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatientResponseDto {
    pub id: ObjectId,
    pub image_name: String,
    #[serde(rename = "confirm")]
    pub confirmation: String,
    pub age: i32,
    pub gender: String,
    pub duration_of_lesion: String,
    pub expansion: String,
    pub paresthesia: bool,
    pub number_of_lesions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Patient> for PatientResponseDto {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            image_name: p.image_name,
            confirmation: p.confirmation,
            age: p.age,
            gender: p.gender,
            duration_of_lesion: p.duration_of_lesion,
            expansion: p.expansion,
            paresthesia: p.paresthesia,
            number_of_lesions: p.number_of_lesions,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::shared::object_id::ObjectId;

/// Database model for a patient case
#[derive(Debug, Clone, FromRow)]
pub struct Patient {
    pub id: ObjectId,
    pub image_name: String,
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

use sqlx::FromRow;

use crate::shared::object_id::ObjectId;

/// Database model for a subscription package
#[derive(Debug, Clone, FromRow)]
pub struct Package {
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub features: Vec<String>,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::packages::models::Package;
use crate::shared::object_id::ObjectId;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PackageResponseDto {
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub features: Vec<String>,
}

impl From<Package> for PackageResponseDto {
    fn from(p: Package) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            features: p.features,
        }
    }
}

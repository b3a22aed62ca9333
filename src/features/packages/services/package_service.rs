use sqlx::PgPool;

use crate::core::database::{with_deadline, StoreTimeouts};
use crate::core::error::Result;
use crate::features::packages::dtos::PackageResponseDto;
use crate::features::packages::models::Package;

/// Service for package operations
pub struct PackageService {
    pool: PgPool,
    timeouts: StoreTimeouts,
}

impl PackageService {
    pub fn new(pool: PgPool, timeouts: StoreTimeouts) -> Self {
        Self { pool, timeouts }
    }

    /// List all packages, cheapest first
    pub async fn list(&self) -> Result<Vec<PackageResponseDto>> {
        let packages = with_deadline(
            self.timeouts.list,
            "list packages",
            sqlx::query_as::<_, Package>(
                r#"
                SELECT id, name, description, price, features
                FROM packages
                ORDER BY price, name
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(packages.into_iter().map(|p| p.into()).collect())
    }
}

use crate::core::config::DatabaseConfig;
use crate::core::error::{AppError, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::future::Future;
use std::time::Duration;

pub async fn create_pool(config: &DatabaseConfig) -> std::result::Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

/// Per-call deadlines applied to every store operation
#[derive(Debug, Clone, Copy)]
pub struct StoreTimeouts {
    /// Single-record reads and all writes
    pub query: Duration,
    /// Multi-record reads
    pub list: Duration,
}

impl StoreTimeouts {
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            query: Duration::from_secs(config.query_timeout_secs),
            list: Duration::from_secs(config.list_timeout_secs),
        }
    }
}

impl Default for StoreTimeouts {
    fn default() -> Self {
        Self {
            query: Duration::from_secs(5),
            list: Duration::from_secs(10),
        }
    }
}

/// Run a store operation under a deadline.
///
/// Both a driver error and an elapsed deadline are logged with `op` and surface as
/// generic persistence errors.
pub async fn with_deadline<T, F>(deadline: Duration, op: &str, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::error!("Failed to {}: {:?}", op, e);
            Err(AppError::Database(e))
        }
        Err(_) => {
            tracing::error!("Timed out after {:?} trying to {}", deadline, op);
            Err(AppError::Timeout(op.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_deadline_passes_value_through() {
        let value = with_deadline(Duration::from_millis(50), "read", async {
            Ok::<_, sqlx::Error>(7)
        })
        .await;
        assert_eq!(value.ok(), Some(7));
    }

    #[tokio::test]
    async fn test_with_deadline_times_out() {
        let result = with_deadline(Duration::from_millis(10), "slow read", async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, sqlx::Error>(())
        })
        .await;
        assert!(matches!(result, Err(AppError::Timeout(op)) if op == "slow read"));
    }

    #[tokio::test]
    async fn test_with_deadline_maps_driver_error() {
        let result = with_deadline(Duration::from_millis(50), "write", async {
            Err::<(), _>(sqlx::Error::RowNotFound)
        })
        .await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}

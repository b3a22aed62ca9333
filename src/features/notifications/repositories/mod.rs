mod postgres;

pub use postgres::{enqueue_in_tx, PgNotificationRepository, PgOutboxRepository};

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::notifications::models::{
    NewNotification, Notification, NotificationType, OutboxEntry, OutboxStatus,
};
use crate::shared::object_id::ObjectId;

/// Notification center storage
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store a notification as unread. Inserting an id that already exists is a no-op.
    async fn insert(&self, notification: &NewNotification) -> Result<()>;

    /// All notifications of a receiver, newest first
    async fn list_for_receiver(&self, receiver: &ObjectId) -> Result<Vec<Notification>>;

    /// Flip an unread notification to read; `false` when there was nothing to change
    async fn mark_read(&self, id: &ObjectId) -> Result<bool>;

    async fn count_unread(
        &self,
        receiver: &ObjectId,
        kind: Option<NotificationType>,
    ) -> Result<i64>;
}

/// Pending notifications recorded next to question changes
#[async_trait]
pub trait OutboxRepository: Send + Sync {
    /// Oldest pending entries that still have attempts left
    async fn fetch_pending(&self, max_attempts: i32, batch_size: i64) -> Result<Vec<OutboxEntry>>;

    async fn mark_delivered(&self, id: &ObjectId) -> Result<()>;

    /// Record a failed attempt and return the resulting status
    async fn mark_failed(
        &self,
        id: &ObjectId,
        attempts: i32,
        max_attempts: i32,
        error: &str,
    ) -> Result<OutboxStatus>;
}

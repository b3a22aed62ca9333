use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::core::database::{with_deadline, StoreTimeouts};
use crate::core::error::Result;
use crate::features::notifications::models::{
    NewNotification, Notification, NotificationType, OutboxEntry, OutboxStatus,
};
use crate::features::notifications::repositories::{NotificationRepository, OutboxRepository};
use crate::shared::object_id::ObjectId;

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: ObjectId,
    receiver_id: ObjectId,
    sender_id: ObjectId,
    question_id: ObjectId,
    kind: String,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
    redirect_url: String,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = crate::core::error::AppError;

    fn try_from(row: NotificationRow) -> Result<Self> {
        Ok(Self {
            kind: row.kind.parse()?,
            id: row.id,
            receiver_id: row.receiver_id,
            sender_id: row.sender_id,
            question_id: row.question_id,
            message: row.message,
            is_read: row.is_read,
            created_at: row.created_at,
            redirect_url: row.redirect_url,
        })
    }
}

#[derive(Debug, FromRow)]
struct OutboxRow {
    id: ObjectId,
    notification_id: ObjectId,
    receiver_id: ObjectId,
    sender_id: ObjectId,
    question_id: ObjectId,
    kind: String,
    message: String,
    redirect_url: String,
    attempts: i32,
    last_error: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OutboxRow> for OutboxEntry {
    type Error = crate::core::error::AppError;

    fn try_from(row: OutboxRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            notification: NewNotification {
                id: row.notification_id,
                receiver_id: row.receiver_id,
                sender_id: row.sender_id,
                question_id: row.question_id,
                kind: row.kind.parse()?,
                message: row.message,
                redirect_url: row.redirect_url,
            },
            attempts: row.attempts,
            last_error: row.last_error,
            created_at: row.created_at,
        })
    }
}

/// Record a notification in the outbox on an open transaction
pub async fn enqueue_in_tx(
    conn: &mut PgConnection,
    notification: &NewNotification,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO notification_outbox
            (id, notification_id, receiver_id, sender_id, question_id, kind, message, redirect_url, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(ObjectId::new())
    .bind(&notification.id)
    .bind(&notification.receiver_id)
    .bind(&notification.sender_id)
    .bind(&notification.question_id)
    .bind(notification.kind.as_str())
    .bind(&notification.message)
    .bind(&notification.redirect_url)
    .bind(OutboxStatus::Pending.as_str())
    .execute(conn)
    .await?;

    Ok(())
}

pub struct PgNotificationRepository {
    pool: PgPool,
    timeouts: StoreTimeouts,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool, timeouts: StoreTimeouts) -> Self {
        Self { pool, timeouts }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert(&self, notification: &NewNotification) -> Result<()> {
        with_deadline(
            self.timeouts.query,
            "insert notification",
            sqlx::query(
                r#"
                INSERT INTO notifications
                    (id, receiver_id, sender_id, question_id, kind, message, is_read, redirect_url)
                VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(&notification.id)
            .bind(&notification.receiver_id)
            .bind(&notification.sender_id)
            .bind(&notification.question_id)
            .bind(notification.kind.as_str())
            .bind(&notification.message)
            .bind(&notification.redirect_url)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn list_for_receiver(&self, receiver: &ObjectId) -> Result<Vec<Notification>> {
        let rows = with_deadline(
            self.timeouts.list,
            "list notifications",
            sqlx::query_as::<_, NotificationRow>(
                r#"
                SELECT id, receiver_id, sender_id, question_id, kind, message, is_read,
                       created_at, redirect_url
                FROM notifications
                WHERE receiver_id = $1
                ORDER BY created_at DESC, id DESC
                "#,
            )
            .bind(receiver)
            .fetch_all(&self.pool),
        )
        .await?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn mark_read(&self, id: &ObjectId) -> Result<bool> {
        let result = with_deadline(
            self.timeouts.query,
            "mark notification read",
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND is_read = FALSE")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_unread(
        &self,
        receiver: &ObjectId,
        kind: Option<NotificationType>,
    ) -> Result<i64> {
        with_deadline(
            self.timeouts.query,
            "count unread notifications",
            sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*)
                FROM notifications
                WHERE receiver_id = $1
                  AND is_read = FALSE
                  AND ($2::TEXT IS NULL OR kind = $2::TEXT)
                "#,
            )
            .bind(receiver)
            .bind(kind.map(|k| k.as_str()))
            .fetch_one(&self.pool),
        )
        .await
    }
}

pub struct PgOutboxRepository {
    pool: PgPool,
    timeouts: StoreTimeouts,
}

impl PgOutboxRepository {
    pub fn new(pool: PgPool, timeouts: StoreTimeouts) -> Self {
        Self { pool, timeouts }
    }
}

#[async_trait]
impl OutboxRepository for PgOutboxRepository {
    async fn fetch_pending(&self, max_attempts: i32, batch_size: i64) -> Result<Vec<OutboxEntry>> {
        let rows = with_deadline(
            self.timeouts.list,
            "fetch pending outbox entries",
            sqlx::query_as::<_, OutboxRow>(
                r#"
                SELECT id, notification_id, receiver_id, sender_id, question_id, kind, message,
                       redirect_url, attempts, last_error, created_at
                FROM notification_outbox
                WHERE status = $1
                  AND attempts < $2
                ORDER BY created_at ASC
                LIMIT $3
                "#,
            )
            .bind(OutboxStatus::Pending.as_str())
            .bind(max_attempts)
            .bind(batch_size)
            .fetch_all(&self.pool),
        )
        .await?;

        rows.into_iter().map(OutboxEntry::try_from).collect()
    }

    async fn mark_delivered(&self, id: &ObjectId) -> Result<()> {
        with_deadline(
            self.timeouts.query,
            "mark outbox entry delivered",
            sqlx::query(
                r#"
                UPDATE notification_outbox
                SET status = $2, last_attempt_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(id)
            .bind(OutboxStatus::Delivered.as_str())
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn mark_failed(
        &self,
        id: &ObjectId,
        attempts: i32,
        max_attempts: i32,
        error: &str,
    ) -> Result<OutboxStatus> {
        let status = OutboxEntry::status_after_failure(attempts, max_attempts);

        with_deadline(
            self.timeouts.query,
            "mark outbox entry failed",
            sqlx::query(
                r#"
                UPDATE notification_outbox
                SET status = $2, attempts = $3, last_error = $4, last_attempt_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(id)
            .bind(status.as_str())
            .bind(attempts + 1)
            .bind(error)
            .execute(&self.pool),
        )
        .await?;

        Ok(status)
    }
}

use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::Role;
use crate::features::notifications::dtos::NotificationResponseDto;
use crate::features::notifications::models::{NewNotification, NotificationType};
use crate::features::notifications::repositories::NotificationRepository;
use crate::features::questions::repositories::QuestionRepository;
use crate::shared::object_id::ObjectId;

/// Notification center operations.
///
/// `Notification.is_read` (notification center) and `Question.read_status`
/// (in-question indicators and the bell) are separate channels and are never
/// reconciled with each other.
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl NotificationDispatcher {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        questions: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            notifications,
            questions,
        }
    }

    /// Persist a notification as unread. Called by the outbox worker.
    pub async fn emit(&self, notification: &NewNotification) -> Result<()> {
        self.notifications.insert(notification).await.map_err(|e| {
            tracing::error!(
                "Failed to emit {} notification {} to {}: {:?}",
                notification.kind,
                notification.id,
                notification.receiver_id,
                e
            );
            e
        })?;

        tracing::debug!(
            "Emitted {} notification {} to {}",
            notification.kind,
            notification.id,
            notification.receiver_id
        );
        Ok(())
    }

    pub async fn list_for_receiver(
        &self,
        receiver: &ObjectId,
    ) -> Result<Vec<NotificationResponseDto>> {
        let notifications = self.notifications.list_for_receiver(receiver).await?;
        Ok(notifications.into_iter().map(|n| n.into()).collect())
    }

    /// Mark a notification read; unknown or already-read ids are not found
    pub async fn mark_read(&self, id: &ObjectId) -> Result<()> {
        if !self.notifications.mark_read(id).await? {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }
        Ok(())
    }

    /// Unread notifications of a receiver.
    ///
    /// Admins only count `new_question` notifications.
    pub async fn unread_count(&self, receiver: &ObjectId, role: Role) -> Result<i64> {
        let kind = match role {
            Role::Admin => Some(NotificationType::NewQuestion),
            Role::User => None,
        };
        self.notifications.count_unread(receiver, kind).await
    }

    /// Clear the bell indicator on every question the receiver asked
    pub async fn clear_bell(&self, receiver: &ObjectId) -> Result<u64> {
        let modified = self.questions.clear_bell(receiver).await?;
        tracing::info!("Cleared bell on {} questions of {}", modified, receiver);
        Ok(modified)
    }
}

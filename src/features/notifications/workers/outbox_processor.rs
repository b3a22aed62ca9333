use std::sync::Arc;

use tokio::sync::Notify;
use tokio::time::{interval, MissedTickBehavior};

use crate::core::config::NotificationConfig;
use crate::core::error::Result;
use crate::features::notifications::models::{OutboxEntry, OutboxStatus};
use crate::features::notifications::repositories::OutboxRepository;
use crate::features::notifications::services::NotificationDispatcher;

/// Outcome of one outbox sweep
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub delivered: usize,
    pub retrying: usize,
    pub failed: usize,
}

/// Background worker that drains the notification outbox.
///
/// Wakes as soon as a question change signals `wake`, and otherwise sweeps on
/// a fixed interval so entries left behind by a crash or a failed attempt are
/// still picked up.
pub struct OutboxProcessor {
    outbox: Arc<dyn OutboxRepository>,
    dispatcher: Arc<NotificationDispatcher>,
    wake: Arc<Notify>,
    config: NotificationConfig,
}

impl OutboxProcessor {
    pub fn new(
        outbox: Arc<dyn OutboxRepository>,
        dispatcher: Arc<NotificationDispatcher>,
        wake: Arc<Notify>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            outbox,
            dispatcher,
            wake,
            config,
        }
    }

    /// Run the processor in a background loop
    pub async fn run(&self) {
        tracing::info!(
            "Starting notification outbox worker (interval={:?}, batch={}, max_attempts={})",
            self.config.poll_interval,
            self.config.batch_size,
            self.config.max_attempts
        );

        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.wake.notified() => {}
                _ = ticker.tick() => {}
            }

            if let Err(e) = self.process_batch().await {
                tracing::error!("Error processing notification outbox batch: {:?}", e);
            }
        }
    }

    /// Deliver one batch of pending entries
    pub async fn process_batch(&self) -> Result<BatchReport> {
        let entries = self
            .outbox
            .fetch_pending(self.config.max_attempts, self.config.batch_size)
            .await?;

        let mut report = BatchReport::default();
        if entries.is_empty() {
            return Ok(report);
        }

        tracing::info!("Delivering {} pending notifications", entries.len());

        for entry in entries {
            match self.deliver(&entry).await? {
                OutboxStatus::Delivered => report.delivered += 1,
                OutboxStatus::Pending => report.retrying += 1,
                OutboxStatus::Failed => report.failed += 1,
            }
        }

        Ok(report)
    }

    async fn deliver(&self, entry: &OutboxEntry) -> Result<OutboxStatus> {
        match self.dispatcher.emit(&entry.notification).await {
            Ok(()) => {
                self.outbox.mark_delivered(&entry.id).await?;
                Ok(OutboxStatus::Delivered)
            }
            Err(e) => {
                let status = self
                    .outbox
                    .mark_failed(
                        &entry.id,
                        entry.attempts,
                        self.config.max_attempts,
                        &e.to_string(),
                    )
                    .await?;

                match status {
                    OutboxStatus::Failed => tracing::warn!(
                        "Notification {} permanently failed after {} attempts",
                        entry.notification.id,
                        self.config.max_attempts
                    ),
                    _ => tracing::info!(
                        "Notification {} marked for retry ({}/{})",
                        entry.notification.id,
                        entry.attempts + 1,
                        self.config.max_attempts
                    ),
                }
                Ok(status)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use crate::features::questions::dtos::{AnswerDto, CreateQuestionDto};
    use crate::shared::test_helpers::{create_admin, create_user, TestContext};

    async fn answered_question(ctx: &TestContext) -> crate::shared::object_id::ObjectId {
        let user = create_user();
        let q = ctx
            .questions
            .create(
                &user.user_id,
                CreateQuestionDto {
                    title: "T".to_string(),
                    content: "B".to_string(),
                    admin_id: None,
                },
            )
            .await
            .unwrap();
        ctx.questions
            .answer(&q.id, &create_admin(), AnswerDto { answer: "A".to_string() })
            .await
            .unwrap();
        user.user_id
    }

    #[tokio::test]
    async fn test_batch_delivers_and_marks_entries() {
        let ctx = TestContext::new();
        answered_question(&ctx).await;

        let report = ctx.deliver().await;
        assert_eq!(report.delivered, 1);
        assert_eq!(ctx.store.outbox()[0].1, OutboxStatus::Delivered);

        // Nothing left to do
        assert_eq!(ctx.deliver().await, BatchReport::default());
    }

    #[tokio::test]
    async fn test_failed_delivery_is_retried_and_never_fails_the_question() {
        let ctx = TestContext::new();
        ctx.store.fail_notifications(true);
        let author = answered_question(&ctx).await;

        let report = ctx.deliver().await;
        assert_eq!(report.retrying, 1);
        let (entry, status) = ctx.store.outbox()[0].clone();
        assert_eq!(status, OutboxStatus::Pending);
        assert_eq!(entry.attempts, 1);
        assert!(entry.last_error.is_some());

        ctx.store.fail_notifications(false);
        assert_eq!(ctx.deliver().await.delivered, 1);
        assert_eq!(
            ctx.dispatcher.unread_count(&author, Role::User).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_entry_marked_failed_after_max_attempts() {
        let ctx = TestContext::new();
        ctx.store.fail_notifications(true);
        answered_question(&ctx).await;

        let max = NotificationConfig::default().max_attempts;
        for _ in 0..max - 1 {
            assert_eq!(ctx.deliver().await.retrying, 1);
        }
        assert_eq!(ctx.deliver().await.failed, 1);
        assert_eq!(ctx.store.outbox()[0].1, OutboxStatus::Failed);
        assert_eq!(ctx.deliver().await, BatchReport::default());
    }

    #[tokio::test]
    async fn test_redelivery_does_not_duplicate() {
        let ctx = TestContext::new();
        let author = answered_question(&ctx).await;
        let entry = ctx.store.outbox()[0].0.clone();

        ctx.dispatcher.emit(&entry.notification).await.unwrap();
        ctx.dispatcher.emit(&entry.notification).await.unwrap();

        assert_eq!(
            ctx.dispatcher.list_for_receiver(&author).await.unwrap().len(),
            1
        );
    }
}

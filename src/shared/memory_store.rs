//! In-memory question, notification and outbox storage for tests.
//!
//! All three repositories share one lock, so a question change and its outbox
//! entry land together exactly as they do in a Postgres transaction.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::core::error::{AppError, Result};
use crate::features::notifications::models::{
    NewNotification, Notification, NotificationType, OutboxEntry, OutboxStatus,
};
use crate::features::notifications::repositories::{NotificationRepository, OutboxRepository};
use crate::features::questions::models::{Question, QuestionChange, QuestionSort};
use crate::features::questions::repositories::{QuestionQuery, QuestionRepository};
use crate::shared::object_id::ObjectId;

#[derive(Default)]
struct State {
    questions: Vec<Question>,
    notifications: Vec<Notification>,
    outbox: Vec<(OutboxEntry, OutboxStatus)>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    fail_questions: AtomicBool,
    fail_notifications: AtomicBool,
}

fn store_down() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every question operation fail like an unreachable database
    pub fn fail_questions(&self, fail: bool) {
        self.fail_questions.store(fail, Ordering::SeqCst);
    }

    /// Make notification inserts fail (outbox delivery errors)
    pub fn fail_notifications(&self, fail: bool) {
        self.fail_notifications.store(fail, Ordering::SeqCst);
    }

    /// Every stored question, including deleted ones
    pub fn all_questions(&self) -> Vec<Question> {
        self.state.lock().unwrap().questions.clone()
    }

    pub fn all_notifications(&self) -> Vec<Notification> {
        self.state.lock().unwrap().notifications.clone()
    }

    pub fn outbox(&self) -> Vec<(OutboxEntry, OutboxStatus)> {
        self.state.lock().unwrap().outbox.clone()
    }

    fn check_questions(&self) -> Result<()> {
        if self.fail_questions.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        Ok(())
    }
}

fn enqueue(state: &mut State, notification: Option<&NewNotification>) {
    if let Some(notification) = notification {
        state
            .outbox
            .push((OutboxEntry::new(notification.clone()), OutboxStatus::Pending));
    }
}

#[async_trait]
impl QuestionRepository for MemoryStore {
    async fn insert(
        &self,
        question: &Question,
        notification: Option<&NewNotification>,
    ) -> Result<()> {
        self.check_questions()?;
        let mut state = self.state.lock().unwrap();
        state.questions.push(question.clone());
        enqueue(&mut state, notification);
        Ok(())
    }

    async fn find(&self, id: &ObjectId) -> Result<Option<Question>> {
        self.check_questions()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .questions
            .iter()
            .find(|q| q.id == *id && !q.is_deleted())
            .cloned())
    }

    async fn list(&self, query: &QuestionQuery) -> Result<(Vec<Question>, i64)> {
        self.check_questions()?;
        let state = self.state.lock().unwrap();

        let mut matches: Vec<Question> = state
            .questions
            .iter()
            .filter(|q| !q.is_deleted())
            .filter(|q| query.author.as_ref().map_or(true, |a| q.user_id == *a))
            .filter(|q| query.statuses.is_empty() || query.statuses.contains(&q.status))
            .cloned()
            .collect();

        matches.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        if query.sort == QuestionSort::Newest {
            matches.reverse();
        }

        let total = matches.len() as i64;
        let page = match query.page {
            Some(page) => matches
                .into_iter()
                .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
                .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
                .collect(),
            None => matches,
        };

        Ok((page, total))
    }

    async fn update(
        &self,
        id: &ObjectId,
        change: &QuestionChange,
        notification: Option<&NewNotification>,
    ) -> Result<Option<Question>> {
        self.check_questions()?;
        let mut state = self.state.lock().unwrap();

        let Some(question) = state
            .questions
            .iter_mut()
            .find(|q| q.id == *id && change.applies_to(q))
        else {
            return Ok(None);
        };

        change.apply(question, Utc::now());
        let updated = question.clone();
        enqueue(&mut state, notification);
        Ok(Some(updated))
    }

    async fn clear_bell(&self, author: &ObjectId) -> Result<u64> {
        self.check_questions()?;
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();

        let mut modified = 0;
        for q in state
            .questions
            .iter_mut()
            .filter(|q| q.user_id == *author && !q.is_deleted() && !q.read_status.notification_bell)
        {
            q.read_status.notification_bell = true;
            q.updated_at = now;
            modified += 1;
        }
        Ok(modified)
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn insert(&self, notification: &NewNotification) -> Result<()> {
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        let mut state = self.state.lock().unwrap();
        if state.notifications.iter().any(|n| n.id == notification.id) {
            return Ok(());
        }
        state
            .notifications
            .push(notification.clone().into_notification(Utc::now()));
        Ok(())
    }

    async fn list_for_receiver(&self, receiver: &ObjectId) -> Result<Vec<Notification>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.receiver_id == *receiver)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: &ObjectId) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match state
            .notifications
            .iter_mut()
            .find(|n| n.id == *id && !n.is_read)
        {
            Some(n) => {
                n.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_unread(
        &self,
        receiver: &ObjectId,
        kind: Option<NotificationType>,
    ) -> Result<i64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .notifications
            .iter()
            .filter(|n| n.receiver_id == *receiver && !n.is_read)
            .filter(|n| kind.map_or(true, |k| n.kind == k))
            .count() as i64)
    }
}

#[async_trait]
impl OutboxRepository for MemoryStore {
    async fn fetch_pending(&self, max_attempts: i32, batch_size: i64) -> Result<Vec<OutboxEntry>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .outbox
            .iter()
            .filter(|(e, s)| *s == OutboxStatus::Pending && e.attempts < max_attempts)
            .take(batch_size as usize)
            .map(|(e, _)| e.clone())
            .collect())
    }

    async fn mark_delivered(&self, id: &ObjectId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some((_, status)) = state.outbox.iter_mut().find(|(e, _)| e.id == *id) {
            *status = OutboxStatus::Delivered;
        }
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: &ObjectId,
        attempts: i32,
        max_attempts: i32,
        error: &str,
    ) -> Result<OutboxStatus> {
        let next = OutboxEntry::status_after_failure(attempts, max_attempts);
        let mut state = self.state.lock().unwrap();
        if let Some((entry, status)) = state.outbox.iter_mut().find(|(e, _)| e.id == *id) {
            entry.attempts = attempts + 1;
            entry.last_error = Some(error.to_string());
            *status = next;
        }
        Ok(next)
    }
}

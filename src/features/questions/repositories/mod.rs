mod postgres;

pub use postgres::PgQuestionRepository;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::notifications::models::NewNotification;
use crate::features::questions::models::{Question, QuestionChange, QuestionSort, QuestionStatus};
use crate::shared::object_id::ObjectId;
use crate::shared::types::PageRequest;

/// Selection for question listings. Deleted questions are never returned.
#[derive(Debug, Clone, Default)]
pub struct QuestionQuery {
    pub author: Option<ObjectId>,
    /// Empty means any status
    pub statuses: Vec<QuestionStatus>,
    pub sort: QuestionSort,
    pub page: Option<PageRequest>,
}

/// Question storage.
///
/// Every write that carries a notification records it in the notification
/// outbox within the same transaction as the question change.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn insert(&self, question: &Question, notification: Option<&NewNotification>)
        -> Result<()>;

    /// Fetch a non-deleted question
    async fn find(&self, id: &ObjectId) -> Result<Option<Question>>;

    /// Matching questions for the requested page, plus the total match count
    async fn list(&self, query: &QuestionQuery) -> Result<(Vec<Question>, i64)>;

    /// Apply a change to a non-deleted question; `None` when no such question exists or the
    /// change no longer applies (see `QuestionChange::applies_to`)
    async fn update(
        &self,
        id: &ObjectId,
        change: &QuestionChange,
        notification: Option<&NewNotification>,
    ) -> Result<Option<Question>>;

    /// Set the bell flag on every question of `author`; returns how many changed
    async fn clear_bell(&self, author: &ObjectId) -> Result<u64>;
}

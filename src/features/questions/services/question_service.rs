use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Notify;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::notifications::models::NewNotification;
use crate::features::questions::dtos::{
    AnswerDto, CreateQuestionDto, EditContentDto, QuestionResponseDto, UpdateStatusDto,
};
use crate::features::questions::models::{
    EditEntry, Question, QuestionChange, QuestionSort, QuestionStatus,
};
use crate::features::questions::repositories::{QuestionQuery, QuestionRepository};
use crate::shared::object_id::ObjectId;
use crate::shared::types::PageRequest;

fn not_found() -> AppError {
    AppError::NotFound("Question not found".to_string())
}

fn require_text(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

/// Question lifecycle operations.
///
/// Notifications produced by a change are written to the outbox together with
/// the change itself; `outbox_wake` tells the outbox worker to deliver them.
pub struct QuestionService {
    questions: Arc<dyn QuestionRepository>,
    outbox_wake: Arc<Notify>,
}

impl QuestionService {
    pub fn new(questions: Arc<dyn QuestionRepository>, outbox_wake: Arc<Notify>) -> Self {
        Self {
            questions,
            outbox_wake,
        }
    }

    /// Ask a new question
    pub async fn create(
        &self,
        author_id: &ObjectId,
        dto: CreateQuestionDto,
    ) -> Result<QuestionResponseDto> {
        require_text(&dto.title, "Title and content are required")?;
        require_text(&dto.content, "Title and content are required")?;

        let question = Question::new(
            author_id.clone(),
            dto.admin_id,
            dto.title,
            dto.content,
            Utc::now(),
        );

        let notification = question.admin_id.clone().map(|admin_id| {
            NewNotification::new_question(admin_id, author_id.clone(), &question.id, &question.title)
        });

        self.questions
            .insert(&question, notification.as_ref())
            .await?;
        self.wake_if(notification.is_some());

        tracing::info!("Question {} created by {}", question.id, author_id);
        Ok(question.into())
    }

    /// Fetch a question and record that the viewer has seen it
    pub async fn get(&self, id: &ObjectId, viewer: &AuthenticatedUser) -> Result<QuestionResponseDto> {
        self.mark_viewed(id, viewer.role).await
    }

    /// Set the viewer's read flag. Repeating it changes nothing.
    pub async fn mark_viewed(&self, id: &ObjectId, viewer_role: Role) -> Result<QuestionResponseDto> {
        let question = self
            .questions
            .update(id, &QuestionChange::MarkViewed(viewer_role), None)
            .await?
            .ok_or_else(not_found)?;

        Ok(question.into())
    }

    /// Replace the content and record the revision in the edit history
    pub async fn edit(
        &self,
        id: &ObjectId,
        editor: &AuthenticatedUser,
        dto: EditContentDto,
    ) -> Result<QuestionResponseDto> {
        require_text(&dto.content, "Content is required")?;

        let current = self.questions.find(id).await?.ok_or_else(not_found)?;

        // The other party hears about the edit
        let receiver = match editor.role {
            Role::Admin => Some(current.user_id.clone()),
            Role::User => current.admin_id.clone(),
        }
        .filter(|receiver| *receiver != editor.user_id);

        let notification = receiver.map(|receiver| {
            NewNotification::edited(receiver, editor.user_id.clone(), id, &current.title)
        });

        let entry = EditEntry {
            content: dto.content,
            edited_at: Utc::now(),
            edited_by: editor.role,
        };

        let question = self
            .questions
            .update(id, &QuestionChange::Edit(entry), notification.as_ref())
            .await?
            .ok_or_else(not_found)?;
        self.wake_if(notification.is_some());

        tracing::info!("Question {} edited by {} ({})", id, editor.user_id, editor.role);
        Ok(question.into())
    }

    /// Answer a question from any non-deleted status
    pub async fn answer(
        &self,
        id: &ObjectId,
        answered_by: &AuthenticatedUser,
        dto: AnswerDto,
    ) -> Result<QuestionResponseDto> {
        require_text(&dto.answer, "Answer is required")?;

        let current = self.questions.find(id).await?.ok_or_else(not_found)?;
        let notification = NewNotification::new_answer(
            current.user_id.clone(),
            answered_by.user_id.clone(),
            id,
            &current.title,
        );

        let question = self
            .questions
            .update(id, &QuestionChange::Answer(dto.answer), Some(&notification))
            .await?
            .ok_or_else(not_found)?;
        self.wake_if(true);

        tracing::info!("Question {} answered by {}", id, answered_by.user_id);
        Ok(question.into())
    }

    /// Explicit status change, checked against the transition table
    pub async fn set_status(
        &self,
        id: &ObjectId,
        changed_by: &AuthenticatedUser,
        dto: UpdateStatusDto,
    ) -> Result<QuestionResponseDto> {
        let next: QuestionStatus = dto.status.trim().parse()?;
        if next == QuestionStatus::Deleted {
            return Err(AppError::Validation(
                "Questions are deleted through DELETE /api/questions/{id}".to_string(),
            ));
        }

        let current = self.questions.find(id).await?.ok_or_else(not_found)?;
        if !current.status.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "Cannot change status from {} to {}",
                current.status, next
            )));
        }

        let notification = (current.status != next).then(|| {
            NewNotification::status_update(
                current.user_id.clone(),
                changed_by.user_id.clone(),
                id,
                &current.title,
                next.as_str(),
            )
        });

        let change = QuestionChange::Status {
            from: current.status,
            to: next,
        };
        let Some(question) = self
            .questions
            .update(id, &change, notification.as_ref())
            .await?
        else {
            // Still there, so another change moved it first
            return match self.questions.find(id).await? {
                Some(_) => Err(AppError::Conflict(
                    "Question status changed concurrently, please retry".to_string(),
                )),
                None => Err(not_found()),
            };
        };
        self.wake_if(notification.is_some());

        tracing::info!(
            "Question {} status {} -> {} by {}",
            id,
            current.status,
            next,
            changed_by.user_id
        );
        Ok(question.into())
    }

    /// Soft delete; the question disappears from every read path while its
    /// notifications remain
    pub async fn delete(&self, id: &ObjectId) -> Result<()> {
        self.questions
            .update(id, &QuestionChange::Delete, None)
            .await?
            .ok_or_else(not_found)?;

        tracing::info!("Question {} deleted", id);
        Ok(())
    }

    pub async fn list(&self, query: &QuestionQuery) -> Result<(Vec<QuestionResponseDto>, i64)> {
        let (questions, total) = self.questions.list(query).await?;
        Ok((questions.into_iter().map(|q| q.into()).collect(), total))
    }

    /// Questions an admin still has to act on
    pub async fn pending_queue(
        &self,
        page: Option<PageRequest>,
    ) -> Result<(Vec<QuestionResponseDto>, i64)> {
        self.list(&QuestionQuery {
            statuses: QuestionStatus::OPEN.to_vec(),
            page,
            ..Default::default()
        })
        .await
    }

    /// An author's questions, newest first, always paginated
    pub async fn user_history(
        &self,
        author: &ObjectId,
        page: PageRequest,
    ) -> Result<(Vec<QuestionResponseDto>, i64)> {
        self.list(&QuestionQuery {
            author: Some(author.clone()),
            sort: QuestionSort::Newest,
            page: Some(page),
            ..Default::default()
        })
        .await
    }

    fn wake_if(&self, enqueued: bool) {
        if enqueued {
            self.outbox_wake.notify_one();
        }
    }
}

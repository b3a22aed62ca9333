use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::Result;
use crate::features::questions::models::{
    EditEntry, Question, QuestionSort, QuestionStatus, ReadStatus,
};
use crate::shared::object_id::ObjectId;
use crate::shared::types::PaginationQuery;

/// Request DTO for asking a question
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionDto {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: String,

    #[validate(length(max = 10000, message = "Content must be at most 10000 characters"))]
    pub content: String,

    /// Admin the question is addressed to; they receive a `new_question` notification
    pub admin_id: Option<ObjectId>,
}

/// Request DTO for replacing a question's content
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EditContentDto {
    #[validate(length(max = 10000, message = "Content must be at most 10000 characters"))]
    pub content: String,
}

/// Request DTO for answering a question
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AnswerDto {
    #[validate(length(max = 10000, message = "Answer must be at most 10000 characters"))]
    pub answer: String,
}

/// Request DTO for an explicit status change
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusDto {
    /// One of `pending`, `inProgress`, `answered`, `closed`
    pub status: String,
}

/// Query parameters for listing questions
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct QuestionListQuery {
    /// Comma-separated statuses, e.g. `pending,inProgress`
    pub status: Option<String>,

    /// `oldest` (default) or `newest`
    pub sort: Option<QuestionSort>,

    /// Page number (1-indexed); pagination applies only when page or page_size is given
    #[param(value_type = Option<i64>, minimum = 1)]
    pub page: Option<String>,

    /// Number of items per page (default: 10, max: 100)
    #[param(value_type = Option<i64>, minimum = 1, maximum = 100)]
    pub page_size: Option<String>,
}

impl QuestionListQuery {
    pub fn statuses(&self) -> Result<Vec<QuestionStatus>> {
        self.status
            .as_deref()
            .map(parse_status_filter)
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page.clone(),
            page_size: self.page_size.clone(),
        }
    }
}

/// Parse `pending,inProgress` style filters; blank segments are ignored
pub fn parse_status_filter(raw: &str) -> Result<Vec<QuestionStatus>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionResponseDto {
    pub id: ObjectId,
    /// Author
    pub user_id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<ObjectId>,
    pub title: String,
    pub content: String,
    pub status: QuestionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub is_edited: bool,
    pub edit_history: Vec<EditEntry>,
    pub read_status: ReadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Question> for QuestionResponseDto {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            user_id: q.user_id,
            admin_id: q.admin_id,
            title: q.title,
            content: q.content,
            status: q.status,
            answer: q.answer,
            is_edited: q.is_edited,
            edit_history: q.edit_history,
            read_status: q.read_status,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(
            parse_status_filter("pending, inProgress,").unwrap(),
            vec![QuestionStatus::Pending, QuestionStatus::InProgress]
        );
        assert!(parse_status_filter("").unwrap().is_empty());
        assert!(matches!(
            parse_status_filter("pending,bogus"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_create_dto_rejects_bad_admin_id() {
        let result = serde_json::from_value::<CreateQuestionDto>(serde_json::json!({
            "title": "T",
            "content": "B",
            "admin_id": "nope"
        }));
        assert!(result.is_err());
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::features::auth::model::Role;
use crate::shared::object_id::ObjectId;

/// Lifecycle status of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum QuestionStatus {
    Pending,
    InProgress,
    Answered,
    Closed,
    Deleted,
}

impl QuestionStatus {
    /// Statuses an admin still has to act on
    pub const OPEN: [QuestionStatus; 2] = [QuestionStatus::Pending, QuestionStatus::InProgress];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::Pending => "pending",
            QuestionStatus::InProgress => "inProgress",
            QuestionStatus::Answered => "answered",
            QuestionStatus::Closed => "closed",
            QuestionStatus::Deleted => "deleted",
        }
    }

    /// Whether an explicit status change from `self` to `next` is allowed.
    ///
    /// `Deleted` is never a target here; it is only reached through deletion.
    pub fn can_transition_to(self, next: QuestionStatus) -> bool {
        use QuestionStatus::*;

        if self == Deleted || next == Deleted {
            return false;
        }
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, InProgress)
                | (Pending, Answered)
                | (Pending, Closed)
                | (InProgress, Pending)
                | (InProgress, Answered)
                | (InProgress, Closed)
                | (Answered, InProgress)
                | (Answered, Closed)
                | (Closed, Pending)
        )
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(QuestionStatus::Pending),
            "inProgress" => Ok(QuestionStatus::InProgress),
            "answered" => Ok(QuestionStatus::Answered),
            "closed" => Ok(QuestionStatus::Closed),
            "deleted" => Ok(QuestionStatus::Deleted),
            other => Err(AppError::Validation(format!(
                "Unknown question status: {}",
                other
            ))),
        }
    }
}

/// Listing order by creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSort {
    #[default]
    Oldest,
    Newest,
}

/// In-question indicator state, independent of notification read flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReadStatus {
    /// The author has seen the latest answer
    pub user: bool,
    /// An admin has seen the question
    pub admin: bool,
    /// The author's bell indicator was cleared
    pub notification_bell: bool,
}

impl ReadStatus {
    /// State of a freshly asked question
    pub fn initial() -> Self {
        Self {
            user: true,
            admin: false,
            notification_bell: false,
        }
    }
}

/// One content revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EditEntry {
    pub content: String,
    pub edited_at: DateTime<Utc>,
    pub edited_by: Role,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub admin_id: Option<ObjectId>,
    pub title: String,
    pub content: String,
    pub status: QuestionStatus,
    pub answer: Option<String>,
    pub is_edited: bool,
    pub edit_history: Vec<EditEntry>,
    pub read_status: ReadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn new(
        user_id: ObjectId,
        admin_id: Option<ObjectId>,
        title: String,
        content: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            user_id,
            admin_id,
            title,
            content,
            status: QuestionStatus::Pending,
            answer: None,
            is_edited: false,
            edit_history: Vec::new(),
            read_status: ReadStatus::initial(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.status == QuestionStatus::Deleted
    }
}

/// A single mutation applied to a stored, non-deleted question
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionChange {
    Edit(EditEntry),
    Answer(String),
    /// Only applies while the question is still in `from`
    Status {
        from: QuestionStatus,
        to: QuestionStatus,
    },
    MarkViewed(Role),
    Delete,
}

impl QuestionChange {
    /// Whether the change may be applied to `question` as currently stored
    pub fn applies_to(&self, question: &Question) -> bool {
        if question.is_deleted() {
            return false;
        }
        match self {
            QuestionChange::Status { from, .. } => question.status == *from,
            _ => true,
        }
    }

    /// Apply the change in place.
    ///
    /// Mirrors the SQL each Postgres update runs; `MarkViewed` only bumps
    /// `updated_at` when the flag actually flips.
    pub fn apply(&self, question: &mut Question, now: DateTime<Utc>) {
        match self {
            QuestionChange::Edit(entry) => {
                question.content = entry.content.clone();
                question.is_edited = true;
                question.edit_history.push(entry.clone());
            }
            QuestionChange::Answer(answer) => {
                question.answer = Some(answer.clone());
                question.status = QuestionStatus::Answered;
                question.read_status.admin = true;
                question.read_status.user = false;
                question.read_status.notification_bell = false;
            }
            QuestionChange::Status { to, .. } => question.status = *to,
            QuestionChange::MarkViewed(role) => {
                let flag = match role {
                    Role::User => &mut question.read_status.user,
                    Role::Admin => &mut question.read_status.admin,
                };
                if *flag {
                    return;
                }
                *flag = true;
            }
            QuestionChange::Delete => question.status = QuestionStatus::Deleted,
        }
        question.updated_at = now;
    }
}

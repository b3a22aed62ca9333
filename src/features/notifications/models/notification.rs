use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::shared::object_id::ObjectId;

/// Fixed phrase carried by every `new_answer` notification
pub const ANSWERED_PHRASE: &str = "Your question has been answered";

/// Kind of question lifecycle event a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    NewQuestion,
    NewAnswer,
    StatusUpdate,
    Edited,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::NewQuestion => "new_question",
            NotificationType::NewAnswer => "new_answer",
            NotificationType::StatusUpdate => "status_update",
            NotificationType::Edited => "edited",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_question" => Ok(NotificationType::NewQuestion),
            "new_answer" => Ok(NotificationType::NewAnswer),
            "status_update" => Ok(NotificationType::StatusUpdate),
            "edited" => Ok(NotificationType::Edited),
            other => Err(AppError::Internal(format!(
                "Unknown notification type in storage: {}",
                other
            ))),
        }
    }
}

/// A persisted notification. Only `is_read` ever changes after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: ObjectId,
    pub receiver_id: ObjectId,
    pub sender_id: ObjectId,
    pub question_id: ObjectId,
    pub kind: NotificationType,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub redirect_url: String,
}

/// A notification waiting to be emitted.
///
/// The id is fixed when the event is recorded so that repeated delivery of the
/// same outbox entry produces a single notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub id: ObjectId,
    pub receiver_id: ObjectId,
    pub sender_id: ObjectId,
    pub question_id: ObjectId,
    pub kind: NotificationType,
    pub message: String,
    pub redirect_url: String,
}

impl NewNotification {
    fn build(
        kind: NotificationType,
        receiver_id: ObjectId,
        sender_id: ObjectId,
        question_id: &ObjectId,
        message: String,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            receiver_id,
            sender_id,
            question_id: question_id.clone(),
            kind,
            message,
            redirect_url: format!("/questions/{}", question_id),
        }
    }

    /// Tell the assigned admin that a question was asked
    pub fn new_question(
        admin_id: ObjectId,
        author_id: ObjectId,
        question_id: &ObjectId,
        title: &str,
    ) -> Self {
        Self::build(
            NotificationType::NewQuestion,
            admin_id,
            author_id,
            question_id,
            format!("New question: {}", title),
        )
    }

    /// Tell the author their question received an answer
    pub fn new_answer(
        author_id: ObjectId,
        answered_by: ObjectId,
        question_id: &ObjectId,
        title: &str,
    ) -> Self {
        Self::build(
            NotificationType::NewAnswer,
            author_id,
            answered_by,
            question_id,
            format!("{}: {}", ANSWERED_PHRASE, title),
        )
    }

    pub fn status_update(
        author_id: ObjectId,
        changed_by: ObjectId,
        question_id: &ObjectId,
        title: &str,
        status: &str,
    ) -> Self {
        Self::build(
            NotificationType::StatusUpdate,
            author_id,
            changed_by,
            question_id,
            format!("Your question \"{}\" is now {}", title, status),
        )
    }

    pub fn edited(
        receiver_id: ObjectId,
        editor_id: ObjectId,
        question_id: &ObjectId,
        title: &str,
    ) -> Self {
        Self::build(
            NotificationType::Edited,
            receiver_id,
            editor_id,
            question_id,
            format!("Question \"{}\" was edited", title),
        )
    }

    /// The stored record right after a successful emit
    pub fn into_notification(self, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: self.id,
            receiver_id: self.receiver_id,
            sender_id: self.sender_id,
            question_id: self.question_id,
            kind: self.kind,
            message: self.message,
            is_read: false,
            created_at,
            redirect_url: self.redirect_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_message_carries_phrase() {
        let qid = ObjectId::new();
        let n = NewNotification::new_answer(ObjectId::new(), ObjectId::new(), &qid, "Radiolucent lesion");
        assert_eq!(n.kind, NotificationType::NewAnswer);
        assert!(n.message.contains(ANSWERED_PHRASE));
        assert_eq!(n.redirect_url, format!("/questions/{}", qid));
    }

    #[test]
    fn test_new_question_goes_to_admin() {
        let admin = ObjectId::new();
        let author = ObjectId::new();
        let n = NewNotification::new_question(admin.clone(), author.clone(), &ObjectId::new(), "T");
        assert_eq!(n.receiver_id, admin);
        assert_eq!(n.sender_id, author);
        assert_eq!(n.message, "New question: T");
    }

    #[test]
    fn test_type_wire_names() {
        for kind in [
            NotificationType::NewQuestion,
            NotificationType::NewAnswer,
            NotificationType::StatusUpdate,
            NotificationType::Edited,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<NotificationType>().unwrap(), kind);
        }
    }
}

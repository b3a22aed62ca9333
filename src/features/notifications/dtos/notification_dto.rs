use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::auth::model::Role;
use crate::features::notifications::models::{Notification, NotificationType};
use crate::shared::object_id::ObjectId;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponseDto {
    pub id: ObjectId,
    pub receiver_id: ObjectId,
    pub sender_id: ObjectId,
    pub question_id: ObjectId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    /// Client route to open when the notification is clicked
    pub redirect_url: String,
}

impl From<Notification> for NotificationResponseDto {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            receiver_id: n.receiver_id,
            sender_id: n.sender_id,
            question_id: n.question_id,
            kind: n.kind,
            message: n.message,
            is_read: n.is_read,
            created_at: n.created_at,
            redirect_url: n.redirect_url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct UnreadCountQuery {
    /// `admin` counts unread new questions only; any other value counts everything. Defaults to `user`.
    pub role: Option<String>,
}

impl UnreadCountQuery {
    pub fn role(&self) -> Role {
        self.role
            .as_deref()
            .map(|r| Role::from_stored(r.trim()))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountResponseDto {
    pub unread_count: i64,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClearBellResponseDto {
    /// Questions whose bell flag changed
    pub modified_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(role: Option<&str>) -> UnreadCountQuery {
        UnreadCountQuery {
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_unread_count_role_is_lenient() {
        assert_eq!(query(None).role(), Role::User);
        assert_eq!(query(Some("admin")).role(), Role::Admin);
        assert_eq!(query(Some("ADMIN")).role(), Role::Admin);
        assert_eq!(query(Some("doctor")).role(), Role::User);
        assert_eq!(query(Some("")).role(), Role::User);
    }
}

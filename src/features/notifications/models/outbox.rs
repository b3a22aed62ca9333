use chrono::{DateTime, Utc};

use crate::features::notifications::models::NewNotification;
use crate::shared::object_id::ObjectId;

/// Delivery state of an outbox entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxStatus {
    Pending,
    Delivered,
    Failed,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxStatus::Pending => "pending",
            OutboxStatus::Delivered => "delivered",
            OutboxStatus::Failed => "failed",
        }
    }
}

/// A notification recorded alongside a question change, awaiting delivery
#[derive(Debug, Clone)]
pub struct OutboxEntry {
    pub id: ObjectId,
    pub notification: NewNotification,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OutboxEntry {
    pub fn new(notification: NewNotification) -> Self {
        Self {
            id: ObjectId::new(),
            notification,
            attempts: 0,
            last_error: None,
            created_at: Utc::now(),
        }
    }

    /// Status after one more failed attempt
    pub fn status_after_failure(attempts: i32, max_attempts: i32) -> OutboxStatus {
        if attempts + 1 >= max_attempts {
            OutboxStatus::Failed
        } else {
            OutboxStatus::Pending
        }
    }
}

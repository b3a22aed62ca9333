//! Notifications derived from question changes.
//!
//! Question changes write a pending entry to `notification_outbox` in the same
//! transaction as the change. `OutboxProcessor` delivers pending entries into
//! `notifications`, retrying failures up to `NOTIFICATION_MAX_ATTEMPTS` times.
//! Delivery is idempotent on the notification id.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users/{user_id}/notifications` | List, newest first |
//! | GET | `/api/users/{user_id}/notifications/unread-count` | Unread count (`?role=user\|admin`) |
//! | POST | `/api/users/{user_id}/notifications/clear-bell` | Clear bell flags |
//! | PATCH | `/api/notifications/{id}/read` | Mark read |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod workers;

pub use services::NotificationDispatcher;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::notifications::handlers;
use crate::features::notifications::services::NotificationDispatcher;

/// Notification routes (authentication required)
pub fn routes(service: Arc<NotificationDispatcher>) -> Router {
    Router::new()
        .route(
            "/api/users/{user_id}/notifications",
            get(handlers::list_notifications),
        )
        .route(
            "/api/users/{user_id}/notifications/unread-count",
            get(handlers::get_unread_count),
        )
        .route(
            "/api/users/{user_id}/notifications/clear-bell",
            post(handlers::clear_bell),
        )
        .route(
            "/api/notifications/{id}/read",
            patch(handlers::mark_notification_read),
        )
        .with_state(service)
}

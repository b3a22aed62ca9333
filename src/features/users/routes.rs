use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::features::users::handlers;
use crate::features::users::services::UserService;

/// Account administration routes (admin role required on every handler)
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/admin/users", get(handlers::list_users))
        .route(
            "/api/admin/users/{id}/approve",
            post(handlers::approve_user),
        )
        .route("/api/admin/users/{id}/package", put(handlers::set_package))
        .route("/api/admin/users/{id}", delete(handlers::delete_user))
        .with_state(service)
}

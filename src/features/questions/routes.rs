use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::features::questions::handlers;
use crate::features::questions::services::QuestionService;

/// Question routes (authentication required)
pub fn routes(service: Arc<QuestionService>) -> Router {
    Router::new()
        .route(
            "/api/questions",
            get(handlers::list_questions).post(handlers::create_question),
        )
        .route(
            "/api/questions/pending",
            get(handlers::list_pending_questions),
        )
        .route(
            "/api/questions/{id}",
            get(handlers::get_question).delete(handlers::delete_question),
        )
        .route("/api/questions/{id}/content", put(handlers::edit_question))
        .route("/api/questions/{id}/answer", post(handlers::answer_question))
        .route(
            "/api/questions/{id}/status",
            patch(handlers::update_question_status),
        )
        .route(
            "/api/users/{user_id}/questions",
            get(handlers::list_user_questions),
        )
        .with_state(service)
}

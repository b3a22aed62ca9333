use std::sync::Arc;

use axum::{extract::Request, middleware::Next, Router};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use tokio::sync::Notify;

use crate::core::config::NotificationConfig;
use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::notifications::workers::{BatchReport, OutboxProcessor};
use crate::features::notifications::NotificationDispatcher;
use crate::features::questions::dtos::CreateQuestionDto;
use crate::features::questions::QuestionService;
use crate::shared::memory_store::MemoryStore;
use crate::shared::object_id::ObjectId;

pub fn create_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: ObjectId::new(),
        role: Role::User,
    }
}

pub fn create_admin() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: ObjectId::new(),
        role: Role::Admin,
    }
}

/// Random question, optionally addressed to an admin
pub fn fake_question(admin_id: Option<ObjectId>) -> CreateQuestionDto {
    CreateQuestionDto {
        title: Sentence(3..8).fake(),
        content: Paragraph(1..3).fake(),
        admin_id,
    }
}

/// Attach `user` to every request, standing in for the JWT middleware
pub fn with_auth(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}

/// Services wired to one in-memory store, as `main` wires them to Postgres
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub questions: Arc<QuestionService>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub worker: OutboxProcessor,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let wake = Arc::new(Notify::new());
        let questions = Arc::new(QuestionService::new(store.clone(), wake.clone()));
        let dispatcher = Arc::new(NotificationDispatcher::new(store.clone(), store.clone()));
        let worker = OutboxProcessor::new(
            store.clone(),
            dispatcher.clone(),
            wake,
            NotificationConfig::default(),
        );

        Self {
            store,
            questions,
            dispatcher,
            worker,
        }
    }

    /// Drain the outbox once
    pub async fn deliver(&self) -> BatchReport {
        self.worker.process_batch().await.unwrap()
    }
}

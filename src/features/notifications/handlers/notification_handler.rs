use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::auth::guards::ensure_self_or_admin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::notifications::dtos::{
    ClearBellResponseDto, NotificationResponseDto, UnreadCountQuery, UnreadCountResponseDto,
};
use crate::features::notifications::services::NotificationDispatcher;
use crate::shared::object_id::ObjectId;
use crate::shared::types::{ApiResponse, Meta};

/// List a user's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/notifications",
    params(
        ("user_id" = String, Path, description = "Receiver ID (24-char hex)")
    ),
    responses(
        (status = 200, description = "Notifications", body = ApiResponse<Vec<NotificationResponseDto>>),
        (status = 400, description = "Invalid user ID"),
        (status = 403, description = "Forbidden")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_notifications(
    user: AuthenticatedUser,
    State(service): State<Arc<NotificationDispatcher>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<NotificationResponseDto>>>> {
    let receiver = ObjectId::parse_param(&user_id, "user")?;
    ensure_self_or_admin(&user, &receiver)?;

    let notifications = service.list_for_receiver(&receiver).await?;
    let total = notifications.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(notifications),
        None,
        Some(Meta::total(total)),
    )))
}

/// Count unread notifications
///
/// With `role=admin` only unread `new_question` notifications are counted.
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/notifications/unread-count",
    params(
        ("user_id" = String, Path, description = "Receiver ID (24-char hex)"),
        UnreadCountQuery
    ),
    responses(
        (status = 200, description = "Unread count", body = ApiResponse<UnreadCountResponseDto>),
        (status = 400, description = "Invalid user ID"),
        (status = 403, description = "Forbidden")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_unread_count(
    user: AuthenticatedUser,
    State(service): State<Arc<NotificationDispatcher>>,
    Path(user_id): Path<String>,
    AppQuery(params): AppQuery<UnreadCountQuery>,
) -> Result<Json<ApiResponse<UnreadCountResponseDto>>> {
    let receiver = ObjectId::parse_param(&user_id, "user")?;
    ensure_self_or_admin(&user, &receiver)?;

    let role = params.role();
    let unread_count = service.unread_count(&receiver, role).await?;
    Ok(Json(ApiResponse::success(
        Some(UnreadCountResponseDto { unread_count, role }),
        None,
        None,
    )))
}

/// Clear the bell indicator on all of a user's questions
#[utoipa::path(
    post,
    path = "/api/users/{user_id}/notifications/clear-bell",
    params(
        ("user_id" = String, Path, description = "Author ID (24-char hex)")
    ),
    responses(
        (status = 200, description = "Bell cleared", body = ApiResponse<ClearBellResponseDto>),
        (status = 400, description = "Invalid user ID"),
        (status = 403, description = "Forbidden")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn clear_bell(
    user: AuthenticatedUser,
    State(service): State<Arc<NotificationDispatcher>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<ClearBellResponseDto>>> {
    let receiver = ObjectId::parse_param(&user_id, "user")?;
    ensure_self_or_admin(&user, &receiver)?;

    let modified_count = service.clear_bell(&receiver).await?;
    Ok(Json(ApiResponse::success(
        Some(ClearBellResponseDto { modified_count }),
        None,
        None,
    )))
}

/// Mark a notification as read
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = String, Path, description = "Notification ID (24-char hex)")
    ),
    responses(
        (status = 200, description = "Notification marked as read"),
        (status = 400, description = "Invalid notification ID"),
        (status = 404, description = "Notification not found or already read")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_notification_read(
    _user: AuthenticatedUser,
    State(service): State<Arc<NotificationDispatcher>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let id = ObjectId::parse_param(&id, "notification")?;
    service.mark_read(&id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Notification marked as read".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::routes;
    use crate::features::questions::dtos::AnswerDto;
    use crate::shared::test_helpers::{
        create_admin, create_user, fake_question, with_auth, TestContext,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    fn server(ctx: &TestContext, user: AuthenticatedUser) -> TestServer {
        let app = with_auth(routes::routes(ctx.dispatcher.clone()), user);
        TestServer::new(app).unwrap()
    }

    async fn answered_question(ctx: &TestContext, user: &AuthenticatedUser, admin_id: Option<ObjectId>) {
        let admin = create_admin();
        let q = ctx
            .questions
            .create(&user.user_id, fake_question(admin_id))
            .await
            .unwrap();
        ctx.questions
            .answer(&q.id, &admin, AnswerDto { answer: "Cyst".to_string() })
            .await
            .unwrap();
        ctx.deliver().await;
    }

    #[tokio::test]
    async fn test_list_and_mark_read() {
        let ctx = TestContext::new();
        let user = create_user();
        answered_question(&ctx, &user, None).await;
        let server = server(&ctx, user.clone());

        let body: Value = server
            .get(&format!("/api/users/{}/notifications", user.user_id))
            .await
            .json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["type"], "new_answer");
        assert_eq!(body["data"][0]["is_read"], false);
        let id = body["data"][0]["id"].as_str().unwrap().to_string();

        let body: Value = server
            .get(&format!("/api/users/{}/notifications/unread-count", user.user_id))
            .await
            .json();
        assert_eq!(body["data"]["unread_count"], 1);
        assert_eq!(body["data"]["role"], "user");

        server
            .patch(&format!("/api/notifications/{}/read", id))
            .await
            .assert_status_ok();
        server
            .patch(&format!("/api/notifications/{}/read", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let body: Value = server
            .get(&format!("/api/users/{}/notifications/unread-count", user.user_id))
            .await
            .json();
        assert_eq!(body["data"]["unread_count"], 0);
    }

    #[tokio::test]
    async fn test_admin_count_only_includes_new_questions() {
        let ctx = TestContext::new();
        let admin = create_admin();
        let user = create_user();
        answered_question(&ctx, &user, Some(admin.user_id.clone())).await;
        let server = server(&ctx, admin.clone());

        let body: Value = server
            .get(&format!("/api/users/{}/notifications/unread-count", admin.user_id))
            .add_query_param("role", "admin")
            .await
            .json();
        assert_eq!(body["data"]["unread_count"], 1);

        // Anything but admin counts every unread notification
        for role in ["doctor", "", "user"] {
            let response = server
                .get(&format!("/api/users/{}/notifications/unread-count", admin.user_id))
                .add_query_param("role", role)
                .await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["data"]["unread_count"], 1);
            assert_eq!(body["data"]["role"], "user");
        }
    }

    #[tokio::test]
    async fn test_unknown_role_counts_as_user() {
        let ctx = TestContext::new();
        let admin = create_admin();
        let user = create_user();
        answered_question(&ctx, &user, Some(admin.user_id.clone())).await;
        let server = server(&ctx, user.clone());

        let body: Value = server
            .get(&format!("/api/users/{}/notifications/unread-count", user.user_id))
            .add_query_param("role", "doctor")
            .await
            .json();
        assert_eq!(body["data"]["unread_count"], 1);
        assert_eq!(body["data"]["role"], "user");
    }

    #[tokio::test]
    async fn test_clear_bell_reports_modified_count() {
        let ctx = TestContext::new();
        let user = create_user();
        answered_question(&ctx, &user, None).await;
        answered_question(&ctx, &user, None).await;
        let server = server(&ctx, user.clone());

        let path = format!("/api/users/{}/notifications/clear-bell", user.user_id);
        let body: Value = server.post(&path).await.json();
        assert_eq!(body["data"]["modified_count"], 2);

        let body: Value = server.post(&path).await.json();
        assert_eq!(body["data"]["modified_count"], 0);
    }

    #[tokio::test]
    async fn test_foreign_notifications_are_forbidden() {
        let ctx = TestContext::new();
        let server = server(&ctx, create_user());

        server
            .get(&format!("/api/users/{}/notifications", ObjectId::new()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .get("/api/users/xyz/notifications")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

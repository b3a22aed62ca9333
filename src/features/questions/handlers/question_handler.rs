use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::ensure_self_or_admin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::questions::dtos::{
    AnswerDto, CreateQuestionDto, EditContentDto, QuestionListQuery, QuestionResponseDto,
    UpdateStatusDto,
};
use crate::features::questions::repositories::QuestionQuery;
use crate::features::questions::services::QuestionService;
use crate::shared::object_id::ObjectId;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Ask a question
///
/// When `admin_id` is given that admin receives a `new_question` notification.
#[utoipa::path(
    post,
    path = "/api/questions",
    request_body = CreateQuestionDto,
    responses(
        (status = 201, description = "Question created", body = ApiResponse<QuestionResponseDto>),
        (status = 400, description = "Title and content are required"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "questions",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_question(
    user: AuthenticatedUser,
    State(service): State<Arc<QuestionService>>,
    AppJson(dto): AppJson<CreateQuestionDto>,
) -> Result<(StatusCode, Json<ApiResponse<QuestionResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let question = service.create(&user.user_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(question), None, None)),
    ))
}

/// List questions
///
/// Filter by status set, order by creation time, and paginate when `page` or
/// `page_size` is present.
#[utoipa::path(
    get,
    path = "/api/questions",
    params(QuestionListQuery),
    responses(
        (status = 200, description = "List of questions", body = ApiResponse<Vec<QuestionResponseDto>>),
        (status = 400, description = "Unknown status or sort value"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "questions",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_questions(
    _user: AuthenticatedUser,
    State(service): State<Arc<QuestionService>>,
    AppQuery(params): AppQuery<QuestionListQuery>,
) -> Result<Json<ApiResponse<Vec<QuestionResponseDto>>>> {
    let pagination = params.pagination();
    let page = pagination.is_requested().then(|| pagination.to_page());

    let query = QuestionQuery {
        author: None,
        statuses: params.statuses()?,
        sort: params.sort.unwrap_or_default(),
        page,
    };
    let (items, total) = service.list(&query).await?;

    let meta = match page {
        Some(page) => Meta::paged(total, page),
        None => Meta::total(total),
    };
    Ok(Json(ApiResponse::success(Some(items), None, Some(meta))))
}

/// List questions waiting for an admin (pending or in progress)
#[utoipa::path(
    get,
    path = "/api/questions/pending",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Pending questions", body = ApiResponse<Vec<QuestionResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "questions",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_pending_questions(
    _user: AuthenticatedUser,
    State(service): State<Arc<QuestionService>>,
    AppQuery(params): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<QuestionResponseDto>>>> {
    let page = params.is_requested().then(|| params.to_page());
    let (items, total) = service.pending_queue(page).await?;

    let meta = match page {
        Some(page) => Meta::paged(total, page),
        None => Meta::total(total),
    };
    Ok(Json(ApiResponse::success(Some(items), None, Some(meta))))
}

/// Get a question
///
/// Viewing marks the question as seen for the caller's role.
#[utoipa::path(
    get,
    path = "/api/questions/{id}",
    params(
        ("id" = String, Path, description = "Question ID (24-char hex)")
    ),
    responses(
        (status = 200, description = "Question detail", body = ApiResponse<QuestionResponseDto>),
        (status = 400, description = "Invalid question ID"),
        (status = 404, description = "Question not found")
    ),
    tag = "questions",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_question(
    user: AuthenticatedUser,
    State(service): State<Arc<QuestionService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<QuestionResponseDto>>> {
    let id = ObjectId::parse_param(&id, "question")?;
    let question = service.get(&id, &user).await?;
    Ok(Json(ApiResponse::success(Some(question), None, None)))
}

/// Edit question content
#[utoipa::path(
    put,
    path = "/api/questions/{id}/content",
    params(
        ("id" = String, Path, description = "Question ID (24-char hex)")
    ),
    request_body = EditContentDto,
    responses(
        (status = 200, description = "Question edited", body = ApiResponse<QuestionResponseDto>),
        (status = 400, description = "Content is required or invalid ID"),
        (status = 404, description = "Question not found")
    ),
    tag = "questions",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn edit_question(
    user: AuthenticatedUser,
    State(service): State<Arc<QuestionService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<EditContentDto>,
) -> Result<Json<ApiResponse<QuestionResponseDto>>> {
    let id = ObjectId::parse_param(&id, "question")?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let question = service.edit(&id, &user, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(question),
        Some("Question updated successfully".to_string()),
        None,
    )))
}

/// Answer a question
#[utoipa::path(
    post,
    path = "/api/questions/{id}/answer",
    params(
        ("id" = String, Path, description = "Question ID (24-char hex)")
    ),
    request_body = AnswerDto,
    responses(
        (status = 200, description = "Question answered", body = ApiResponse<QuestionResponseDto>),
        (status = 400, description = "Answer is required or invalid ID"),
        (status = 404, description = "Question not found")
    ),
    tag = "questions",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn answer_question(
    user: AuthenticatedUser,
    State(service): State<Arc<QuestionService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<AnswerDto>,
) -> Result<Json<ApiResponse<QuestionResponseDto>>> {
    let id = ObjectId::parse_param(&id, "question")?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let question = service.answer(&id, &user, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(question),
        Some("Question answered".to_string()),
        None,
    )))
}

/// Change question status
#[utoipa::path(
    patch,
    path = "/api/questions/{id}/status",
    params(
        ("id" = String, Path, description = "Question ID (24-char hex)")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<QuestionResponseDto>),
        (status = 400, description = "Unknown status or transition not allowed"),
        (status = 404, description = "Question not found")
    ),
    tag = "questions",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_question_status(
    user: AuthenticatedUser,
    State(service): State<Arc<QuestionService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<Json<ApiResponse<QuestionResponseDto>>> {
    let id = ObjectId::parse_param(&id, "question")?;
    let question = service.set_status(&id, &user, dto).await?;
    Ok(Json(ApiResponse::success(Some(question), None, None)))
}

/// Delete a question
#[utoipa::path(
    delete,
    path = "/api/questions/{id}",
    params(
        ("id" = String, Path, description = "Question ID (24-char hex)")
    ),
    responses(
        (status = 200, description = "Question deleted"),
        (status = 400, description = "Invalid question ID"),
        (status = 404, description = "Question not found")
    ),
    tag = "questions",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_question(
    _user: AuthenticatedUser,
    State(service): State<Arc<QuestionService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let id = ObjectId::parse_param(&id, "question")?;
    service.delete(&id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Question deleted successfully".to_string()),
        None,
    )))
}

/// A user's question history, newest first
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/questions",
    params(
        ("user_id" = String, Path, description = "Author ID (24-char hex)"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Paginated question history", body = ApiResponse<Vec<QuestionResponseDto>>),
        (status = 400, description = "Invalid user ID"),
        (status = 403, description = "Forbidden")
    ),
    tag = "questions",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_user_questions(
    user: AuthenticatedUser,
    State(service): State<Arc<QuestionService>>,
    Path(user_id): Path<String>,
    AppQuery(params): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<QuestionResponseDto>>>> {
    let author = ObjectId::parse_param(&user_id, "user")?;
    ensure_self_or_admin(&user, &author)?;

    let page = params.to_page();
    let (items, total) = service.user_history(&author, page).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta::paged(total, page)),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::questions::routes;
    use crate::shared::test_helpers::{create_admin, create_user, with_auth, TestContext};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server(ctx: &TestContext, user: AuthenticatedUser) -> TestServer {
        let app = with_auth(routes::routes(ctx.questions.clone()), user);
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_question() {
        let ctx = TestContext::new();
        let user = create_user();
        let server = server(&ctx, user.clone());

        let response = server
            .post("/api/questions")
            .json(&json!({ "title": "Swelling", "content": "Left mandible, 3 months" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "pending");
        assert_eq!(body["data"]["read_status"]["user"], true);
        assert_eq!(body["data"]["read_status"]["admin"], false);
        assert_eq!(body["data"]["read_status"]["notification_bell"], false);
        assert_eq!(body["data"]["user_id"], user.user_id.as_str());

        let id = body["data"]["id"].as_str().unwrap().to_string();
        let response = server.get(&format!("/api/questions/{}", id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["title"], "Swelling");
    }

    #[tokio::test]
    async fn test_create_with_empty_title_is_400() {
        let ctx = TestContext::new();
        let server = server(&ctx, create_user());

        let response = server
            .post("/api/questions")
            .json(&json!({ "title": "", "content": "B" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(ctx.store.all_questions().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_id_is_400() {
        let ctx = TestContext::new();
        let server = server(&ctx, create_user());

        let response = server.get("/api/questions/not-an-id").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid question ID");
    }

    #[tokio::test]
    async fn test_unknown_question_is_404() {
        let ctx = TestContext::new();
        let server = server(&ctx, create_admin());

        let response = server
            .post(&format!("/api/questions/{}/answer", ObjectId::new()))
            .json(&json!({ "answer": "A" }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bogus_status_is_400() {
        let ctx = TestContext::new();
        let user = create_user();
        let q = ctx
            .questions
            .create(
                &user.user_id,
                CreateQuestionDto {
                    title: "T".to_string(),
                    content: "B".to_string(),
                    admin_id: None,
                },
            )
            .await
            .unwrap();
        let server = server(&ctx, create_admin());

        let response = server
            .patch(&format!("/api/questions/{}/status", q.id))
            .json(&json!({ "status": "bogus" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .patch(&format!("/api/questions/{}/status", q.id))
            .json(&json!({ "status": "inProgress" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["status"], "inProgress");
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let ctx = TestContext::new();
        let user = create_user();
        let server = server(&ctx, user.clone());

        for i in 0..3 {
            server
                .post("/api/questions")
                .json(&json!({ "title": format!("Q{}", i), "content": "B" }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let body: Value = server
            .get("/api/questions")
            .add_query_param("status", "pending,inProgress")
            .add_query_param("sort", "newest")
            .add_query_param("page", "1")
            .add_query_param("page_size", "2")
            .await
            .json();
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["title"], "Q2");
        assert_eq!(body["meta"]["total"], 3);
        assert_eq!(body["meta"]["page_size"], 2);

        let response = server
            .get("/api/questions")
            .add_query_param("status", "archived")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Garbage pagination falls back to the defaults
        let body: Value = server
            .get(&format!("/api/users/{}/questions", user.user_id))
            .add_query_param("page", "-4")
            .add_query_param("page_size", "abc")
            .await
            .json();
        assert_eq!(body["meta"]["page"], 1);
        assert_eq!(body["meta"]["page_size"], 10);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let ctx = TestContext::new();
        let user = create_user();
        let server = server(&ctx, user.clone());

        server
            .post("/api/questions")
            .json(&json!({ "title": "T", "content": "B" }))
            .await
            .assert_status(StatusCode::CREATED);

        for path in [
            "/api/questions".to_string(),
            "/api/questions/pending".to_string(),
            format!("/api/users/{}/questions", user.user_id),
        ] {
            let response = server
                .get(&path)
                .add_query_param("page", "9223372036854775807")
                .await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert!(body["data"].as_array().unwrap().is_empty());
            assert_eq!(body["meta"]["total"], 1);
        }
    }

    #[tokio::test]
    async fn test_other_users_history_is_forbidden() {
        let ctx = TestContext::new();
        let server = server(&ctx, create_user());

        let response = server
            .get(&format!("/api/users/{}/questions", ObjectId::new()))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_404() {
        let ctx = TestContext::new();
        let server = server(&ctx, create_user());

        let body: Value = server
            .post("/api/questions")
            .json(&json!({ "title": "T", "content": "B" }))
            .await
            .json();
        let id = body["data"]["id"].as_str().unwrap().to_string();

        server
            .delete(&format!("/api/questions/{}", id))
            .await
            .assert_status_ok();
        server
            .get(&format!("/api/questions/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete(&format!("/api/questions/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_failure_is_generic_500() {
        let ctx = TestContext::new();
        ctx.store.fail_questions(true);
        let server = server(&ctx, create_user());

        let response = server.get("/api/questions").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], "Database error occurred");
    }
}

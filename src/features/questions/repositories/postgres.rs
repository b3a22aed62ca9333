use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgConnection, PgPool};

use crate::core::database::{with_deadline, StoreTimeouts};
use crate::core::error::{AppError, Result};
use crate::features::auth::model::Role;
use crate::features::notifications::models::NewNotification;
use crate::features::notifications::repositories::enqueue_in_tx;
use crate::features::questions::models::{
    EditEntry, Question, QuestionChange, QuestionSort, ReadStatus,
};
use crate::features::questions::repositories::{QuestionQuery, QuestionRepository};
use crate::shared::object_id::ObjectId;

const QUESTION_COLUMNS: &str = "id, user_id, admin_id, title, content, status, answer, is_edited, \
     edit_history, read_user, read_admin, read_notification_bell, created_at, updated_at";

#[derive(Debug, FromRow)]
struct QuestionRow {
    id: ObjectId,
    user_id: ObjectId,
    admin_id: Option<ObjectId>,
    title: String,
    content: String,
    status: String,
    answer: Option<String>,
    is_edited: bool,
    edit_history: Json<Vec<EditEntry>>,
    read_user: bool,
    read_admin: bool,
    read_notification_bell: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = AppError;

    fn try_from(row: QuestionRow) -> Result<Self> {
        let status = row.status.parse().map_err(|_| {
            AppError::Internal(format!(
                "Question {} has unknown stored status {:?}",
                row.id, row.status
            ))
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            admin_id: row.admin_id,
            title: row.title,
            content: row.content,
            status,
            answer: row.answer,
            is_edited: row.is_edited,
            edit_history: row.edit_history.0,
            read_status: ReadStatus {
                user: row.read_user,
                admin: row.read_admin,
                notification_bell: row.read_notification_bell,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Run a single question change on an open connection
async fn apply_change(
    conn: &mut PgConnection,
    id: &ObjectId,
    change: &QuestionChange,
    now: DateTime<Utc>,
) -> std::result::Result<Option<QuestionRow>, sqlx::Error> {
    let set_clause = match change {
        QuestionChange::Edit(_) => {
            "content = $2, is_edited = TRUE, edit_history = edit_history || $3::JSONB, updated_at = $4"
        }
        QuestionChange::Answer(_) => {
            "answer = $2, status = 'answered', read_admin = TRUE, read_user = FALSE, \
             read_notification_bell = FALSE, updated_at = $3"
        }
        QuestionChange::Status { .. } => "status = $2, updated_at = $3",
        QuestionChange::MarkViewed(Role::User) => {
            "updated_at = CASE WHEN read_user THEN updated_at ELSE $2 END, read_user = TRUE"
        }
        QuestionChange::MarkViewed(Role::Admin) => {
            "updated_at = CASE WHEN read_admin THEN updated_at ELSE $2 END, read_admin = TRUE"
        }
        QuestionChange::Delete => "status = 'deleted', updated_at = $2",
    };

    // The transition is checked against the status the caller saw
    let guard = match change {
        QuestionChange::Status { .. } => " AND status = $4",
        _ => "",
    };

    let sql = format!(
        "UPDATE questions SET {} WHERE id = $1 AND status <> 'deleted'{} RETURNING {}",
        set_clause, guard, QUESTION_COLUMNS
    );

    let query = sqlx::query_as::<_, QuestionRow>(&sql).bind(id);
    let query = match change {
        QuestionChange::Edit(entry) => query
            .bind(&entry.content)
            .bind(Json(vec![entry.clone()]))
            .bind(now),
        QuestionChange::Answer(answer) => query.bind(answer).bind(now),
        QuestionChange::Status { from, to } => {
            query.bind(to.as_str()).bind(now).bind(from.as_str())
        }
        QuestionChange::MarkViewed(_) | QuestionChange::Delete => query.bind(now),
    };

    query.fetch_optional(conn).await
}

/// Question storage in Postgres
pub struct PgQuestionRepository {
    pool: PgPool,
    timeouts: StoreTimeouts,
}

impl PgQuestionRepository {
    pub fn new(pool: PgPool, timeouts: StoreTimeouts) -> Self {
        Self { pool, timeouts }
    }
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    async fn insert(
        &self,
        question: &Question,
        notification: Option<&NewNotification>,
    ) -> Result<()> {
        let pool = &self.pool;

        with_deadline(self.timeouts.query, "create question", async {
            let mut tx = pool.begin().await?;

            sqlx::query(
                r#"
                INSERT INTO questions
                    (id, user_id, admin_id, title, content, status, answer, is_edited, edit_history,
                     read_user, read_admin, read_notification_bell, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
            )
            .bind(&question.id)
            .bind(&question.user_id)
            .bind(&question.admin_id)
            .bind(&question.title)
            .bind(&question.content)
            .bind(question.status.as_str())
            .bind(&question.answer)
            .bind(question.is_edited)
            .bind(Json(&question.edit_history))
            .bind(question.read_status.user)
            .bind(question.read_status.admin)
            .bind(question.read_status.notification_bell)
            .bind(question.created_at)
            .bind(question.updated_at)
            .execute(&mut *tx)
            .await?;

            if let Some(notification) = notification {
                enqueue_in_tx(&mut tx, notification).await?;
            }

            tx.commit().await
        })
        .await
    }

    async fn find(&self, id: &ObjectId) -> Result<Option<Question>> {
        let sql = format!(
            "SELECT {} FROM questions WHERE id = $1 AND status <> 'deleted'",
            QUESTION_COLUMNS
        );

        let row = with_deadline(
            self.timeouts.query,
            "find question",
            sqlx::query_as::<_, QuestionRow>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?;

        row.map(Question::try_from).transpose()
    }

    async fn list(&self, query: &QuestionQuery) -> Result<(Vec<Question>, i64)> {
        const FILTER: &str = r#"
            WHERE status <> 'deleted'
              AND ($1::TEXT IS NULL OR user_id = $1::TEXT)
              AND (CARDINALITY($2::TEXT[]) = 0 OR status = ANY($2::TEXT[]))
        "#;

        let direction = match query.sort {
            QuestionSort::Oldest => "ASC",
            QuestionSort::Newest => "DESC",
        };
        let select_sql = format!(
            "SELECT {} FROM questions {} ORDER BY created_at {dir}, id {dir} LIMIT $3 OFFSET $4",
            QUESTION_COLUMNS,
            FILTER,
            dir = direction
        );
        let count_sql = format!("SELECT COUNT(*) FROM questions {}", FILTER);

        let statuses: Vec<&str> = query.statuses.iter().map(|s| s.as_str()).collect();
        let limit = query.page.map(|p| p.limit());
        let offset = query.page.map(|p| p.offset()).unwrap_or(0);
        let pool = &self.pool;

        let (rows, total) = with_deadline(self.timeouts.list, "list questions", async {
            let rows = sqlx::query_as::<_, QuestionRow>(&select_sql)
                .bind(&query.author)
                .bind(&statuses)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?;

            let total = sqlx::query_scalar::<_, i64>(&count_sql)
                .bind(&query.author)
                .bind(&statuses)
                .fetch_one(pool)
                .await?;

            Ok::<_, sqlx::Error>((rows, total))
        })
        .await?;

        let questions = rows
            .into_iter()
            .map(Question::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok((questions, total))
    }

    async fn update(
        &self,
        id: &ObjectId,
        change: &QuestionChange,
        notification: Option<&NewNotification>,
    ) -> Result<Option<Question>> {
        let pool = &self.pool;

        let row = with_deadline(self.timeouts.query, "update question", async {
            let mut tx = pool.begin().await?;

            let row = apply_change(&mut tx, id, change, Utc::now()).await?;

            // Nothing changed, so nothing to announce
            if row.is_none() {
                tx.rollback().await?;
                return Ok(None);
            }

            if let Some(notification) = notification {
                enqueue_in_tx(&mut tx, notification).await?;
            }

            tx.commit().await?;
            Ok::<_, sqlx::Error>(row)
        })
        .await?;

        row.map(Question::try_from).transpose()
    }

    async fn clear_bell(&self, author: &ObjectId) -> Result<u64> {
        let result = with_deadline(
            self.timeouts.list,
            "clear notification bell",
            sqlx::query(
                r#"
                UPDATE questions
                SET read_notification_bell = TRUE, updated_at = NOW()
                WHERE user_id = $1
                  AND status <> 'deleted'
                  AND read_notification_bell = FALSE
                "#,
            )
            .bind(author)
            .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }
}

/// Task Routes
///
/// CRUD over the authenticated user's tasks. Every handler receives the
/// `Principal` injected by the JWT middleware; tasks are always scoped to
/// that principal.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, DatabaseError, ValidationError};
use crate::store::Principal;

const MAX_TITLE_LENGTH: usize = 50;
const MAX_DESCRIPTION_LENGTH: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    InProgress,
    Completed,
}

impl TaskStatus {
    fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::InProgress
    }
}

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

#[derive(Deserialize)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
}

#[derive(Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "title".to_string(),
        )));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "title".to_string(),
            MAX_TITLE_LENGTH,
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), AppError> {
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "description".to_string(),
            MAX_DESCRIPTION_LENGTH,
        )));
    }
    Ok(())
}

/// POST /api/v1/tasks
///
/// Create a task for the current user.
///
/// # Errors
/// - 400: Validation errors (empty/overlong title, overlong description)
/// - 401: Missing or invalid access token (middleware)
pub async fn create_task(
    form: web::Json<CreateTaskRequest>,
    principal: web::ReqData<Principal>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    validate_title(&form.title)?;
    validate_description(&form.description)?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO tasks (user_id, title, description, status)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(principal.id)
    .bind(&form.title)
    .bind(&form.description)
    .bind(form.status.as_str())
    .fetch_one(pool.get_ref())
    .await?;

    tracing::info!(user_id = principal.id, task_id = id, "Task created");

    Ok(HttpResponse::Created().json(TaskResponse {
        id,
        title: form.title.clone(),
        description: form.description.clone(),
        status: form.status.as_str().to_string(),
    }))
}

/// GET /api/v1/tasks?status=in_progress
///
/// List the current user's tasks, optionally filtered by status.
pub async fn list_tasks(
    query: web::Query<TaskListQuery>,
    principal: web::ReqData<Principal>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let status = query.status.map(|s| s.as_str());

    let rows = sqlx::query_as::<_, (i64, String, String, String)>(
        r#"
        SELECT id, title, description, status
        FROM tasks
        WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
        ORDER BY id
        "#,
    )
    .bind(principal.id)
    .bind(status)
    .fetch_all(pool.get_ref())
    .await?;

    let tasks = rows
        .into_iter()
        .map(|(id, title, description, status)| TaskResponse {
            id,
            title,
            description,
            status,
        })
        .collect();

    Ok(HttpResponse::Ok().json(TaskListResponse { tasks }))
}

/// PUT /api/v1/tasks/{id}
///
/// Update any subset of title, description, and status on one of the
/// current user's tasks.
///
/// # Errors
/// - 400: Validation errors
/// - 404: Task does not exist or belongs to another user
pub async fn update_task(
    path: web::Path<i64>,
    form: web::Json<UpdateTaskRequest>,
    principal: web::ReqData<Principal>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let task_id = path.into_inner();

    if let Some(title) = &form.title {
        validate_title(title)?;
    }
    if let Some(description) = &form.description {
        validate_description(description)?;
    }

    let row = sqlx::query_as::<_, (i64, String, String, String)>(
        r#"
        UPDATE tasks
        SET title = COALESCE($1, title),
            description = COALESCE($2, description),
            status = COALESCE($3, status)
        WHERE id = $4 AND user_id = $5
        RETURNING id, title, description, status
        "#,
    )
    .bind(form.title.as_deref())
    .bind(form.description.as_deref())
    .bind(form.status.map(|s| s.as_str()))
    .bind(task_id)
    .bind(principal.id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| {
        AppError::Database(DatabaseError::NotFound(format!(
            "Task with id: {} not found",
            task_id
        )))
    })?;

    let (id, title, description, status) = row;

    tracing::info!(user_id = principal.id, task_id = id, "Task updated");

    Ok(HttpResponse::Ok().json(TaskResponse {
        id,
        title,
        description,
        status,
    }))
}

/// DELETE /api/v1/tasks/{id}
///
/// # Errors
/// - 404: Task does not exist or belongs to another user
pub async fn delete_task(
    path: web::Path<i64>,
    principal: web::ReqData<Principal>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let task_id = path.into_inner();

    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(principal.id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Database(DatabaseError::NotFound(format!(
            "Task with id: {} not found",
            task_id
        ))));
    }

    tracing::info!(user_id = principal.id, task_id = task_id, "Task deleted");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Task with id: {} successfully deleted", task_id)
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            "in_progress"
        );
        assert_eq!(
            serde_json::to_value(TaskStatus::Completed).unwrap(),
            "completed"
        );
    }

    #[test]
    fn create_request_defaults_to_in_progress() {
        let request: CreateTaskRequest =
            serde_json::from_str(r#"{"title": "Buy milk", "description": "2 liters"}"#).unwrap();

        assert_eq!(request.status, TaskStatus::InProgress);
    }

    #[test]
    fn title_bounds_are_enforced() {
        assert!(validate_title("").is_err());
        assert!(validate_title(&"a".repeat(MAX_TITLE_LENGTH + 1)).is_err());
        assert!(validate_title("Buy milk").is_ok());
    }

    #[test]
    fn description_bound_is_enforced() {
        assert!(validate_description(&"a".repeat(MAX_DESCRIPTION_LENGTH + 1)).is_err());
        assert!(validate_description("").is_ok());
    }
}

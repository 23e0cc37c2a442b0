//! Task HTTP Handlers
//!
//! All handlers sit behind `auth_middleware` and act only on the caller's
//! own tasks. Every successful write is reported to the reminder subsystem
//! after the store has been updated.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::db;
use crate::backend::error::BackendError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::reminders::{Reminders, TaskSnapshot};
use crate::shared::{CreateTaskRequest, SharedError, Task, UpdateTaskRequest};

/// Malformed IDs are reported like unknown ones
fn parse_task_id(raw: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(raw).map_err(|_| BackendError::not_found("Task not found"))
}

/// List the caller's tasks, oldest first
pub async fn list_tasks(
    State(pool): State<SqlitePool>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Task>>, BackendError> {
    let tasks = db::list_tasks_for_user(&pool, user.user_id).await?;
    tracing::debug!("Listed {} tasks for user {}", tasks.len(), user.user_id);
    Ok(Json(tasks))
}

/// Create a task
///
/// A `dueTime` that is not `HH:MM` is dropped. Urgent tasks with a due
/// time get a reminder armed before the response is sent.
pub async fn create_task(
    State(pool): State<SqlitePool>,
    State(reminders): State<Reminders>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), BackendError> {
    let Json(request) = payload?;
    let new_task = request.validate()?;
    let task = db::create_task(&pool, user.user_id, new_task).await?;
    tracing::info!("Task {} created for user {}", task.id, user.user_id);

    reminders
        .task_saved(&TaskSnapshot::from_task(&task, user.email))
        .await;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Update a task's completion flag
///
/// With `{"completed": bool}` the flag is set; with an empty body or no
/// `completed` field it is toggled.
pub async fn update_task(
    State(pool): State<SqlitePool>,
    State(reminders): State<Reminders>,
    AuthUser(user): AuthUser,
    Path(task_id): Path<String>,
    body: Bytes,
) -> Result<Json<Task>, BackendError> {
    let task_id = parse_task_id(&task_id)?;
    let request: UpdateTaskRequest = if body.iter().all(u8::is_ascii_whitespace) {
        UpdateTaskRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!("Invalid update body for task {}: {}", task_id, e);
            SharedError::from(e)
        })?
    };

    let completed = match request.completed {
        Some(completed) => completed,
        None => {
            let current = db::get_task_for_user(&pool, task_id, user.user_id)
                .await?
                .ok_or_else(|| BackendError::not_found("Task not found"))?;
            !current.completed
        }
    };

    let task = db::set_task_completed(&pool, task_id, user.user_id, completed)
        .await?
        .ok_or_else(|| BackendError::not_found("Task not found"))?;
    tracing::info!("Task {} marked completed={}", task.id, task.completed);

    reminders
        .task_saved(&TaskSnapshot::from_task(&task, user.email))
        .await;

    Ok(Json(task))
}

/// Delete a task and cancel its reminder
pub async fn delete_task(
    State(pool): State<SqlitePool>,
    State(reminders): State<Reminders>,
    AuthUser(user): AuthUser,
    Path(task_id): Path<String>,
) -> Result<StatusCode, BackendError> {
    let task_id = parse_task_id(&task_id)?;

    if !db::delete_task(&pool, task_id, user.user_id).await? {
        return Err(BackendError::not_found("Task not found"));
    }
    tracing::info!("Task {} deleted", task_id);

    reminders.task_removed(task_id);

    Ok(StatusCode::NO_CONTENT)
}

//! Database operations for tasks
//!
//! Every owner-facing query is scoped by `user_id`, so a task that belongs
//! to someone else looks exactly like a task that does not exist. The
//! unscoped lookups at the bottom serve the reminder subsystem.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::{NewTask, Task};

/// A task joined with its owner's email address
#[derive(Debug, Clone)]
pub struct TaskWithOwner {
    pub task: Task,
    pub email: String,
}

const TASK_COLUMNS: &str = "id, user_id, text, urgent, completed, due_time, created_at";

fn task_from_row(row: &SqliteRow) -> Result<Task, sqlx::Error> {
    Ok(Task {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        text: row.try_get("text")?,
        urgent: row.try_get("urgent")?,
        completed: row.try_get("completed")?,
        due_time: row.try_get("due_time")?,
        created_at: row.try_get("created_at")?,
    })
}

fn task_with_owner_from_row(row: &SqliteRow) -> Result<TaskWithOwner, sqlx::Error> {
    Ok(TaskWithOwner {
        task: task_from_row(row)?,
        email: row.try_get("email")?,
    })
}

/// Insert a new task for `user_id`
pub async fn create_task(
    pool: &SqlitePool,
    user_id: Uuid,
    new_task: NewTask,
) -> Result<Task, sqlx::Error> {
    let task = Task {
        id: Uuid::new_v4(),
        user_id,
        text: new_task.text,
        urgent: new_task.urgent,
        completed: false,
        due_time: new_task.due_time,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO tasks (id, user_id, text, urgent, completed, due_time, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(task.id)
    .bind(task.user_id)
    .bind(&task.text)
    .bind(task.urgent)
    .bind(task.completed)
    .bind(&task.due_time)
    .bind(task.created_at)
    .execute(pool)
    .await?;

    Ok(task)
}

/// List a user's tasks, oldest first
pub async fn list_tasks_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<Task>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at ASC, rowid ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(task_from_row).collect()
}

/// Get a task by ID, only if owned by `user_id`
pub async fn get_task_for_user(
    pool: &SqlitePool,
    task_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Task>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
    ))
    .bind(task_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(task_from_row).transpose()
}

/// Set the completion flag of an owned task
///
/// Returns `None` if the task does not exist or is not owned by `user_id`.
pub async fn set_task_completed(
    pool: &SqlitePool,
    task_id: Uuid,
    user_id: Uuid,
    completed: bool,
) -> Result<Option<Task>, sqlx::Error> {
    let result = sqlx::query("UPDATE tasks SET completed = $1 WHERE id = $2 AND user_id = $3")
        .bind(completed)
        .bind(task_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_task_for_user(pool, task_id, user_id).await
}

/// Delete an owned task
///
/// Returns `false` if nothing was deleted.
pub async fn delete_task(
    pool: &SqlitePool,
    task_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Get a task by ID regardless of owner
///
/// Used by the reminder guard to re-check a task at fire time.
pub async fn get_task_by_id(pool: &SqlitePool, task_id: Uuid) -> Result<Option<Task>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(task_from_row).transpose()
}

/// Urgent, incomplete tasks that have a due time, with owner emails
pub async fn list_pending_reminders(pool: &SqlitePool) -> Result<Vec<TaskWithOwner>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.user_id, t.text, t.urgent, t.completed, t.due_time, t.created_at, u.email
        FROM tasks t
        JOIN users u ON u.id = t.user_id
        WHERE t.urgent = TRUE AND t.completed = FALSE AND t.due_time IS NOT NULL
        ORDER BY t.created_at ASC, t.rowid ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(task_with_owner_from_row).collect()
}

/// Urgent, incomplete tasks regardless of due time, with owner emails
pub async fn list_urgent_incomplete(pool: &SqlitePool) -> Result<Vec<TaskWithOwner>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.user_id, t.text, t.urgent, t.completed, t.due_time, t.created_at, u.email
        FROM tasks t
        JOIN users u ON u.id = t.user_id
        WHERE t.urgent = TRUE AND t.completed = FALSE
        ORDER BY t.created_at ASC, t.rowid ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(task_with_owner_from_row).collect()
}

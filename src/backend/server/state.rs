/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow Axum handlers to extract specific
 * parts of the state without needing the entire `AppState`:
 *
 * ```rust,ignore
 * use axum::extract::State;
 * use sqlx::SqlitePool;
 *
 * async fn handler(State(pool): State<SqlitePool>) {
 *     // query the task store
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::reminders::Reminders;
use crate::backend::server::config::ServerConfig;

/// Application state shared by every request handler
///
/// # Fields
///
/// * `db_pool` - SQLite connection pool for users and tasks
/// * `config` - Loaded server configuration (JWT secret, static dir, ...)
/// * `reminders` - Active reminder strategy, notified when tasks change
///
/// All fields are cheap to clone; clones share the same pool, config and
/// reminder registry.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<ServerConfig>,
    pub reminders: Reminders,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

/// Lets handlers extract `State<Reminders>` to report task changes
impl FromRef<AppState> for Reminders {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.reminders.clone()
    }
}

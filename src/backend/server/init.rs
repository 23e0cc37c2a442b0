/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including state creation, database loading, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Open the database and apply migrations
 * 2. Pick a notifier (SMTP when configured, log otherwise)
 * 3. Build the configured reminder strategy
 * 4. Start reminders (restore armed jobs, or start the sweep loop)
 * 5. Create and configure the router
 *
 * # Reminder Recovery
 *
 * Armed reminders live in memory only. On startup the scheduler re-arms a
 * job for every urgent, incomplete task with a due time, so reminders
 * survive restarts. A failed recovery is logged and does not stop the
 * server.
 */

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;

use crate::backend::reminders::{LogNotifier, Notifier, NotifyError, Reminders, SmtpNotifier};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Errors that stop the server from starting
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("notifier: {0}")]
    Notifier(#[from] NotifyError),
}

/// A configured application ready to serve
pub struct App {
    pub router: Router<()>,
    /// Handle for shutting reminders down when the server stops
    pub reminders: Reminders,
}

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails if the database cannot be opened or migrated, or the SMTP
/// transport cannot be built.
pub async fn create_app(config: ServerConfig) -> Result<App, StartupError> {
    tracing::info!("Initializing xftodo backend server");

    let db_pool = load_database(&config.database_url).await?;
    let notifier = build_notifier(&config)?;

    Ok(create_app_with(config, db_pool, notifier).await)
}

/// Create the application on an existing pool and notifier
pub async fn create_app_with(
    config: ServerConfig,
    db_pool: SqlitePool,
    notifier: Arc<dyn Notifier>,
) -> App {
    let reminders = Reminders::from_config(&config, db_pool.clone(), notifier);
    create_app_with_reminders(config, db_pool, reminders).await
}

/// Create the application around an already-built reminder strategy
///
/// Integration tests use this to run the scheduler on a fixed clock.
pub async fn create_app_with_reminders(
    config: ServerConfig,
    db_pool: SqlitePool,
    reminders: Reminders,
) -> App {
    reminders.start().await;
    tracing::info!("Reminders started");

    let app_state = AppState {
        db_pool,
        config: Arc::new(config),
        reminders: reminders.clone(),
    };

    let router = create_router(app_state);
    tracing::info!("Router configured");

    App { router, reminders }
}

fn build_notifier(config: &ServerConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    match &config.smtp {
        Some(smtp) => {
            tracing::info!("Sending reminders through {}:{}", smtp.host, smtp.port);
            Ok(Arc::new(SmtpNotifier::new(smtp)?))
        }
        None => {
            tracing::warn!("SMTP not configured, reminders will be logged instead of sent");
            Ok(Arc::new(LogNotifier))
        }
    }
}

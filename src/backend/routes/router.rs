/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. API routes (signup, login, health)
 * 2. Task routes (behind the auth middleware)
 * 3. Fallback: static files from the configured directory, 404 otherwise
 *
 * CORS is permissive; the bundled frontend and any other origin may call
 * the API.
 */

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::task_routes::configure_task_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state (database, config, reminders)
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_api_routes(Router::new());
    let router = configure_task_routes(router, app_state.clone());

    // Anything else is a static asset
    let router = router.fallback_service(ServeDir::new(&app_state.config.static_dir));

    router.layer(CorsLayer::permissive()).with_state(app_state)
}

/**
 * Task Routes
 *
 * - `GET /tasks` - List the caller's tasks
 * - `POST /tasks` - Create a task
 * - `PUT /tasks/{id}` - Set or toggle completion
 * - `DELETE /tasks/{id}` - Delete a task
 *
 * Every route requires `Authorization: Bearer <jwt>`; the auth middleware
 * is applied as a route layer so unknown paths still fall through to the
 * static file service.
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};

use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;
use crate::backend::tasks::{create_task, delete_task, list_tasks, update_task};

/// Configure the authenticated task routes
pub fn configure_task_routes(router: Router<AppState>, app_state: AppState) -> Router<AppState> {
    let tasks = Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", put(update_task).delete(delete_task))
        .route_layer(from_fn_with_state(app_state, auth_middleware));

    router.merge(tasks)
}

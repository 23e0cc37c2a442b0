//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! ├── api_routes.rs   - Public endpoints (signup, login, health)
//! └── task_routes.rs  - Authenticated task endpoints
//! ```
//!
//! # Routes
//!
//! - `POST /signup` - User registration
//! - `POST /login` - User login
//! - `GET /health` - Liveness probe
//! - `GET|POST /tasks` - List or create tasks
//! - `PUT|DELETE /tasks/{id}` - Update or delete a task
//! - everything else - static files

/// Main router creation
pub mod router;

/// Public API routes
pub mod api_routes;

/// Authenticated task routes
pub mod task_routes;

pub use router::create_router;

//! Backend Module
//!
//! All server-side code for xftodo: the Axum HTTP server, authentication,
//! task storage and the reminder subsystem.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Users, password hashing, JWT sessions
//! - **`middleware`** - Bearer-token authentication
//! - **`tasks`** - Task storage and handlers
//! - **`reminders`** - Reminder scheduling, sweep and email delivery
//! - **`error`** - Backend error type and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Config, state and initialization
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── tasks/          - Task storage and handlers
//! ├── reminders/      - Reminder scheduling and delivery
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! Handlers share an `AppState` holding the SQLite pool, the loaded
//! configuration and the active reminder strategy. Task handlers report
//! every change to the reminder strategy after the write has succeeded.
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`; the error renders as a JSON
//! body `{"error": ..., "status": ...}` with the matching status code.
//! Reminder failures are logged and never reach a client.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Task storage and handlers
pub mod tasks;

/// Reminder scheduling and delivery
pub mod reminders;

pub use error::BackendError;
pub use server::{create_app, ServerConfig};

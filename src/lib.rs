//! xftodo - Main Library
//!
//! A multi-user to-do server with email reminders for urgent tasks.
//!
//! # Overview
//!
//! - Email/password accounts with bcrypt-hashed passwords
//! - JWT bearer tokens for the task API
//! - Per-user task lists stored in SQLite
//! - Reminder emails a few minutes before an urgent task's daily due time,
//!   restored after restarts
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types exchanged with clients
//!   - Task, create/update requests, due-time parsing
//!   - Validation error types
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server, routes and middleware
//!   - Authentication and task storage
//!   - Reminder scheduler, periodic sweep, SMTP delivery
//!
//! # Usage
//!
//! ```rust,no_run
//! use xftodo::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::from_env()?).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app.router).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SharedError` for input validation
//! - `backend::BackendError` for handlers, rendered as JSON responses
//! - `backend::reminders::NotifyError` for email delivery

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;

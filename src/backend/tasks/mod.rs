//! Tasks Module
//!
//! Per-user to-do items: storage and the authenticated `/tasks` endpoints.
//!
//! - **`db`** - SQLite queries, owner-scoped plus the reminder lookups
//! - **`handlers`** - list, create, update, delete

pub mod db;
pub mod handlers;

pub use handlers::{create_task, delete_task, list_tasks, update_task};

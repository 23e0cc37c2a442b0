//! Shared Module
//!
//! This module contains the request and response types exchanged with
//! clients. They carry no server dependencies and are serialized as JSON.

/// Task data structures
pub mod task;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use task::{CreateTaskRequest, NewTask, Task, UpdateTaskRequest};

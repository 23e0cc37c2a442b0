//! Backend Error Module
//!
//! The error type returned by HTTP handlers and the auth middleware.
//!
//! ```text
//! error/
//! ├── mod.rs        - Re-exports
//! ├── types.rs      - BackendError and its status mapping
//! └── conversion.rs - IntoResponse (JSON body)
//! ```
//!
//! Handlers return `Result<_, BackendError>` and use `?` on database calls
//! and input validation. Reminder failures are logged where they happen
//! and never become a `BackendError`.

/// Error type definitions
pub mod types;

/// HTTP response conversion
pub mod conversion;

pub use types::BackendError;

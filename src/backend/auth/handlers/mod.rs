//! Authentication Handlers Module
//!
//! HTTP handlers for the public authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── signup.rs   - User registration handler
//! └── login.rs    - User authentication handler
//! ```
//!
//! # Handlers
//!
//! - **`signup`** - POST /signup - User registration
//! - **`login`** - POST /login - Exchange credentials for a JWT
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{routing::post, Router};
//! use xftodo::backend::auth::handlers::{login, signup};
//!
//! let router = Router::new()
//!     .route("/signup", post(signup))
//!     .route("/login", post(login));
//! ```

/// Request and response types
pub mod types;

/// Signup handler
pub mod signup;

/// Login handler
pub mod login;

pub use types::{LoginRequest, MessageResponse, SignupRequest, TokenResponse};

pub use login::login;
pub use signup::signup;

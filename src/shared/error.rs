//! Shared Error Types
//!
//! Errors raised while checking client input, before anything touches the
//! database. The backend maps every variant to a 400 response.
//!
//! ```rust
//! use xftodo::shared::error::SharedError;
//!
//! let error = SharedError::validation("text", "Task text is required");
//! assert_eq!(error.detail(), "Task text is required");
//! ```
use thiserror::Error;

/// Input errors shared by request types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Request body is not valid JSON for the expected type
    #[error("Malformed request body: {message}")]
    MalformedBody { message: String },

    /// A field is missing or has an unusable value
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },
}

impl SharedError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedBody {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Message suitable for a client, without the variant prefix
    pub fn detail(&self) -> &str {
        match self {
            Self::MalformedBody { message } | Self::InvalidField { message, .. } => message,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}

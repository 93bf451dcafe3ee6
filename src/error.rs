use thiserror::Error;

/// The session store's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A validation error. Raised before any I/O and never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A database error: no active connection, a failed query, or a failed
    /// batch/verification step.
    #[error("Database error: {0}")]
    Database(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Shorthand for the "operations were invoked without a live connection"
    /// case.
    pub fn not_connected() -> Self {
        AppError::Database("No active database connection".to_string())
    }

    /// The message safe to return to a caller.
    ///
    /// Validation messages describe the caller's own input and pass through.
    /// Database causes are logged server-side in full and replaced with a
    /// generic message.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => {
                tracing::debug!("Validation error: {}", msg);
                msg.clone()
            }
            AppError::Database(cause) => {
                tracing::error!("Database error: {}", cause);
                "Database error".to_string()
            }
        }
    }
}

impl From<scylla::transport::errors::QueryError> for AppError {
    fn from(e: scylla::transport::errors::QueryError) -> Self {
        AppError::Database(e.to_string())
    }
}

impl From<scylla::transport::errors::NewSessionError> for AppError {
    fn from(e: scylla::transport::errors::NewSessionError) -> Self {
        AppError::Database(e.to_string())
    }
}

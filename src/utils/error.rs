use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from I/O operations (incident log, artifact files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from chart rendering
    #[error("Chart error: {0}")]
    Chart(String),
}

/// Result type for application
pub type AppResult<T> = Result<T, AppError>;

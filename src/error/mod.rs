use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Record error: {0}")]
    Record(#[from] RecordError),
}

/// Errors raised while resolving raw datastore rows into typed records
///
/// Out-of-range numerics clamp instead of erroring, so the only failure
/// left at the boundary is a timestamp that cannot be parsed at all.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Invalid timestamp in {field}: '{value}' - {message}")]
    InvalidTimestamp {
        field: String,
        value: String,
        message: String,
    },
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for record resolution
pub type RecordResult<T> = Result<T, RecordError>;

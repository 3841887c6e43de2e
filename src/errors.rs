use thiserror::Error;

/// Errors raised by the host or by providers while rendering.
///
/// Address misses are not errors; they resolve to `None`.
#[derive(Debug, Error)]
pub enum TemplateError {
    // A delimiter pair that can never match (empty start or end).
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    // Raised by providers whose asynchronous render fails.
    #[error("render error: {0}")]
    Render(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TemplateError>;

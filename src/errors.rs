use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::InvalidResponse(_) => "INVALID_RESPONSE",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Text suitable for a banner or alert. Transport problems all read the
    /// same to the user whether they were a timeout, a 5xx or being offline.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::Conflict(msg) | AppError::ValidationError(msg) => {
                msg.clone()
            }
            AppError::Network(_) | AppError::InvalidResponse(_) | AppError::InternalError(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Whether the failure may go away by simply retrying the same action.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Network(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::InvalidResponse(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidResponse(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::InternalError(format!("URL error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

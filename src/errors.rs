use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the spreadsheet backend. None of them are retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential file not found at {}", .path.display())]
    CredentialsMissing { path: PathBuf },
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("spreadsheet '{name}' not found")]
    SpreadsheetNotFound { name: String },
    #[error("transport error: {0}")]
    Transport(String),
}

impl StoreError {
    /// Text shown to the operator.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::CredentialsMissing { path } => format!(
                "{} file not found. Please follow the setup instructions in the README.",
                path.display()
            ),
            StoreError::InvalidCredentials(reason) => {
                format!("Error setting up Google Sheets client: {reason}")
            }
            StoreError::SpreadsheetNotFound { name } => format!(
                "'{name}' sheet not found. Please create it and share it with the service account email."
            ),
            StoreError::Transport(reason) => format!("Error talking to Google Sheets: {reason}"),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: message.into(),
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = err.user_message();
        match err {
            StoreError::Transport(_) => Self::bad_gateway(message),
            _ => Self::unavailable(message),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

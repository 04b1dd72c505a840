use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Network Error: {0}")]
    Network(String),

    /// The provider answered, but not with something usable (non-2xx, error body)
    #[error("Provider Error: {0}")]
    Provider(String),

    /// The provider answered 2xx with a body we could not read an answer from
    #[error("Malformed Response: {0}")]
    MalformedResponse(String),

    #[error("Missing API Key: {0}")]
    MissingApiKey(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Clipboard Error: {0}")]
    Clipboard(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Unknown Error: {0}")]
    Unknown(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::MalformedResponse(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("Serialization error: {}", err))
    }
}

impl From<keyring::Error> for AppError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::NoEntry => AppError::MissingApiKey("no keyring entry".to_string()),
            other => AppError::Config(other.to_string()),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Coarse classification of a failed query, handed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "popup.ts")]
pub enum QueryErrorKind {
    Network,
    Provider,
    MalformedResponse,
    MissingApiKey,
    Unknown,
}

impl From<&AppError> for QueryErrorKind {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Network(_) | AppError::Io(_) => QueryErrorKind::Network,
            AppError::Provider(_) => QueryErrorKind::Provider,
            AppError::MalformedResponse(_) | AppError::Validation(_) => QueryErrorKind::MalformedResponse,
            AppError::MissingApiKey(_) => QueryErrorKind::MissingApiKey,
            AppError::Clipboard(_) | AppError::Config(_) | AppError::Unknown(_) => QueryErrorKind::Unknown,
        }
    }
}

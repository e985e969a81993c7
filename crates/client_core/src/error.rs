use shared::error::ApiError;
use thiserror::Error;

pub const FETCH_FALLBACK_MESSAGE: &str = "Failed to load customers";
pub const SUBMIT_FALLBACK_MESSAGE: &str = "Failed to create customer";
pub const FALLBACK_ERROR_CODE: &str = "UNKNOWN";

/// Failure of a single HTTP exchange with the customers endpoint.
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    #[error("server responded with status {status}")]
    Status { status: u16, body: Option<ApiError> },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

impl RequestError {
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }

    /// Error body sent by the server, if the response carried one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

/// The customer list could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.message)]
pub struct FetchError(pub ApiError);

impl FetchError {
    pub fn from_request(err: &RequestError) -> Self {
        match err.api_error() {
            Some(body) => Self(body.clone()),
            None => Self(ApiError::new(FALLBACK_ERROR_CODE, FETCH_FALLBACK_MESSAGE)),
        }
    }

    pub fn api_error(&self) -> &ApiError {
        &self.0
    }

    pub fn message(&self) -> &str {
        &self.0.message
    }
}

/// A create request was refused locally or rejected by the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("{message}")]
    Rejected { message: String },
    #[error("a customer is already being created")]
    AlreadyPending,
    #[error("the add customer dialog is not open")]
    DialogClosed,
}

impl SubmitError {
    /// Server-provided message when present, otherwise the fixed fallback.
    pub fn from_request(err: &RequestError) -> Self {
        let message = err
            .api_error()
            .map(|body| body.message.as_str())
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(SUBMIT_FALLBACK_MESSAGE);
        Self::Rejected {
            message: message.to_string(),
        }
    }
}

//! Errors surfaced by backend calls and command validation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

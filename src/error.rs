//! Error handling for the catalog admin console

use std::fmt;
use thiserror::Error;

use catalog_admin_auth::AuthError;

/// Unified error type for the catalog admin console
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Sign-in, session check and cookie errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Cookie file and other local I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Draft input that cannot be submitted
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Operation not allowed in the console's current state
    #[error("Console error: {0}")]
    Console(String),
}

impl Error {
    /// Create a new API error
    pub fn api<T: fmt::Display>(status: u16, msg: T) -> Self {
        Error::Api {
            status,
            message: msg.to_string(),
        }
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new console state error
    pub fn console<T: fmt::Display>(msg: T) -> Self {
        Error::Console(msg.to_string())
    }

    /// The text shown to the operator: the server's message when there is one
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { message, .. } => message.clone(),
            Error::Auth(AuthError::ApiError(message)) => message.clone(),
            Error::Validation(message) | Error::Console(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

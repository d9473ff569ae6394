//! Operator authentication for the catalog admin API
//!
//! This crate signs operators in, verifies a stored session with the server,
//! and persists the session token the way a browser keeps a cookie.
//! The session is an explicit value: every authorized call takes the
//! [`Session`] it should run under instead of reading a shared default header.

mod cookie;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use cookie::*;

/// Name of the cookie holding the session token
pub const SESSION_COOKIE: &str = "hexToken";

/// エラー型
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Cookie store error: {0}")]
    CookieError(#[from] std::io::Error),

    #[error("Invalid cookie: {0}")]
    InvalidCookie(String),
}

/// Login form values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// An authenticated session: the opaque token and the moment it stops being valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    expires: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, expires: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires,
        }
    }

    /// The token as sent in the `Authorization` header (no scheme prefix)
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires(&self) -> DateTime<Utc> {
        self.expires
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires
    }
}

/// Response of the sign-in endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    pub token: String,
    /// Expiry as a Unix timestamp in milliseconds
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expired: DateTime<Utc>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub message: Option<ServerMessage>,
}

impl From<SignInResponse> for Session {
    fn from(response: SignInResponse) -> Self {
        Session::new(response.token, response.expired)
    }
}

/// A `message` as the API reports it: a single string, or a list of
/// validation messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Text(text) => f.write_str(text),
            ServerMessage::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<ServerMessage>,
}

/// Extracts the operator-facing message from an error response body.
///
/// Falls back to the raw body, then to the status line, when the body does
/// not carry a `message`.
pub fn message_from_body(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = serde_json::from_str::<ErrorBody>(body)
    {
        return message.to_string();
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        }
    } else {
        trimmed.to_string()
    }
}

async fn api_error(response: Response) -> AuthError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    AuthError::ApiError(message_from_body(status, &body))
}

/// Auth クライアント
#[derive(Debug, Clone)]
pub struct Auth {
    url: String,
    http_client: Client,
}

impl Auth {
    /// 新しい Auth クライアントを作成
    ///
    /// `url` is the API base, e.g. `https://api.example.com/v2`.
    pub fn new(url: &str, http_client: Client) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    /// メール・パスワードでログイン
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let url = self.endpoint("/admin/signin");
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(credentials)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = api_error(response).await;
            warn!("Sign-in rejected for {}: {}", credentials.username, err);
            return Err(err);
        }

        let body: SignInResponse = response.json().await?;
        info!(
            "Signed in as {} (session expires {})",
            credentials.username, body.expired
        );

        Ok(body.into())
    }

    /// Asks the server whether `session` is still accepted
    pub async fn check(&self, session: &Session) -> Result<(), AuthError> {
        let url = self.endpoint("/api/user/check");
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", session.token())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }

    /// サインアウト
    pub async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        let url = self.endpoint("/logout");
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", session.token())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        info!("Signed out");
        Ok(())
    }
}

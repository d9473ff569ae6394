//! Session cookie persistence

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{AuthError, Session, SESSION_COOKIE};

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Formats `session` as a cookie line: `hexToken=<token>; expires=<HTTP date>`
pub fn format_cookie(session: &Session) -> String {
    format!(
        "{}={}; expires={}",
        SESSION_COOKIE,
        session.token(),
        session.expires().format(EXPIRES_FORMAT)
    )
}

/// Parses a cookie line written by [`format_cookie`].
///
/// Returns `Ok(None)` when the line holds no session token. A line with a
/// token but no `expires` attribute is rejected.
pub fn parse_cookie(line: &str) -> Result<Option<Session>, AuthError> {
    let mut token = None;
    let mut expires = None;

    for row in line.trim().split(';').map(str::trim) {
        if let Some((name, value)) = row.split_once('=') {
            if name == SESSION_COOKIE {
                token = Some(value.to_string());
            } else if name.eq_ignore_ascii_case("expires") {
                expires = Some(parse_expires(value)?);
            }
        }
    }

    match (token, expires) {
        (Some(token), _) if token.is_empty() => Ok(None),
        (Some(token), Some(expires)) => Ok(Some(Session::new(token, expires))),
        (Some(_), None) => Err(AuthError::InvalidCookie(
            "missing expires attribute".to_string(),
        )),
        (None, _) => Ok(None),
    }
}

fn parse_expires(value: &str) -> Result<DateTime<Utc>, AuthError> {
    NaiveDateTime::parse_from_str(value.trim(), EXPIRES_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| AuthError::InvalidCookie(format!("bad expires '{}': {}", value, e)))
}

/// Where the session cookie lives between runs
#[async_trait]
pub trait CookieStore: Send + Sync {
    /// Returns the stored session, or `None` when there is none or it has expired
    async fn load(&self) -> Result<Option<Session>, AuthError>;

    async fn save(&self, session: &Session) -> Result<(), AuthError>;

    async fn clear(&self) -> Result<(), AuthError>;
}

/// Cookie kept in a single-line file
#[derive(Debug, Clone)]
pub struct FileCookieStore {
    path: PathBuf,
}

impl FileCookieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CookieStore for FileCookieStore {
    async fn load(&self) -> Result<Option<Session>, AuthError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let session = parse_cookie(&contents)?;
        Ok(session.filter(|s| {
            let live = !s.is_expired();
            if !live {
                debug!("Ignoring expired cookie in {}", self.path.display());
            }
            live
        }))
    }

    async fn save(&self, session: &Session) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, format_cookie(session)).await?;
        debug!("Session cookie written to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process cookie, for tests and one-shot runs
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookie: Mutex<Option<String>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `session` already stored
    pub fn with_session(session: &Session) -> Self {
        Self {
            cookie: Mutex::new(Some(format_cookie(session))),
        }
    }

    /// The raw cookie line, if any
    pub fn raw(&self) -> Option<String> {
        self.cookie.lock().ok().and_then(|c| c.clone())
    }
}

#[async_trait]
impl CookieStore for MemoryCookieStore {
    async fn load(&self) -> Result<Option<Session>, AuthError> {
        match self.raw() {
            Some(line) => Ok(parse_cookie(&line)?.filter(|s| !s.is_expired())),
            None => Ok(None),
        }
    }

    async fn save(&self, session: &Session) -> Result<(), AuthError> {
        if let Ok(mut cookie) = self.cookie.lock() {
            *cookie = Some(format_cookie(session));
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        if let Ok(mut cookie) = self.cookie.lock() {
            *cookie = None;
        }
        Ok(())
    }
}

//! Configuration for the admin console

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Where the console talks to and where it keeps its session cookie.
/// It's recommended to load these values from the environment (see [`ConsoleConfig::from_env`]).
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API base, e.g. `https://api.example.com/v2`, without trailing slash
    pub api_base: String,
    /// The shop path segment in `/api/{path}/admin/...`
    pub api_path: String,
    /// File holding the session cookie
    pub cookie_path: PathBuf,
}

impl ConsoleConfig {
    /// Creates a new configuration, validating the base URL and path.
    pub fn new(api_base: &str, api_path: &str, cookie_path: impl Into<PathBuf>) -> Result<Self> {
        Url::parse(api_base)?;

        let api_path = api_path.trim().trim_matches('/');
        if api_path.is_empty() {
            return Err(Error::config("api_path cannot be empty"));
        }

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            api_path: api_path.to_string(),
            cookie_path: cookie_path.into(),
        })
    }

    /// Reads `API_BASE`, `API_PATH` and `CATALOG_COOKIE_FILE`.
    ///
    /// The cookie file defaults to `.catalog-admin-cookie` in the working directory.
    pub fn from_env() -> Result<Self> {
        let api_base = std::env::var("API_BASE")
            .map_err(|_| Error::config("API_BASE environment variable not found"))?;
        let api_path = std::env::var("API_PATH")
            .map_err(|_| Error::config("API_PATH environment variable not found"))?;
        let cookie_path = std::env::var("CATALOG_COOKIE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_COOKIE_FILE));

        Self::new(&api_base, &api_path, cookie_path)
    }
}

/// Default cookie file name
pub const DEFAULT_COOKIE_FILE: &str = ".catalog-admin-cookie";

/// HTTP client options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout; `None` leaves the transport default
    pub request_timeout: Option<Duration>,

    /// The `User-Agent` sent with every request
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: None,
            user_agent: format!("catalog-admin/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, value: &str) -> Self {
        self.user_agent = value.to_string();
        self
    }

    /// Builds the shared HTTP client
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

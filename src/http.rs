//! Shared HTTP client construction.
//!
//! One `reqwest::Client` serves both the chat API and document downloads so
//! they share the connection pool and the session cookie jar.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::cookie::Jar;
use tracing::{debug, instrument};
use url::Url;

use crate::user_agent;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default total request timeout (5 minutes for large documents).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Settings for [`build_http_client`].
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds.
    pub read_timeout_secs: u64,
    /// Existing session cookie (`name=value`) to attach to backend requests.
    pub session_cookie: Option<String>,
    /// URL the session cookie is scoped to.
    pub cookie_url: Option<Url>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            session_cookie: None,
            cookie_url: None,
        }
    }
}

/// Builds the shared client: timeouts, gzip, tool User-Agent and a cookie jar.
///
/// Cookies set by the backend are kept in the jar and replayed automatically;
/// a configured session cookie is seeded for `cookie_url`.
///
/// # Errors
///
/// Returns the `reqwest` builder error if the TLS backend cannot be initialised.
#[instrument(level = "debug", skip(options), fields(has_session = options.session_cookie.is_some()))]
pub fn build_http_client(options: &HttpOptions) -> Result<Client, reqwest::Error> {
    let jar = Arc::new(Jar::default());
    if let (Some(cookie), Some(url)) = (options.session_cookie.as_deref(), options.cookie_url.as_ref()) {
        debug!(domain = url.host_str().unwrap_or_default(), "seeding session cookie");
        jar.add_cookie_str(cookie, url);
    }

    Client::builder()
        .connect_timeout(Duration::from_secs(options.connect_timeout_secs))
        .timeout(Duration::from_secs(options.read_timeout_secs))
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
        .cookie_provider(jar)
        .build()
}

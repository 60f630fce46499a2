//! Error types for the download module.
//!
//! Every failure reaches the caller tagged; the downloader neither retries nor
//! suppresses errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while downloading a linked document.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The provided URL is malformed or not http(s).
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} {status_text} downloading {url}")]
    Http {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Reason phrase for the status.
        status_text: String,
    },

    /// The server answered 2xx with a zero-byte body.
    #[error("empty response body downloading {url}")]
    EmptyBody {
        /// The URL that returned no content.
        url: String,
    },

    /// Transport-level failure (DNS, connection reset, TLS, transport timeout).
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The save sink could not store the document.
    #[error("failed to save download to {path}: {source}")]
    Save {
        /// Destination that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http(url: impl Into<String>, status: u16, status_text: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            status,
            status_text: status_text.into(),
        }
    }

    /// Creates an empty-body error.
    pub fn empty_body(url: impl Into<String>) -> Self {
        Self::EmptyBody { url: url.into() }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a save error.
    pub fn save(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Save {
            path: path.into(),
            source,
        }
    }

    /// HTTP status code, for `Http` errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// No From<reqwest::Error> / From<std::io::Error>: every variant needs the URL or
// path the source error lacks.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_http_display() {
        let error = DownloadError::http("https://x.test/a.docx", 404, "Not Found");
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(msg.contains("Not Found"), "Expected status text in: {msg}");
        assert!(msg.contains("https://x.test/a.docx"), "Expected URL in: {msg}");
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn test_download_error_empty_body_display() {
        let error = DownloadError::empty_body("https://x.test/a.docx");
        let msg = error.to_string();
        assert!(msg.contains("empty"), "Expected 'empty' in: {msg}");
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_download_error_save_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = DownloadError::save(PathBuf::from("/tmp/forma.docx"), io_error);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/forma.docx"), "Expected path in: {msg}");
    }

    #[test]
    fn test_download_error_invalid_url_display() {
        let msg = DownloadError::invalid_url("not-a-url").to_string();
        assert!(msg.contains("invalid URL"), "Expected 'invalid URL' in: {msg}");
        assert!(msg.contains("not-a-url"), "Expected URL in: {msg}");
    }
}

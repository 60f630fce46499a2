//! Document downloader: fetch, name, hand to the save sink.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_DISPOSITION;
use tracing::{debug, info, instrument};
use url::Url;

use super::error::DownloadError;
use super::filename::{DEFAULT_EXTENSION, resolve_download_filename};
use super::sink::SaveSink;

/// Upper bound on the buffer reserved up front from `Content-Length`.
const MAX_PREALLOCATED_BODY: usize = 1 << 20;

/// Result of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Filename the document was handed to the sink under.
    pub filename: String,
    /// Size of the response body in bytes.
    pub byte_size: u64,
    /// Where the sink stored it.
    pub saved_to: PathBuf,
}

/// Downloads linked documents and passes them to a [`SaveSink`].
///
/// Cheap to clone; clones share the HTTP connection pool, cookie jar and sink.
/// Independent downloads may run concurrently, each owning its own response
/// and buffer.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use docchat_core::download::{DirectorySink, Downloader};
/// use docchat_core::http::{HttpOptions, build_http_client};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = build_http_client(&HttpOptions::default())?;
/// let downloader = Downloader::new(client, Arc::new(DirectorySink::new("./downloads")));
/// let outcome = downloader
///     .download("http://localhost:5000/api/documents/3/download", None)
///     .await?;
/// println!("Saved {} ({} bytes)", outcome.saved_to.display(), outcome.byte_size);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    sink: Arc<dyn SaveSink>,
    default_extension: String,
}

impl Downloader {
    /// Creates a downloader that appends `.docx` to extension-less names.
    #[must_use]
    pub fn new(client: Client, sink: Arc<dyn SaveSink>) -> Self {
        Self {
            client,
            sink,
            default_extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Overrides the extension appended to names without one.
    #[must_use]
    pub fn with_default_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into();
        self
    }

    /// Downloads `url` and saves it.
    ///
    /// The filename is, in order of preference: `suggested_filename`, the
    /// `Content-Disposition` filename, the last URL path segment, `download`.
    /// Names without a `.` get the default extension.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::InvalidUrl`] if `url` is not an http(s) URL
    /// - [`DownloadError::Network`] on transport failure (including transport timeouts)
    /// - [`DownloadError::Http`] on a non-2xx status
    /// - [`DownloadError::EmptyBody`] on a zero-byte body
    /// - [`DownloadError::Save`] if the sink cannot store the document
    #[must_use = "download result contains where the document was saved"]
    #[instrument(skip(self), fields(url = %url))]
    pub async fn download(
        &self,
        url: &str,
        suggested_filename: Option<&str>,
    ) -> Result<DownloadOutcome, DownloadError> {
        debug!("starting download");

        let parsed_url = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        if !matches!(parsed_url.scheme(), "http" | "https") {
            return Err(DownloadError::invalid_url(url));
        }

        let response = self
            .client
            .get(parsed_url.clone())
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let status_text = reason_phrase(&response);
            return Err(DownloadError::http(url, status.as_u16(), status_text));
        }

        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
            .map(ToString::to_string);

        let body = read_body(response, url).await?;
        if body.is_empty() {
            return Err(DownloadError::empty_body(url));
        }

        let filename = resolve_download_filename(
            suggested_filename,
            content_disposition.as_deref(),
            &parsed_url,
            &self.default_extension,
        );
        debug!(filename = %filename, bytes = body.len(), "resolved filename");

        let saved_to = self.sink.save(&body, &filename).await?;
        let byte_size = body.len() as u64;

        info!(
            path = %saved_to.display(),
            bytes = byte_size,
            "download complete"
        );

        Ok(DownloadOutcome {
            filename,
            byte_size,
            saved_to,
        })
    }
}

/// Reason phrase the server sent, or the canonical one for the status code.
fn reason_phrase(response: &reqwest::Response) -> String {
    response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
        .or_else(|| response.status().canonical_reason())
        .unwrap_or("Unknown Status")
        .to_string()
}

/// Reads the whole response body into memory.
///
/// `Content-Length` only sizes the initial buffer, capped at
/// [`MAX_PREALLOCATED_BODY`]; the body grows as chunks arrive.
async fn read_body(response: reqwest::Response, url: &str) -> Result<Vec<u8>, DownloadError> {
    let capacity = response
        .content_length()
        .and_then(|len| usize::try_from(len).ok())
        .map_or(0, |len| len.min(MAX_PREALLOCATED_BODY));
    let mut body = Vec::with_capacity(capacity);
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

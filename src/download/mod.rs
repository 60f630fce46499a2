//! Document download and filename handling.
//!
//! This module fetches documents linked from chat replies and hands them to a
//! host save primitive.
//!
//! # Features
//!
//! - Session cookies replayed through the shared client's cookie jar
//! - Filename from caller suggestion, `Content-Disposition` (incl. RFC 5987) or URL
//! - `.docx` appended to extension-less names
//! - Tagged errors for HTTP status, empty body, transport and save failures
//! - Label-to-filename derivation that keeps configured locale letters
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use docchat_core::download::{DirectorySink, Downloader};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = Downloader::new(reqwest::Client::new(), Arc::new(DirectorySink::new(".")));
//! let outcome = downloader
//!     .download("https://example.com/api/documents/3/download", Some("forma.docx"))
//!     .await?;
//! println!("Downloaded: {}", outcome.saved_to.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod filename;
mod sink;

pub use client::{DownloadOutcome, Downloader};
pub use error::DownloadError;
pub use filename::{
    AZERBAIJANI_LETTERS, DEFAULT_EXTENSION, DEFAULT_FALLBACK_STEM, FALLBACK_DOWNLOAD_NAME,
    FilenamePolicy, derive_filename, resolve_download_filename,
};
pub use sink::{DirectorySink, SaveSink};

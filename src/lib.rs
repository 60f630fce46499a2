//! Docchat Core Library
//!
//! Client-side pieces of the document-chat assistant: finding download links
//! in assistant replies, cleaning the reply prose, naming and downloading the
//! linked documents.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`links`] - Link pattern sets, extraction and reply sanitizing
//! - [`download`] - Document download, filename derivation and save sinks
//! - [`api`] - Chat backend client (ask, list documents)
//! - [`http`] - Shared HTTP client with session cookie jar
//! - [`config`] - TOML configuration loading and validation

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod download;
pub mod http;
pub mod links;
mod user_agent;

// Re-export commonly used types
pub use api::{ApiError, AskRequest, ChatApi, ChatReply, DocumentRef, DocumentSummary};
pub use download::{
    DEFAULT_EXTENSION, DirectorySink, DownloadError, DownloadOutcome, Downloader, FilenamePolicy,
    SaveSink, derive_filename,
};
pub use http::{HttpOptions, build_http_client};
pub use links::{
    DiscoveredLink, LinkKind, PatternError, PatternSet, PatternSpec, Preset, extract_links,
    sanitize,
};

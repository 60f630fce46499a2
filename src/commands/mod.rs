//! CLI command handlers.

mod ask;
mod config;
mod documents;
mod download;
mod text;

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use docchat_core::config::{FileConfig, load_config};
use docchat_core::{ChatApi, DirectorySink, Downloader, build_http_client};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::cli::Args;

pub(crate) use ask::run_ask_command;
pub(crate) use config::run_config_show_command;
pub(crate) use documents::run_documents_command;
pub(crate) use download::run_download_command;
pub(crate) use text::{run_extract_command, run_filename_command, run_sanitize_command};

/// Process exit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    /// Some downloads succeeded, some failed.
    Partial,
    Failure,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Partial => 2,
        }
    }
}

/// Maps completed and failed download counts to the process exit outcome.
pub(crate) fn determine_exit_outcome(completed: usize, failed: usize) -> ProcessExit {
    if failed == 0 {
        ProcessExit::Success
    } else if completed > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}

/// Config and backend settings shared by the commands.
pub(crate) struct RunContext {
    pub(crate) config: FileConfig,
    pub(crate) base_url: Url,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) loaded_from_file: bool,
}

impl RunContext {
    /// Loads the config file and applies command-line overrides.
    pub(crate) fn from_args(args: &Args) -> Result<Self> {
        let loaded = load_config(args.config.as_deref())?;
        debug!(
            path = ?loaded.path,
            loaded_from_file = loaded.loaded_from_file,
            "configuration resolved"
        );
        let mut config = loaded.config;
        if let Some(base_url) = &args.base_url {
            config.base_url = Some(base_url.clone());
        }
        let base_url = config.base_url().context("Invalid backend URL")?;
        Ok(Self {
            config,
            base_url,
            config_path: loaded.path,
            loaded_from_file: loaded.loaded_from_file,
        })
    }

    pub(crate) fn http_client(&self) -> Result<Client> {
        let options = self.config.http_options()?;
        build_http_client(&options).context("Failed to build HTTP client")
    }

    pub(crate) fn chat_api(&self, client: Client) -> ChatApi {
        ChatApi::new(client, self.base_url.clone())
    }

    pub(crate) fn downloader(&self, client: Client, output_dir: Option<&Path>) -> Downloader {
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| self.config.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        Downloader::new(client, Arc::new(DirectorySink::new(dir)))
            .with_default_extension(self.config.default_extension())
    }

    /// Resolves a possibly relative document URL against the backend root.
    pub(crate) fn resolve_url(&self, raw: &str) -> String {
        match Url::parse(raw) {
            Ok(_) => raw.to_string(),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base_url
                .join(raw)
                .map_or_else(|_| raw.to_string(), String::from),
            Err(_) => raw.to_string(),
        }
    }
}

/// Reads command text from positional args, or from piped stdin.
///
/// Returns `None` when neither is available.
pub(crate) fn read_input_text(parts: &[String]) -> Result<Option<String>> {
    if !parts.is_empty() {
        return Ok(Some(parts.join("\n")));
    }
    if io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(Some(buffer))
}

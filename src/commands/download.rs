//! `download` command: fetch one document.

use anyhow::Result;

use super::{ProcessExit, RunContext};
use crate::cli::DownloadArgs;

pub(crate) async fn run_download_command(
    ctx: &RunContext,
    args: &DownloadArgs,
) -> Result<ProcessExit> {
    let client = ctx.http_client()?;
    let downloader = ctx.downloader(client, args.output_dir.as_deref());
    let url = ctx.resolve_url(&args.url);

    let outcome = downloader.download(&url, args.name.as_deref()).await?;
    println!(
        "Saved {} ({} bytes)",
        outcome.saved_to.display(),
        outcome.byte_size
    );
    Ok(ProcessExit::Success)
}

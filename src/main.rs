//! CLI entry point for the docchat tool.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod cli;
mod commands;

use cli::{Args, Command, ConfigAction};
use commands::{ProcessExit, RunContext};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    init_tracing(default_level);
    debug!(?args, "CLI arguments parsed");

    match run(&args).await {
        Ok(outcome) => ExitCode::from(outcome.code()),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(ProcessExit::Failure.code())
        }
    }
}

async fn run(args: &Args) -> Result<ProcessExit> {
    let ctx = RunContext::from_args(args)?;
    match &args.command {
        Command::Extract(extract) => commands::run_extract_command(&ctx, extract),
        Command::Sanitize(sanitize) => commands::run_sanitize_command(&ctx, sanitize),
        Command::Filename(filename) => Ok(commands::run_filename_command(&ctx, filename)),
        Command::Download(download) => commands::run_download_command(&ctx, download).await,
        Command::Ask(ask) => commands::run_ask_command(&ctx, ask).await,
        Command::Documents(documents) => commands::run_documents_command(&ctx, documents).await,
        Command::Config {
            action: ConfigAction::Show,
        } => commands::run_config_show_command(&ctx),
    }
}

fn init_tracing(default_level: &str) {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_env_filter(filter)
        .try_init();
}

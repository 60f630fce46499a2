//! Offline commands: extract, sanitize, filename.

use anyhow::{Context, Result};
use docchat_core::config::FileConfig;
use docchat_core::{DiscoveredLink, PatternSet, Preset, sanitize};
use tracing::{debug, info};

use super::{ProcessExit, RunContext, read_input_text};
use crate::cli::{ExtractArgs, FilenameArgs, SanitizeArgs};

pub(crate) fn run_extract_command(ctx: &RunContext, args: &ExtractArgs) -> Result<ProcessExit> {
    let Some(text) = read_input_text(&args.text)? else {
        info!("No input provided. Pass reply text as arguments or pipe it via stdin.");
        return Ok(ProcessExit::Success);
    };

    let patterns = pattern_set(&ctx.config, args.pattern_set)?;
    let links = patterns.extract(&text);
    debug!(links = links.len(), patterns = patterns.len(), "extraction finished");

    if args.json {
        let json = serde_json::to_string_pretty(&links).context("Failed to encode links")?;
        println!("{json}");
    } else {
        for link in &links {
            println!("{}", format_link(link));
        }
    }
    Ok(ProcessExit::Success)
}

pub(crate) fn run_sanitize_command(ctx: &RunContext, args: &SanitizeArgs) -> Result<ProcessExit> {
    let Some(text) = read_input_text(&args.text)? else {
        info!("No input provided. Pass reply text as arguments or pipe it via stdin.");
        return Ok(ProcessExit::Success);
    };

    let links = pattern_set(&ctx.config, None)?.extract(&text);
    println!("{}", sanitize(&text, &links));
    Ok(ProcessExit::Success)
}

pub(crate) fn run_filename_command(ctx: &RunContext, args: &FilenameArgs) -> ProcessExit {
    let extension = args
        .ext
        .as_deref()
        .unwrap_or_else(|| ctx.config.default_extension());
    println!("{}", ctx.config.filename_policy().derive(&args.label, Some(extension)));
    ProcessExit::Success
}

/// Pattern set from config, with the preset optionally overridden.
pub(crate) fn pattern_set(config: &FileConfig, preset: Option<Preset>) -> Result<PatternSet> {
    match preset {
        Some(preset) => Ok(PatternSet::preset_with(preset, config.patterns.iter().cloned())?),
        None => config.pattern_set(),
    }
}

pub(crate) fn format_link(link: &DiscoveredLink) -> String {
    format!("{}\t{}\t{}", link.kind, link.label, link.url)
}

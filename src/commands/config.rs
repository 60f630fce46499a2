//! Config command handlers: show effective configuration.

use anyhow::Result;
use docchat_core::http::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};

use super::{ProcessExit, RunContext};

pub(crate) fn run_config_show_command(ctx: &RunContext) -> Result<ProcessExit> {
    for line in config_lines(ctx)? {
        println!("{line}");
    }
    Ok(ProcessExit::Success)
}

fn config_lines(ctx: &RunContext) -> Result<Vec<String>> {
    let config = &ctx.config;
    let resolved_path = ctx.config_path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    let output_dir = config
        .output_dir
        .as_ref()
        .map_or_else(|| ".".to_string(), |dir| dir.display().to_string());
    let policy = config.filename_policy();
    let patterns = config.pattern_set()?;

    Ok(vec![
        format!("config_path = {resolved_path}"),
        format!(
            "config_file = {}",
            if ctx.loaded_from_file {
                "loaded"
            } else {
                "not found (using defaults)"
            }
        ),
        format!("base_url = {}", ctx.base_url),
        format!("output_dir = {output_dir}"),
        format!(
            "session_cookie = {}",
            if config.session_cookie.is_some() {
                "<set>"
            } else {
                "<not set>"
            }
        ),
        format!(
            "connect_timeout_secs = {}",
            config.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS)
        ),
        format!(
            "read_timeout_secs = {}",
            config.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS)
        ),
        format!("default_extension = {}", config.default_extension()),
        format!(
            "pattern_set = {}",
            config.pattern_set.unwrap_or_default().as_str()
        ),
        format!(
            "patterns = {} ({} custom)",
            patterns.len(),
            config.patterns.len()
        ),
        format!("filename.extra_letters = {}", policy.extra_letters),
        format!("filename.fallback_stem = {}", policy.fallback_stem),
    ])
}

//! File configuration for the CLI.
//!
//! Values come from a TOML file; command-line flags override them. A missing
//! default file means defaults, a missing explicit `--config` file is an error.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::download::{DEFAULT_EXTENSION, FilenamePolicy};
use crate::http::{CONNECT_TIMEOUT_SECS, HttpOptions, READ_TIMEOUT_SECS};
use crate::links::{PatternSet, PatternSpec, Preset};

/// Backend used when neither the file nor the command line names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// TOML-backed configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Chat backend root, e.g. `http://localhost:5000`.
    pub base_url: Option<String>,
    /// Directory downloads are saved to.
    pub output_dir: Option<PathBuf>,
    /// Existing session cookie (`name=value`) for the backend.
    pub session_cookie: Option<String>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// HTTP total request timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Extension appended to downloaded names that have none.
    pub default_extension: Option<String>,
    /// Built-in link pattern set.
    pub pattern_set: Option<Preset>,
    /// Label-to-filename rules.
    pub filename: Option<FilenamePolicy>,
    /// Additional link patterns merged into the built-in set.
    #[serde(default)]
    pub patterns: Vec<PatternSpec>,
}

impl FileConfig {
    /// Validates config values.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = self.base_url.as_deref() {
            parse_base_url(base_url).context("Invalid config value for `base_url`")?;
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;

        if let Some(ext) = self.default_extension.as_deref()
            && (ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            bail!(
                "Invalid config value for `default_extension`: '{ext}'. Expected ASCII letters and digits"
            );
        }

        if let Some(policy) = &self.filename
            && policy.fallback_stem.trim().is_empty()
        {
            bail!("Invalid config value for `filename.fallback_stem`: must not be empty");
        }

        self.pattern_set()
            .context("Invalid config value for `patterns`")?;
        Ok(())
    }

    /// Backend root URL.
    ///
    /// # Errors
    ///
    /// Fails when the configured URL is not an absolute http(s) URL.
    pub fn base_url(&self) -> Result<Url> {
        parse_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
    }

    /// Compiled link patterns: the chosen preset plus `[[patterns]]`.
    ///
    /// # Errors
    ///
    /// Fails when a custom pattern does not compile.
    pub fn pattern_set(&self) -> Result<PatternSet> {
        let preset = self.pattern_set.unwrap_or_default();
        Ok(PatternSet::preset_with(preset, self.patterns.iter().cloned())?)
    }

    /// Filename rules, defaulting to Azerbaijani letters and `template`.
    #[must_use]
    pub fn filename_policy(&self) -> FilenamePolicy {
        self.filename.clone().unwrap_or_default()
    }

    /// Extension for extension-less download names.
    #[must_use]
    pub fn default_extension(&self) -> &str {
        self.default_extension.as_deref().unwrap_or(DEFAULT_EXTENSION)
    }

    /// HTTP client settings; the session cookie is scoped to the base URL.
    ///
    /// # Errors
    ///
    /// Fails when the base URL is invalid.
    pub fn http_options(&self) -> Result<HttpOptions> {
        Ok(HttpOptions {
            connect_timeout_secs: self.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS),
            read_timeout_secs: self.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS),
            session_cookie: self.session_cookie.clone(),
            cookie_url: Some(self.base_url()?),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("base URL must not be empty");
    }
    let url = Url::parse(trimmed).with_context(|| format!("'{trimmed}' is not a valid URL"))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        bail!("'{trimmed}' is not an http(s) URL");
    }
    Ok(url)
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Config path consulted, if one could be resolved.
    pub path: Option<PathBuf>,
    /// Parsed config, or defaults when no file was found.
    pub config: FileConfig,
    /// Whether the file existed and was read.
    pub loaded_from_file: bool,
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/docchat/config.toml`
/// 2. `$HOME/.config/docchat/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    config_path_from(env_var_non_empty_os("XDG_CONFIG_HOME"), env_var_non_empty_os("HOME"))
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(xdg) = xdg_config_home {
        return Some(PathBuf::from(xdg).join("docchat").join("config.toml"));
    }
    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("docchat")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads `explicit` if given, otherwise the default config file if present.
///
/// # Errors
///
/// Fails when an explicit file is missing, or when a file cannot be read,
/// parsed or validated.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("Config file '{}' does not exist", path.display());
        }
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: load_file_config(path)?,
            loaded_from_file: true,
        });
    }

    let path = resolve_default_config_path();
    match path.as_deref() {
        Some(path_ref) if path_ref.exists() => {
            let config = load_file_config(path_ref)?;
            Ok(LoadedConfig {
                path,
                config,
                loaded_from_file: true,
            })
        }
        _ => {
            debug!(path = ?path, "no config file, using defaults");
            Ok(LoadedConfig {
                path,
                ..LoadedConfig::default()
            })
        }
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config = parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    debug!(path = %path.display(), custom_patterns = config.patterns.len(), "config loaded");
    Ok(config)
}

/// Parses and validates TOML config text.
///
/// # Errors
///
/// Fails on TOML syntax errors, unknown keys or invalid values.
pub fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let config: FileConfig = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::links::LinkKind;

    #[test]
    fn test_parse_config_empty_uses_defaults() {
        let cfg = parse_config_str("").unwrap();
        assert_eq!(cfg.base_url().unwrap().as_str(), "http://localhost:5000/");
        assert_eq!(cfg.default_extension(), "docx");
        assert_eq!(cfg.filename_policy(), FilenamePolicy::default());
        let http = cfg.http_options().unwrap();
        assert_eq!(http.connect_timeout_secs, 30);
        assert_eq!(http.read_timeout_secs, 300);
    }

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
base_url = "https://docs.example.az"
output_dir = "/tmp/forms" # inline comment
session_cookie = "session=abc"
read_timeout_secs = 60
pattern_set = "chat_view"
"#,
        )
        .unwrap();
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/tmp/forms")));
        assert_eq!(cfg.pattern_set, Some(Preset::ChatView));
        let http = cfg.http_options().unwrap();
        assert_eq!(http.read_timeout_secs, 60);
        assert_eq!(http.session_cookie.as_deref(), Some("session=abc"));
        assert_eq!(
            http.cookie_url.unwrap().host_str(),
            Some("docs.example.az")
        );
    }

    #[test]
    fn test_parse_config_rejects_unknown_key() {
        let err = parse_config_str("concurrency = 4").unwrap_err();
        assert!(format!("{err:#}").contains("concurrency"));
    }

    #[test]
    fn test_parse_config_rejects_timeout_out_of_range() {
        let err = parse_config_str("connect_timeout_secs = 0").unwrap_err();
        assert!(err.to_string().contains("connect_timeout_secs"));
        assert!(parse_config_str("read_timeout_secs = 3601").is_err());
        assert!(parse_config_str("read_timeout_secs = 3600").is_ok());
    }

    #[test]
    fn test_parse_config_rejects_bad_base_url() {
        assert!(parse_config_str(r#"base_url = """#).is_err());
        assert!(parse_config_str(r#"base_url = "ftp://files.example.az""#).is_err());
        assert!(parse_config_str(r#"base_url = "not a url""#).is_err());
    }

    #[test]
    fn test_parse_config_rejects_bad_extension() {
        assert!(parse_config_str(r#"default_extension = "../x""#).is_err());
        assert!(parse_config_str(r#"default_extension = """#).is_err());
        let cfg = parse_config_str(r#"default_extension = "pdf""#).unwrap();
        assert_eq!(cfg.default_extension(), "pdf");
    }

    #[test]
    fn test_parse_config_filename_table() {
        let cfg = parse_config_str(
            r#"
[filename]
extra_letters = ""
fallback_stem = "sened"
"#,
        )
        .unwrap();
        let policy = cfg.filename_policy();
        assert_eq!(policy.derive("!!!", None), "sened.docx");
        assert_eq!(policy.derive("Ərizə", None), "riz.docx");
    }

    #[test]
    fn test_parse_config_rejects_blank_fallback_stem() {
        let err = parse_config_str("[filename]\nfallback_stem = \"  \"").unwrap_err();
        assert!(err.to_string().contains("fallback_stem"));
    }

    #[test]
    fn test_parse_config_custom_pattern_is_merged() {
        let cfg = parse_config_str(
            r#"
[[patterns]]
name = "arrow"
regex = '=>\s*(https?://\S+)'
kind = "keyword_direct"
url_group = 1
priority = 5
default_label = "Fayl"
"#,
        )
        .unwrap();
        let set = cfg.pattern_set().unwrap();
        assert_eq!(set.len(), 5);
        let links = set.extract("Buyurun => https://files.example.az/a.docx");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].label, "Fayl");
        assert_eq!(links[0].kind, LinkKind::KeywordDirect);
    }

    #[test]
    fn test_parse_config_rejects_pattern_with_missing_group() {
        let err = parse_config_str(
            r#"
[[patterns]]
name = "broken"
regex = 'https?://\S+'
kind = "markdown"
url_group = 1
priority = 1
"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("broken"));
    }

    #[test]
    fn test_config_path_prefers_xdg() {
        let path = config_path_from(Some("/xdg".into()), Some("/home/u".into())).unwrap();
        assert_eq!(path, PathBuf::from("/xdg/docchat/config.toml"));
    }

    #[test]
    fn test_config_path_falls_back_to_home() {
        let path = config_path_from(None, Some("/home/u".into())).unwrap();
        assert_eq!(path, PathBuf::from("/home/u/.config/docchat/config.toml"));
        assert!(config_path_from(None, None).is_none());
    }

    #[test]
    fn test_load_config_explicit_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_config_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_extension = \"pdf\"\n").unwrap();
        let loaded = load_config(Some(&path)).unwrap();
        assert!(loaded.loaded_from_file);
        assert_eq!(loaded.path.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.config.default_extension(), "pdf");
    }
}

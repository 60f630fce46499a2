//! A single link pattern: a compiled matcher plus the capture layout it uses.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::trace;
use url::Url;

use super::error::PatternError;

/// Generic label used when a pattern has neither a label group nor a default label.
///
/// "Yüklə" is Azerbaijani for "download".
pub const FALLBACK_LABEL: &str = "Yüklə";

/// The textual shape a link was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// `[label](https://...)`
    Markdown,
    /// `📥 label: https://...`
    EmojiDirect,
    /// `**label:** https://...`
    BoldDirect,
    /// `download: https://...` with a fixed keyword and no label.
    KeywordDirect,
}

impl LinkKind {
    /// Returns the stable snake-case name used in config and JSON output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::EmojiDirect => "emoji_direct",
            Self::BoldDirect => "bold_direct",
            Self::KeywordDirect => "keyword_direct",
        }
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uncompiled pattern definition, as written in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PatternSpec {
    /// Name used in logs and error messages.
    pub name: String,
    /// Regular expression source.
    pub regex: String,
    /// Kind assigned to links found by this pattern.
    pub kind: LinkKind,
    /// Capture group holding the URL.
    pub url_group: usize,
    /// Capture group holding the human-readable label, if any.
    #[serde(default)]
    pub label_group: Option<usize>,
    /// Lower numbers win when two patterns find the same URL.
    pub priority: u32,
    /// Label used when the pattern captures none.
    #[serde(default)]
    pub default_label: Option<String>,
}

/// A compiled, immutable link pattern.
#[derive(Debug, Clone)]
pub struct LinkPattern {
    name: String,
    matcher: Regex,
    kind: LinkKind,
    url_group: usize,
    label_group: Option<usize>,
    priority: u32,
    default_label: Option<String>,
}

impl LinkPattern {
    /// Compiles a pattern definition, checking that its group indices exist.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidRegex`] if the regex does not compile, or
    /// [`PatternError::MissingGroup`] if `url_group`/`label_group` name a group
    /// the regex does not have (group 0 is the whole match and is not allowed
    /// for the URL).
    pub fn compile(spec: PatternSpec) -> Result<Self, PatternError> {
        let matcher =
            Regex::new(&spec.regex).map_err(|e| PatternError::invalid_regex(&spec.name, &e))?;
        let groups = matcher.captures_len();

        if spec.url_group == 0 || spec.url_group >= groups {
            return Err(PatternError::missing_group(&spec.name, "url_group", spec.url_group, groups));
        }
        if let Some(label_group) = spec.label_group
            && (label_group == 0 || label_group >= groups)
        {
            return Err(PatternError::missing_group(&spec.name, "label_group", label_group, groups));
        }

        Ok(Self {
            name: spec.name,
            matcher,
            kind: spec.kind,
            url_group: spec.url_group,
            label_group: spec.label_group,
            priority: spec.priority,
            default_label: spec.default_label,
        })
    }

    /// Pattern name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind assigned to matches.
    #[must_use]
    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    /// Priority; lower wins.
    #[must_use]
    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub(crate) fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Extracts and validates the URL capture, or `None` if the match has no usable URL.
    pub(crate) fn capture_url(&self, captures: &Captures<'_>) -> Option<String> {
        let raw = captures.get(self.url_group)?.as_str().trim();
        let cleaned = clean_url_trailing(raw);
        if cleaned.is_empty() || !cleaned.starts_with("http") {
            trace!(pattern = %self.name, raw = %raw, "capture is not an http URL");
            return None;
        }
        if !is_http_url(cleaned) {
            trace!(pattern = %self.name, url = %cleaned, "capture failed URL shape check");
            return None;
        }
        Some(cleaned.to_string())
    }

    /// Resolves the label: captured group, then the default label, then [`FALLBACK_LABEL`].
    pub(crate) fn resolve_label(&self, captures: &Captures<'_>) -> String {
        self.label_group
            .and_then(|group| captures.get(group))
            .map(|m| tidy_label(m.as_str()))
            .filter(|label| !label.is_empty())
            .or_else(|| self.default_label.clone())
            .unwrap_or_else(|| FALLBACK_LABEL.to_string())
    }
}

fn tidy_label(raw: &str) -> String {
    raw.trim().trim_end_matches(':').trim_end().to_string()
}

/// Strips sentence punctuation that a greedy URL capture picks up from prose.
pub(crate) fn clean_url_trailing(url: &str) -> &str {
    let mut result = url;

    while let Some(last) = result.chars().last() {
        match last {
            '.' | ',' | ';' | ':' | '!' | '?' => {
                result = &result[..result.len() - 1];
            }
            ')' | ']' => {
                // Keep the closer when the URL itself opened it (e.g. wiki-style paths).
                let open = if last == ')' { '(' } else { '[' };
                let open_count = result.chars().filter(|&c| c == open).count();
                let close_count = result.chars().filter(|&c| c == last).count();
                if close_count > open_count {
                    result = &result[..result.len() - 1];
                } else {
                    break;
                }
            }
            _ => break,
        }
    }

    result
}

/// Returns true for parseable `http`/`https` URLs with a host.
pub(crate) fn is_http_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
}

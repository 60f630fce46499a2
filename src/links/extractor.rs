//! Priority-ordered link extraction over chat text.

use std::collections::HashMap;
use std::ops::Range;

use serde::Serialize;
use tracing::{debug, trace};

use super::error::PatternError;
use super::pattern::{LinkKind, LinkPattern, PatternSpec};
use super::presets::Preset;

/// One link found in a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredLink {
    /// Human-readable label shown next to the download affordance.
    pub label: String,
    /// The http(s) URL, trimmed of surrounding punctuation.
    pub url: String,
    /// Shape of the text the link was found in.
    pub kind: LinkKind,
    /// Exact substring of the source text consumed by the match.
    pub full_match: String,
    /// Priority of the pattern that produced this link.
    pub priority: u32,
    /// Text of later matches of the same URL in other places, which
    /// [`sanitize`](super::sanitize) removes along with `full_match`.
    #[serde(skip)]
    pub duplicate_matches: Vec<String>,
}

/// An immutable, priority-ordered collection of link patterns.
///
/// Patterns are sorted once on construction; equal priorities keep the order
/// they were given in. The set holds compiled regexes only, so extraction calls
/// share no scan state and the set can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<LinkPattern>,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl PatternSet {
    /// Builds a set from compiled patterns.
    #[must_use]
    pub fn new(mut patterns: Vec<LinkPattern>) -> Self {
        patterns.sort_by_key(LinkPattern::priority);
        Self { patterns }
    }

    /// Builds a set from uncompiled definitions.
    ///
    /// # Errors
    ///
    /// Returns the first [`PatternError`] encountered.
    pub fn from_specs(specs: impl IntoIterator<Item = PatternSpec>) -> Result<Self, PatternError> {
        let patterns = specs
            .into_iter()
            .map(LinkPattern::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(patterns))
    }

    /// Builds one of the built-in sets.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn preset(preset: Preset) -> Self {
        // Static patterns, covered by tests; safe to panic
        Self::from_specs(preset.specs()).expect("built-in link patterns are valid")
    }

    /// Returns a built-in set extended with additional definitions.
    ///
    /// # Errors
    ///
    /// Returns the first [`PatternError`] among `extra`.
    pub fn preset_with(
        preset: Preset,
        extra: impl IntoIterator<Item = PatternSpec>,
    ) -> Result<Self, PatternError> {
        Self::from_specs(preset.specs().into_iter().chain(extra))
    }

    /// Patterns in priority order.
    #[must_use]
    pub fn patterns(&self) -> &[LinkPattern] {
        &self.patterns
    }

    /// Number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if the set has no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Finds every download link in `text`.
    ///
    /// Each pattern is scanned in priority order over the whole text. A URL is
    /// reported once, by the first (highest-priority) pattern that yields it.
    /// Later matches of that URL outside any already consumed region are kept
    /// in [`DiscoveredLink::duplicate_matches`]. Captures that are empty or not
    /// http(s) URLs are skipped. The result is sorted by priority, ties in
    /// discovery order.
    #[must_use]
    #[tracing::instrument(level = "debug", skip(self, text), fields(text_len = text.len()))]
    pub fn extract(&self, text: &str) -> Vec<DiscoveredLink> {
        let mut links: Vec<DiscoveredLink> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut consumed: Vec<Range<usize>> = Vec::new();

        for pattern in &self.patterns {
            for captures in pattern.matcher().captures_iter(text) {
                let Some(url) = pattern.capture_url(&captures) else {
                    continue;
                };
                let Some(whole) = captures.get(0) else {
                    continue;
                };
                let span = whole.range();
                let overlaps = consumed
                    .iter()
                    .any(|taken| taken.start < span.end && span.start < taken.end);

                if let Some(&index) = seen.get(&url) {
                    if overlaps || whole.as_str().is_empty() {
                        trace!(pattern = pattern.name(), url = %url, "overlapping duplicate skipped");
                    } else {
                        trace!(pattern = pattern.name(), url = %url, "duplicate URL recorded");
                        links[index].duplicate_matches.push(whole.as_str().to_string());
                        consumed.push(span);
                    }
                    continue;
                }

                let label = pattern.resolve_label(&captures);
                trace!(pattern = pattern.name(), url = %url, label = %label, "link found");

                seen.insert(url.clone(), links.len());
                consumed.push(span);
                links.push(DiscoveredLink {
                    label,
                    url,
                    kind: pattern.kind(),
                    full_match: whole.as_str().to_string(),
                    priority: pattern.priority(),
                    duplicate_matches: Vec::new(),
                });
            }
        }

        links.sort_by_key(|link| link.priority);
        debug!(links = links.len(), "extraction complete");
        links
    }
}

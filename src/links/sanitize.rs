//! Removal of matched link text from chat replies.

use std::sync::LazyLock;

use regex::Regex;

use super::extractor::DiscoveredLink;

#[allow(clippy::expect_used)]
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank-line regex is valid")); // Static pattern, safe to panic

#[allow(clippy::expect_used)]
static INLINE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]{2,}").expect("whitespace regex is valid")); // Static pattern, safe to panic

/// Strips each link's matched text from `text` and tidies the remaining prose.
///
/// Each `full_match`, and each of the link's `duplicate_matches`, is removed
/// once at its first occurrence, so identical text elsewhere in the message
/// survives. Line endings are normalized to `\n`; afterwards runs of three or
/// more newlines become a blank line, runs of other whitespace become one
/// space, and the result is trimmed.
#[must_use]
pub fn sanitize(text: &str, links: &[DiscoveredLink]) -> String {
    let mut cleaned = text.to_string();
    let matched = links.iter().flat_map(|link| {
        std::iter::once(&link.full_match).chain(link.duplicate_matches.iter())
    });
    for fragment in matched {
        if fragment.is_empty() {
            continue;
        }
        cleaned = cleaned.replacen(fragment.as_str(), "", 1);
    }
    let cleaned = cleaned.replace("\r\n", "\n");

    let cleaned = BLANK_LINES.replace_all(&cleaned, "\n\n");
    let cleaned = INLINE_WHITESPACE.replace_all(&cleaned, " ");
    cleaned.trim().to_string()
}

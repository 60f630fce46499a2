//! Download-link extraction from assistant chat replies.
//!
//! Replies from the document-chat backend embed download links in several
//! shapes: markdown links, emoji-prefixed lines, bold labels and bare
//! keyword-prefixed URLs. This module finds them, deduplicates by URL and
//! removes them from the prose.
//!
//! # Architecture
//!
//! - [`LinkPattern`] - one compiled matcher with its capture layout and priority
//! - [`PatternSet`] - immutable, priority-ordered patterns; runs the extraction
//! - [`Preset`] - built-in pattern sets (`canonical`, `chat_view`)
//! - [`sanitize`] - strips matched link text from a reply
//!
//! # Example
//!
//! ```
//! use docchat_core::links::{extract_links, sanitize};
//!
//! let reply = "Hazırdır. [Ərizə](https://docs.example.com/api/documents/4/download)";
//! let links = extract_links(reply);
//! assert_eq!(links.len(), 1);
//! assert_eq!(links[0].label, "Ərizə");
//! assert_eq!(sanitize(reply, &links), "Hazırdır.");
//! ```

mod error;
mod extractor;
mod pattern;
mod presets;
mod sanitize;

use std::sync::LazyLock;

pub use error::PatternError;
pub use extractor::{DiscoveredLink, PatternSet};
pub use pattern::{FALLBACK_LABEL, LinkKind, LinkPattern, PatternSpec};
pub use presets::Preset;
pub use sanitize::sanitize;

static CANONICAL: LazyLock<PatternSet> = LazyLock::new(PatternSet::default);

/// Extracts links from `text` with the canonical pattern set.
///
/// Use [`PatternSet::extract`] directly when the pattern set comes from
/// configuration.
#[must_use]
pub fn extract_links(text: &str) -> Vec<DiscoveredLink> {
    CANONICAL.extract(text)
}

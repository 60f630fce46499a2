//! Built-in link pattern definitions.
//!
//! The backend writes links in a handful of shapes. The chat view historically
//! recognised all of them except keyword-prefixed links, so both variants are
//! kept as named presets rather than as two copies of the parsing code.

use serde::{Deserialize, Serialize};

use super::pattern::{FALLBACK_LABEL, LinkKind, PatternSpec};

/// URL body of the direct-link patterns: stops at whitespace, quotes,
/// angle brackets and closing brackets.
const URL: &str = r#"https?://[^\s<>"'\)\]]+"#;

/// URL inside markdown `(...)`: like `URL`, but may contain balanced
/// one-level parentheses such as `wiki/Foo_(bar)`.
const PAREN_URL: &str = r#"https?://(?:[^\s<>"'()\]]|\([^\s<>"'()\]]*\))+"#;

/// Named built-in pattern sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Markdown, emoji, bold and keyword-prefixed links.
    #[default]
    Canonical,
    /// Same as canonical without keyword-prefixed links.
    ChatView,
}

impl Preset {
    /// Name used in config files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::ChatView => "chat_view",
        }
    }

    /// Pattern definitions for this preset, in priority order.
    #[must_use]
    pub fn specs(self) -> Vec<PatternSpec> {
        let mut specs = vec![markdown(), emoji_direct(), bold_direct()];
        if self == Self::Canonical {
            specs.push(keyword_direct());
        }
        specs
    }
}

fn markdown() -> PatternSpec {
    PatternSpec {
        name: "markdown".to_string(),
        regex: format!(r"\[([^\]\n]*)\]\(\s*({PAREN_URL})\s*\)"),
        kind: LinkKind::Markdown,
        url_group: 2,
        label_group: Some(1),
        priority: 1,
        default_label: None,
    }
}

fn emoji_direct() -> PatternSpec {
    PatternSpec {
        name: "emoji_direct".to_string(),
        regex: format!(r"[📥🔗📄]\s*([^:\n\[\]*]+?)\s*:\s*(?:\*\*\s*)?({URL})"),
        kind: LinkKind::EmojiDirect,
        url_group: 2,
        label_group: Some(1),
        priority: 2,
        default_label: None,
    }
}

fn bold_direct() -> PatternSpec {
    PatternSpec {
        name: "bold_direct".to_string(),
        regex: format!(r"\*\*([^*\n]+?)\*\*\s*:?\s*({URL})"),
        kind: LinkKind::BoldDirect,
        url_group: 2,
        label_group: Some(1),
        priority: 3,
        default_label: None,
    }
}

fn keyword_direct() -> PatternSpec {
    PatternSpec {
        name: "keyword_direct".to_string(),
        regex: format!(r"(?i)\b(?:yükləmə linki|yüklə|yukle|download|link)\s*:\s*({URL})"),
        kind: LinkKind::KeywordDirect,
        url_group: 1,
        label_group: None,
        priority: 4,
        default_label: Some(FALLBACK_LABEL.to_string()),
    }
}

//! Error types for building link pattern sets.
//!
//! Extraction itself never fails; these errors only arise when a pattern set is
//! assembled from user-supplied definitions.

use thiserror::Error;

/// Errors raised while compiling a [`LinkPattern`](super::LinkPattern).
#[derive(Debug, Clone, Error)]
pub enum PatternError {
    /// The regex source does not compile.
    #[error("link pattern '{name}' has an invalid regex: {reason}")]
    InvalidRegex {
        /// Pattern name.
        name: String,
        /// Compiler message.
        reason: String,
    },

    /// A configured capture group index does not exist in the regex.
    #[error("link pattern '{name}': {field} = {index} but the regex has {available} capture group(s)")]
    MissingGroup {
        /// Pattern name.
        name: String,
        /// Which field was wrong (`url_group` or `label_group`).
        field: &'static str,
        /// The configured index.
        index: usize,
        /// Number of explicit capture groups in the regex.
        available: usize,
    },
}

impl PatternError {
    /// Creates an `InvalidRegex` error.
    #[must_use]
    pub fn invalid_regex(name: &str, source: &regex::Error) -> Self {
        Self::InvalidRegex {
            name: name.to_string(),
            reason: source.to_string(),
        }
    }

    /// Creates a `MissingGroup` error. `captures_len` counts the implicit group 0.
    #[must_use]
    pub fn missing_group(name: &str, field: &'static str, index: usize, captures_len: usize) -> Self {
        Self::MissingGroup {
            name: name.to_string(),
            field,
            index,
            available: captures_len.saturating_sub(1),
        }
    }
}

//! Filename derivation, Content-Disposition parsing and path resolution.
//!
//! Two jobs live here: turning a human-readable link label into a safe
//! filename ([`FilenamePolicy`]), and choosing the name a downloaded document
//! is saved under ([`resolve_download_filename`]).

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use url::Url;

/// Extension appended when a filename has none (the backend's primary format).
pub const DEFAULT_EXTENSION: &str = "docx";

/// Stem used by [`FilenamePolicy`] when a label has no usable characters.
pub const DEFAULT_FALLBACK_STEM: &str = "template";

/// Name used for downloads when neither headers nor URL provide one.
pub const FALLBACK_DOWNLOAD_NAME: &str = "download";

/// Azerbaijani letters outside a-z that labels may keep.
pub const AZERBAIJANI_LETTERS: &str = "əıöüçşğ";

/// Rules for turning a label into a filename.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilenamePolicy {
    /// Letters kept in addition to ASCII letters and digits, compared after lowercasing.
    pub extra_letters: String,
    /// Stem used when nothing survives normalization.
    pub fallback_stem: String,
}

impl Default for FilenamePolicy {
    fn default() -> Self {
        Self {
            extra_letters: AZERBAIJANI_LETTERS.to_string(),
            fallback_stem: DEFAULT_FALLBACK_STEM.to_string(),
        }
    }
}

impl FilenamePolicy {
    /// Derives `stem.extension` from a label.
    ///
    /// The label is lowercased; characters that are not ASCII alphanumerics,
    /// configured extra letters or separators are dropped; whitespace and
    /// underscore runs become a single `_`, never leading or trailing. An
    /// empty stem becomes the fallback stem. The extension keeps only ASCII
    /// alphanumerics and defaults to [`DEFAULT_EXTENSION`].
    #[must_use]
    pub fn derive(&self, label: &str, extension: Option<&str>) -> String {
        let mut stem = String::with_capacity(label.len());
        let mut pending_separator = false;

        for ch in label.to_lowercase().chars() {
            if ch.is_whitespace() || ch == '_' {
                pending_separator = true;
            } else if ch.is_ascii_alphanumeric() || self.extra_letters.contains(ch) {
                if pending_separator && !stem.is_empty() {
                    stem.push('_');
                }
                pending_separator = false;
                stem.push(ch);
            }
        }

        if stem.is_empty() {
            stem = sanitize_filename_component(&self.fallback_stem);
        }
        if stem.is_empty() {
            stem = DEFAULT_FALLBACK_STEM.to_string();
        }

        format!("{stem}.{}", normalize_extension(extension))
    }
}

/// Derives a filename from a label with the default (Azerbaijani) policy.
///
/// # Example
///
/// ```
/// use docchat_core::derive_filename;
///
/// assert_eq!(derive_filename("Mezuniyyet Ərizesi", None), "mezuniyyet_ərizesi.docx");
/// assert_eq!(derive_filename("!!!", Some("pdf")), "template.pdf");
/// ```
#[must_use]
pub fn derive_filename(label: &str, extension: Option<&str>) -> String {
    FilenamePolicy::default().derive(label, extension)
}

fn normalize_extension(extension: Option<&str>) -> String {
    let cleaned: String = extension
        .unwrap_or(DEFAULT_EXTENSION)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    if cleaned.is_empty() {
        DEFAULT_EXTENSION.to_string()
    } else {
        cleaned
    }
}

/// Picks the filename for a downloaded document.
///
/// Preference order: the caller's suggestion, the `Content-Disposition`
/// filename, the last URL path segment, then [`FALLBACK_DOWNLOAD_NAME`]. The
/// winner is made filesystem-safe and gets `.default_extension` appended when
/// it contains no `.`.
#[must_use]
pub fn resolve_download_filename(
    suggested: Option<&str>,
    content_disposition: Option<&str>,
    url: &Url,
    default_extension: &str,
) -> String {
    let chosen = suggested
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .or_else(|| content_disposition.and_then(parse_content_disposition))
        .or_else(|| filename_from_url(url))
        .unwrap_or_else(|| FALLBACK_DOWNLOAD_NAME.to_string());

    let mut name = sanitize_filename(chosen.trim());
    if name.trim_matches(['_', '.']).is_empty() {
        name = FALLBACK_DOWNLOAD_NAME.to_string();
    }
    if !name.contains('.') {
        name.push('.');
        name.push_str(&normalize_extension(Some(default_extension)));
    }
    name
}

/// Last non-empty URL path segment, percent-decoded.
pub(crate) fn filename_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    if last.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(last).map_or_else(|_| last.to_string(), |d| d.into_owned());
    Some(decoded)
}

/// Parses Content-Disposition header to extract filename.
///
/// Handles both:
/// - `attachment; filename="example.pdf"`
/// - `attachment; filename=example.pdf`
/// - `attachment; filename*=UTF-8''example.pdf` (RFC 5987)
pub(crate) fn parse_content_disposition(header: &str) -> Option<String> {
    if let Some(pos) = header.find("filename*=") {
        let value = header[pos + 10..].trim();
        // charset'language'encoded_value
        if let Some(quote_pos) = value.find("''") {
            let encoded = &value[quote_pos + 2..];
            let end = encoded.find(';').unwrap_or(encoded.len());
            let encoded_name = encoded[..end].trim().trim_matches('"');
            if let Ok(decoded) = urlencoding::decode(encoded_name)
                && !decoded.is_empty()
            {
                return Some(decoded.into_owned());
            }
        }
    }

    let pos = header.find("filename=")?;
    let value = header[pos + 9..].trim();

    if let Some(stripped) = value.strip_prefix('"') {
        let end = stripped.find('"')?;
        let quoted = &stripped[..end];
        return (!quoted.trim().is_empty()).then(|| quoted.to_string());
    }

    let end = value.find(';').unwrap_or(value.len());
    let filename = value[..end].trim();
    (!filename.is_empty()).then(|| filename.to_string())
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn sanitize_filename_component(value: &str) -> String {
    let mut out = String::new();
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_alphanumeric() || ch == '-' {
            out.push(ch);
            prev_sep = false;
        } else if !prev_sep {
            out.push('_');
            prev_sep = true;
        }
    }
    out.trim_matches('_').to_string()
}

/// Resolves a unique file path, adding a numeric suffix if the file exists.
///
/// `report.pdf`, then `report_1.pdf`, `report_2.pdf`, ...
pub(crate) fn resolve_unique_path(dir: &Path, filename: &str) -> PathBuf {
    let filename = {
        let sanitized = sanitize_filename(filename);
        if sanitized.trim_matches('_').is_empty() {
            format!("{FALLBACK_DOWNLOAD_NAME}.{DEFAULT_EXTENSION}")
        } else {
            sanitized
        }
    };
    let base_path = dir.join(&filename);

    if !base_path.exists() {
        return base_path;
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(pos) if pos > 0 => (&filename[..pos], &filename[pos..]),
        _ => (filename.as_str(), ""),
    };

    for i in 1..1000 {
        let candidate = dir.join(format!("{stem}_{i}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
    }

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    dir.join(format!("{stem}_{timestamp}{ext}"))
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Component;

    use super::*;
    use tempfile::TempDir;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    // --- FilenamePolicy::derive ---

    #[test]
    fn test_derive_keeps_azerbaijani_letters() {
        assert_eq!(
            derive_filename("Mezuniyyet Ərizesi", Some("docx")),
            "mezuniyyet_ərizesi.docx"
        );
        assert_eq!(
            derive_filename("Ezamiyyət Ərizəsi", None),
            "ezamiyyət_ərizəsi.docx"
        );
    }

    #[test]
    fn test_derive_empty_stem_uses_fallback() {
        assert_eq!(derive_filename("!!!", Some("docx")), "template.docx");
        assert_eq!(derive_filename("", None), "template.docx");
        assert_eq!(derive_filename("   ", None), "template.docx");
    }

    #[test]
    fn test_derive_collapses_separators_and_trims_underscores() {
        assert_eq!(derive_filename("  __Müqavilə  -  Şablonu__ ", None), "müqavilə_şablonu.docx");
        assert_eq!(derive_filename("a - b", None), "a_b.docx");
        assert_eq!(derive_filename("a-b", None), "ab.docx");
    }

    #[test]
    fn test_derive_drops_path_and_reserved_characters() {
        let name = derive_filename("../etc/passwd: <x>|y?", None);
        assert_eq!(name, "etcpasswd_xy.docx");
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_derive_normalizes_extension() {
        assert_eq!(derive_filename("Forma", Some(".PDF")), "forma.pdf");
        assert_eq!(derive_filename("Forma", Some("")), "forma.docx");
        assert_eq!(derive_filename("Forma", Some("../x")), "forma.x");
    }

    #[test]
    fn test_derive_without_extra_letters_drops_them() {
        let policy = FilenamePolicy {
            extra_letters: String::new(),
            fallback_stem: "blank".to_string(),
        };
        assert_eq!(policy.derive("Ərizə", None), "riz.docx");
        assert_eq!(policy.derive("əəə", None), "blank.docx");
    }

    #[test]
    fn test_derive_output_is_lowercase_and_safe() {
        let name = derive_filename("İş Müqaviləsi 2024", None);
        assert_eq!(name, "iş_müqaviləsi_2024.docx");
        assert!(!name.starts_with('_'));
    }

    // --- resolve_download_filename ---

    #[test]
    fn test_resolve_prefers_suggestion() {
        let name = resolve_download_filename(
            Some("forma.pdf"),
            Some(r#"attachment; filename="report.pdf""#),
            &url("https://x.test/a.docx"),
            DEFAULT_EXTENSION,
        );
        assert_eq!(name, "forma.pdf");
    }

    #[test]
    fn test_resolve_uses_content_disposition_over_url() {
        let name = resolve_download_filename(
            None,
            Some(r#"attachment; filename="report.pdf""#),
            &url("https://x.test/api/documents/3/download"),
            DEFAULT_EXTENSION,
        );
        assert_eq!(name, "report.pdf");
    }

    #[test]
    fn test_resolve_falls_back_to_url_segment_with_default_extension() {
        let name = resolve_download_filename(
            None,
            None,
            &url("https://x.test/api/documents/3/download"),
            DEFAULT_EXTENSION,
        );
        assert_eq!(name, "download.docx");
    }

    #[test]
    fn test_resolve_decodes_url_segment() {
        let name = resolve_download_filename(
            None,
            None,
            &url("https://x.test/files/%C9%99riz%C9%99.pdf"),
            DEFAULT_EXTENSION,
        );
        assert_eq!(name, "ərizə.pdf");
    }

    #[test]
    fn test_resolve_without_any_source_uses_fallback() {
        let name = resolve_download_filename(None, None, &url("https://x.test/"), "docx");
        assert_eq!(name, "download.docx");
    }

    #[test]
    fn test_resolve_blank_suggestion_is_ignored() {
        let name = resolve_download_filename(Some("  "), None, &url("https://x.test/f.pdf"), "docx");
        assert_eq!(name, "f.pdf");
    }

    #[test]
    fn test_resolve_sanitizes_header_supplied_path() {
        let name = resolve_download_filename(
            None,
            Some(r#"attachment; filename="../../secret""#),
            &url("https://x.test/a"),
            "docx",
        );
        assert!(!name.contains('/'));
        assert!(name.ends_with(".docx") || name.contains('.'));
    }

    // --- parse_content_disposition ---

    #[test]
    fn test_parse_content_disposition_quoted() {
        let header = r#"attachment; filename="example.pdf""#;
        assert_eq!(parse_content_disposition(header), Some("example.pdf".to_string()));
    }

    #[test]
    fn test_parse_content_disposition_unquoted() {
        let header = "attachment; filename=example.pdf";
        assert_eq!(parse_content_disposition(header), Some("example.pdf".to_string()));
    }

    #[test]
    fn test_parse_content_disposition_with_semicolon() {
        let header = r#"attachment; filename="example.pdf"; size=1234"#;
        assert_eq!(parse_content_disposition(header), Some("example.pdf".to_string()));
    }

    #[test]
    fn test_parse_content_disposition_rfc5987() {
        let header = "attachment; filename*=UTF-8''M%C9%99zuniyy%C9%99t.docx";
        assert_eq!(parse_content_disposition(header), Some("Məzuniyyət.docx".to_string()));
    }

    #[test]
    fn test_parse_content_disposition_prefers_rfc5987_over_plain() {
        let header = "attachment; filename=\"fallback.docx\"; filename*=UTF-8''real.docx";
        assert_eq!(parse_content_disposition(header), Some("real.docx".to_string()));
    }

    #[test]
    fn test_parse_content_disposition_missing() {
        assert_eq!(parse_content_disposition("attachment"), None);
        assert_eq!(parse_content_disposition(r#"attachment; filename="""#), None);
    }

    // --- sanitize_filename / resolve_unique_path ---

    #[test]
    fn test_sanitize_filename_removes_invalid_chars() {
        assert_eq!(sanitize_filename("file/name.pdf"), "file_name.pdf");
        assert_eq!(sanitize_filename("file\\name.pdf"), "file_name.pdf");
        assert_eq!(sanitize_filename("file:name.pdf"), "file_name.pdf");
        assert_eq!(sanitize_filename("file<name>.pdf"), "file_name_.pdf");
    }

    #[test]
    fn test_sanitize_filename_rewrites_dot_segments() {
        assert_eq!(sanitize_filename("."), "_");
        assert_eq!(sanitize_filename(".."), "__");
    }

    #[test]
    fn test_resolve_unique_path_no_conflict() {
        let temp_dir = TempDir::new().unwrap();
        let path = resolve_unique_path(temp_dir.path(), "forma.docx");
        assert_eq!(path, temp_dir.path().join("forma.docx"));
    }

    #[test]
    fn test_resolve_unique_path_multiple_conflicts() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("forma.docx"), b"1").unwrap();
        std::fs::write(temp_dir.path().join("forma_1.docx"), b"2").unwrap();

        let path = resolve_unique_path(temp_dir.path(), "forma.docx");
        assert_eq!(path, temp_dir.path().join("forma_2.docx"));
    }

    #[test]
    fn test_resolve_unique_path_protects_against_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        for malicious in ["../../etc/passwd", "..", "a/\\b\\c"] {
            let path = resolve_unique_path(base, malicious);
            assert!(path.starts_with(base), "must stay under base: {}", path.display());
            assert!(
                !path.components().any(|c| c == Component::ParentDir),
                "must not contain ..: {}",
                path.display()
            );
        }
    }
}

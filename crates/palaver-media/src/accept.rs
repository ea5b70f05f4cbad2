//! Accepted-type patterns, using the same syntax as an HTML `accept`
//! attribute: `image/*`, `application/pdf`, `.docx`.

use std::path::Path;

use palaver_shared::constants::DEFAULT_ACCEPTED_TYPES;

#[derive(Debug, Clone, PartialEq, Eq)]
enum TypePattern {
    Any,
    /// Major type of a `type/*` pattern, e.g. `image`.
    Wildcard(String),
    Exact(String),
    /// Extension without the leading dot.
    Extension(String),
}

impl TypePattern {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_ascii_lowercase();
        if raw.is_empty() {
            return None;
        }
        let pattern = if raw == "*" || raw == "*/*" {
            Self::Any
        } else if let Some(ext) = raw.strip_prefix('.') {
            Self::Extension(ext.to_string())
        } else if let Some(major) = raw.strip_suffix("/*") {
            Self::Wildcard(major.to_string())
        } else {
            Self::Exact(raw)
        };
        Some(pattern)
    }

    fn matches(&self, name: &str, mime_type: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Wildcard(major) => mime_type
                .split_once('/')
                .is_some_and(|(m, _)| m.eq_ignore_ascii_case(major)),
            Self::Exact(mime) => mime_type.eq_ignore_ascii_case(mime),
            Self::Extension(ext) => Path::new(name)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext)),
        }
    }

    fn as_accept(&self) -> String {
        match self {
            Self::Any => "*/*".to_string(),
            Self::Wildcard(major) => format!("{major}/*"),
            Self::Exact(mime) => mime.clone(),
            Self::Extension(ext) => format!(".{ext}"),
        }
    }
}

/// Set of accepted file types. A file is accepted if any pattern matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedTypes {
    patterns: Vec<TypePattern>,
}

impl AcceptedTypes {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .filter_map(|p| TypePattern::parse(p.as_ref()))
                .collect(),
        }
    }

    /// Parse a comma-separated list such as `"image/*,.pdf"`.
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Accepts every file.
    pub fn any() -> Self {
        Self {
            patterns: vec![TypePattern::Any],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn accepts(&self, name: &str, mime_type: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name, mime_type))
    }

    /// Render back to `accept` attribute syntax.
    pub fn to_accept_attr(&self) -> String {
        self.patterns
            .iter()
            .map(TypePattern::as_accept)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for AcceptedTypes {
    fn default() -> Self {
        Self::new(DEFAULT_ACCEPTED_TYPES.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set() {
        let accepted = AcceptedTypes::default();
        assert!(accepted.accepts("photo.JPG", "image/jpeg"));
        assert!(accepted.accepts("spec.pdf", "application/pdf"));
        assert!(accepted.accepts("notes.txt", "text/plain"));
        assert!(accepted.accepts("Report.DOCX", "application/octet-stream"));
        assert!(!accepted.accepts("clip.mp4", "video/mp4"));
        assert!(!accepted.accepts("archive.zip", "application/zip"));
    }

    #[test]
    fn test_wildcard_needs_exact_major() {
        let accepted = AcceptedTypes::parse_list("image/*");
        assert!(accepted.accepts("a.png", "image/png"));
        assert!(!accepted.accepts("a.png", "imagex/png"));
        assert!(!accepted.accepts("a.png", "image"));
    }

    #[test]
    fn test_parse_list_skips_blanks() {
        let accepted = AcceptedTypes::parse_list(" .TXT , ,application/pdf");
        assert_eq!(accepted.to_accept_attr(), ".txt,application/pdf");
        assert!(AcceptedTypes::parse_list(" , ").is_empty());
    }

    #[test]
    fn test_any() {
        assert!(AcceptedTypes::any().accepts("x.bin", "application/octet-stream"));
        assert!(AcceptedTypes::parse_list("*/*").accepts("x", ""));
    }

    #[test]
    fn test_default_accept_attr() {
        assert_eq!(
            AcceptedTypes::default().to_accept_attr(),
            "image/*,application/pdf,.doc,.docx,.txt"
        );
    }
}

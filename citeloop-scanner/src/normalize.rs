use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Scheme plus host of a URL, used to count distinct publishers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Source(String);

impl Source {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a candidate link points after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Parsed URL with a scheme (not necessarily http/https).
    Absolute(Url),
    /// Reference without any scheme; kept verbatim.
    Schemeless(String),
}

impl LinkTarget {
    pub fn as_str(&self) -> &str {
        match self {
            LinkTarget::Absolute(url) => url.as_str(),
            LinkTarget::Schemeless(raw) => raw,
        }
    }

    /// The URL, if it can be fetched over http or https.
    pub fn web_url(&self) -> Option<&Url> {
        match self {
            LinkTarget::Absolute(url) if is_web_scheme(url.scheme()) => Some(url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub target: LinkTarget,
    pub source: Option<Source>,
}

pub fn is_web_scheme(scheme: &str) -> bool {
    scheme == "http" || scheme == "https"
}

/// Extract the source key (`scheme://host[:port]`) of a URL.
pub fn source_of(url: &Url) -> Option<Source> {
    let host = url.host_str()?;
    let key = match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    };
    Some(Source(key))
}

/// Resolve a raw `href` found on `ancestor` into an absolute target.
///
/// Links that already carry a scheme are parsed as-is. Scheme-less links that
/// embed a second URL (archive paths such as `/web/2019/https://example.com/`)
/// are rebased onto the ancestor's host, and their source becomes the host of
/// the embedded URL. Any other scheme-less link is returned verbatim as
/// [`LinkTarget::Schemeless`].
///
/// Returns `None` when nothing usable can be produced.
pub fn resolve(candidate: &str, ancestor: &Url) -> Option<ResolvedLink> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }

    if has_scheme(candidate) {
        let url = Url::parse(candidate).ok()?;
        let source = source_of(&url);
        return Some(ResolvedLink {
            target: LinkTarget::Absolute(url),
            source,
        });
    }

    match embedded_url_offset(candidate) {
        Some(offset) => resolve_archived(candidate, offset, ancestor),
        None => Some(ResolvedLink {
            target: LinkTarget::Schemeless(candidate.to_string()),
            source: None,
        }),
    }
}

fn resolve_archived(candidate: &str, offset: usize, ancestor: &Url) -> Option<ResolvedLink> {
    let base = source_of(ancestor)?;
    let joined = if candidate.starts_with('/') {
        format!("{}{}", base, candidate)
    } else {
        format!("{}/{}", base, candidate)
    };
    let url = Url::parse(&joined).ok()?;

    let source = Url::parse(&candidate[offset..])
        .ok()
        .as_ref()
        .and_then(source_of)
        .unwrap_or(base);

    Some(ResolvedLink {
        target: LinkTarget::Absolute(url),
        source: Some(source),
    })
}

// RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"
fn has_scheme(candidate: &str) -> bool {
    let Some(colon) = candidate.find(':') else {
        return false;
    };
    let mut chars = candidate[..colon].chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Byte offset of the first `http` token after the first character.
fn embedded_url_offset(candidate: &str) -> Option<usize> {
    let (start, _) = candidate.char_indices().nth(1)?;
    candidate[start..].find("http").map(|i| start + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ancestor() -> Url {
        Url::parse("https://web.archive.org/web/2020/page").unwrap()
    }

    #[test]
    fn test_absolute_url_keeps_target_and_derives_source() {
        let resolved = resolve("https://www.nytimes.com/apples-are-great", &ancestor()).unwrap();
        assert_eq!(
            resolved.target.as_str(),
            "https://www.nytimes.com/apples-are-great"
        );
        assert_eq!(resolved.source.unwrap().as_str(), "https://www.nytimes.com");
    }

    #[test]
    fn test_same_publisher_shares_source() {
        let a = resolve("https://www.nytimes.com/apples-are-great", &ancestor()).unwrap();
        let b = resolve("https://www.nytimes.com/cake-is-better", &ancestor()).unwrap();
        assert_eq!(a.source, b.source);
    }

    #[test]
    fn test_source_includes_explicit_port() {
        let url = Url::parse("http://127.0.0.1:8080/a").unwrap();
        assert_eq!(source_of(&url).unwrap().as_str(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_archive_path_is_rebased_onto_ancestor_host() {
        let resolved = resolve("/web/2019/https://example.com/story", &ancestor()).unwrap();
        assert_eq!(
            resolved.target.as_str(),
            "https://web.archive.org/web/2019/https://example.com/story"
        );
        assert_eq!(resolved.source.unwrap().as_str(), "https://example.com");
        assert!(resolved.target.web_url().is_some());
    }

    #[test]
    fn test_relative_path_without_embedded_url_is_schemeless() {
        let resolved = resolve("/wiki/Pizza", &ancestor()).unwrap();
        assert_eq!(
            resolved.target,
            LinkTarget::Schemeless("/wiki/Pizza".to_string())
        );
        assert!(resolved.source.is_none());
        assert!(resolved.target.web_url().is_none());
    }

    #[test]
    fn test_leading_http_token_is_not_an_archive_path() {
        let resolved = resolve("httpdocs/index.html", &ancestor()).unwrap();
        assert!(matches!(resolved.target, LinkTarget::Schemeless(_)));
    }

    #[test]
    fn test_non_web_scheme_resolves_but_is_not_fetchable() {
        let resolved = resolve("mailto:editor@example.com", &ancestor()).unwrap();
        assert!(matches!(resolved.target, LinkTarget::Absolute(_)));
        assert!(resolved.target.web_url().is_none());
    }

    #[test]
    fn test_empty_candidate_is_unresolvable() {
        assert!(resolve("", &ancestor()).is_none());
        assert!(resolve("   ", &ancestor()).is_none());
    }

    #[test]
    fn test_malformed_absolute_url_is_unresolvable() {
        assert!(resolve("http://", &ancestor()).is_none());
    }

    #[test]
    fn test_archive_path_on_hostless_ancestor_is_unresolvable() {
        let ancestor = Url::parse("data:text/plain,hello").unwrap();
        assert!(resolve("/web/https://example.com", &ancestor).is_none());
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        let resolved = resolve("ühttp", &ancestor());
        assert!(resolved.is_some());
    }
}

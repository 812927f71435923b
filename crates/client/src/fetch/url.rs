//! URL canonicalization and host rewrites applied before every fetch.

/// Hosts served through a lighter mirror that renders without scripts.
const HOST_REWRITES: &[(&str, &str)] = &[("reddit.com", "old.reddit.com"), ("www.reddit.com", "old.reddit.com")];

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Canonicalize a URL string before fetching.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = url::Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str().map(str::to_lowercase) {
        parsed
            .set_host(Some(&host))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Swap the host for its mirror when one is registered. Returns whether it changed.
pub fn rewrite_host(url: &mut url::Url) -> bool {
    let Some(target) = url
        .host_str()
        .and_then(|host| HOST_REWRITES.iter().find(|(from, _)| *from == host))
        .map(|(_, to)| *to)
    else {
        return false;
    };

    url.set_host(Some(target)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_default_scheme() {
        let url = canonicalize("example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_canonicalize_lowercase_host_and_drop_fragment() {
        let url = canonicalize("  https://EXAMPLE.COM/Path?b=2&a=1#section ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/Path?b=2&a=1");
    }

    #[test]
    fn test_canonicalize_http_allowed() {
        let url = canonicalize("http://example.com").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_canonicalize_rejects() {
        assert!(matches!(canonicalize(""), Err(UrlError::Empty)));
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
        assert!(matches!(canonicalize("file:///etc/passwd"), Err(UrlError::UnsupportedScheme(_))));
        assert!(matches!(canonicalize("https://"), Err(UrlError::InvalidUrl(_))));
    }

    #[test]
    fn test_rewrite_host_reddit() {
        for input in ["https://reddit.com/r/rust", "https://www.reddit.com/r/rust"] {
            let mut url = canonicalize(input).unwrap();
            assert!(rewrite_host(&mut url));
            assert_eq!(url.as_str(), "https://old.reddit.com/r/rust");
        }
    }

    #[test]
    fn test_rewrite_host_leaves_others() {
        let mut url = canonicalize("https://old.reddit.com/r/rust").unwrap();
        assert!(!rewrite_host(&mut url));

        let mut url = canonicalize("https://notreddit.com/").unwrap();
        assert!(!rewrite_host(&mut url));
        assert_eq!(url.host_str(), Some("notreddit.com"));
    }
}

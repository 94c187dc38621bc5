//! Post identifier extraction from status URLs.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, ScrapeError};

static STATUS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://(?:(?:www|m(?:obile)?)\.)?(?:twitter\.com|x\.com)/(?:(?:i/web|[^/]+)/status|statuses)/(\d+)(?:/(?:video|photo)/(\d+))?",
    )
    .expect("status URL pattern is valid")
});

/// Post id plus the optional `/video/N` or `/photo/N` index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRef {
    pub id: String,
    pub media_index: Option<u32>,
}

/// Parses a status URL into its [`PostRef`].
pub fn parse_post_url(url: &str) -> Result<PostRef> {
    let caps = STATUS_URL
        .captures(url)
        .ok_or_else(|| ScrapeError::InvalidUrl(url.to_string()))?;
    let id = caps
        .get(1)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ScrapeError::InvalidUrl(url.to_string()))?;
    let media_index = caps.get(2).and_then(|m| m.as_str().parse().ok());
    Ok(PostRef { id, media_index })
}

/// Numeric post id (`restId`) of a status URL.
pub fn extract_post_id(url: &str) -> Result<String> {
    parse_post_url(url).map(|r| r.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_supported_hosts_and_paths() {
        let cases = [
            "https://x.com/someone/status/1234567890",
            "https://twitter.com/someone/status/1234567890",
            "http://www.twitter.com/someone/status/1234567890",
            "https://mobile.twitter.com/someone/status/1234567890",
            "https://m.x.com/someone/status/1234567890",
            "https://x.com/i/web/status/1234567890",
            "https://twitter.com/statuses/1234567890",
            "https://x.com/someone/status/1234567890?s=20&t=abc",
        ];
        for url in cases {
            assert_eq!(extract_post_id(url).unwrap(), "1234567890", "{}", url);
        }
    }

    #[test]
    fn media_suffix_does_not_change_id() {
        let r = parse_post_url("https://x.com/someone/status/1800000000000000001/video/2").unwrap();
        assert_eq!(r.id, "1800000000000000001");
        assert_eq!(r.media_index, Some(2));

        let r = parse_post_url("https://x.com/someone/status/1800000000000000001/photo/1").unwrap();
        assert_eq!(r.id, "1800000000000000001");
        assert_eq!(r.media_index, Some(1));

        let r = parse_post_url("https://x.com/someone/status/1800000000000000001").unwrap();
        assert_eq!(r.media_index, None);
    }

    #[test]
    fn malformed_urls_are_rejected() {
        let cases = [
            "",
            "not a url",
            "https://example.com/someone/status/123",
            "https://x.com/someone",
            "https://x.com/someone/status/",
            "https://x.com/someone/status/abc",
            "ftp://x.com/someone/status/123",
        ];
        for url in cases {
            assert!(
                matches!(extract_post_id(url), Err(ScrapeError::InvalidUrl(_))),
                "{}",
                url
            );
        }
    }
}

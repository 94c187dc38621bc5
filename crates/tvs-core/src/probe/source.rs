//! Where the size probe gets its response headers from.

use crate::backend::BOT_USER_AGENT;
use crate::error::Result;
use crate::http::{HttpClient, Request};

use super::parse::{content_length, content_range_total};

/// One way of asking a server for a resource's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `HEAD`, read `Content-Length`.
    Head,
    /// `GET` with `Range: bytes=0-0`, read `Content-Length` then `Content-Range`.
    RangeGet,
    /// Plain `GET`, read `Content-Length`.
    Get,
}

impl Strategy {
    /// Order tried within one cycle.
    pub const ORDER: [Strategy; 3] = [Strategy::Head, Strategy::RangeGet, Strategy::Get];
}

/// Length-related headers of one probe response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeHeaders {
    pub content_length: Option<String>,
    pub content_range: Option<String>,
}

impl ProbeHeaders {
    /// Byte size this response reveals under `strategy`, if any.
    ///
    /// `Content-Length` is consulted first for every strategy, including
    /// the Range GET where it is the length of the partial body.
    pub fn size_bytes(&self, strategy: Strategy) -> Option<u64> {
        if let Some(n) = self.content_length.as_deref().and_then(content_length) {
            return Some(n);
        }
        if strategy == Strategy::RangeGet {
            return self.content_range.as_deref().and_then(content_range_total);
        }
        None
    }
}

/// Fetches probe headers for a URL. Implemented over curl in production and
/// by scripted fakes in tests.
pub trait HeaderSource: Sync {
    fn fetch(&self, url: &str, strategy: Strategy) -> Result<ProbeHeaders>;
}

/// Header source backed by [`HttpClient`].
///
/// Sends the bot user agent and `Accept-Encoding: identity`; GET transfers
/// are cut off once headers have arrived.
#[derive(Debug, Clone, Default)]
pub struct CurlHeaderSource {
    client: HttpClient,
}

impl CurlHeaderSource {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

impl HeaderSource for CurlHeaderSource {
    fn fetch(&self, url: &str, strategy: Strategy) -> Result<ProbeHeaders> {
        let req = match strategy {
            Strategy::Head => Request::head(url),
            Strategy::RangeGet => Request::get(url).header("Range", "bytes=0-0").headers_only(),
            Strategy::Get => Request::get(url).headers_only(),
        }
        .header("User-Agent", BOT_USER_AGENT)
        .header("Accept-Encoding", "identity");

        let resp = self.client.send(&req)?;
        Ok(ProbeHeaders {
            content_length: resp.header("Content-Length").map(str::to_string),
            content_range: resp.header("Content-Range").map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(len: Option<&str>, range: Option<&str>) -> ProbeHeaders {
        ProbeHeaders {
            content_length: len.map(String::from),
            content_range: range.map(String::from),
        }
    }

    #[test]
    fn content_length_wins_for_every_strategy() {
        let h = headers(Some("100"), Some("bytes 0-0/5000"));
        for s in Strategy::ORDER {
            assert_eq!(h.size_bytes(s), Some(100));
        }
    }

    #[test]
    fn content_range_only_counts_for_range_get() {
        let h = headers(None, Some("bytes 0-0/5242880"));
        assert_eq!(h.size_bytes(Strategy::RangeGet), Some(5_242_880));
        assert_eq!(h.size_bytes(Strategy::Head), None);
        assert_eq!(h.size_bytes(Strategy::Get), None);
    }

    #[test]
    fn partial_response_length_is_taken_before_range_total() {
        // A 206 for `bytes=0-0` carries `Content-Length: 1`.
        let h = headers(Some("1"), Some("bytes 0-0/5242880"));
        assert_eq!(h.size_bytes(Strategy::RangeGet), Some(1));
    }

    #[test]
    fn unparsable_length_falls_through_to_range() {
        let h = headers(Some("n/a"), Some("bytes 0-0/2048"));
        assert_eq!(h.size_bytes(Strategy::RangeGet), Some(2048));
        assert_eq!(h.size_bytes(Strategy::Head), None);
    }
}

//! Fixed backend constants and endpoint locations.

/// Public web-client bearer credential sent on every backend call.
pub const BEARER_TOKEN: &str =
    "AAAAAAAAAAAAAAAAAAAAANRILgAAAAAAnNwIzUejRCOuH5E6I8xnZz4puTs=1Zv7ttfk8LF81IUq16cHjhLTvJu4FA33AGWWjCpTnA";

/// User agent for the activation call and media probing.
pub const BOT_USER_AGENT: &str = "Twitterbot/1.0";

pub const ACTIVATE_URL: &str = "https://api.x.com/1.1/guest/activate.json";
pub const QUERY_URL: &str =
    "https://x.com/i/api/graphql/2ICDjqPd81tulZcYrtpTuQ/TweetResultByRestId";

pub fn bearer_header() -> String {
    format!("Bearer {}", BEARER_TOKEN)
}

/// Where the activation and structured-query calls go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub activate_url: String,
    pub query_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            activate_url: ACTIVATE_URL.to_string(),
            query_url: QUERY_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Both endpoints under one base URL (local test servers).
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            activate_url: format!("{}/1.1/guest/activate.json", base),
            query_url: format!("{}/graphql/TweetResultByRestId", base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_base_strips_trailing_slash() {
        let e = Endpoints::with_base("http://127.0.0.1:8080/");
        assert_eq!(e.activate_url, "http://127.0.0.1:8080/1.1/guest/activate.json");
        assert_eq!(e.query_url, "http://127.0.0.1:8080/graphql/TweetResultByRestId");
    }

    #[test]
    fn bearer_header_format() {
        assert!(bearer_header().starts_with("Bearer AAAA"));
    }
}

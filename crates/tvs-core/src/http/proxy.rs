//! Outbound proxy selection (HTTP or SOCKS).

use url::Url;

use crate::error::ScrapeError;

/// A validated proxy endpoint in the form libcurl expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    curl_url: String,
}

impl Proxy {
    /// Builds a proxy from its parts, e.g. `("socks5", "127.0.0.1", 9050)`.
    pub fn from_parts(protocol: &str, host: &str, port: u16) -> Result<Self, ScrapeError> {
        let scheme = match protocol.to_ascii_lowercase().as_str() {
            "http" | "https" => "http",
            // Hostnames are resolved on the proxy side.
            "socks4" => "socks4a",
            "socks5" => "socks5h",
            other => {
                return Err(ScrapeError::InvalidProxy(format!(
                    "unsupported proxy protocol: {}",
                    other
                )))
            }
        };
        if host.trim().is_empty() {
            return Err(ScrapeError::InvalidProxy("empty proxy host".into()));
        }
        Ok(Self {
            curl_url: format!("{}://{}:{}", scheme, host.trim(), port),
        })
    }

    /// Parses `scheme://host:port`.
    pub fn parse(raw: &str) -> Result<Self, ScrapeError> {
        let url = Url::parse(raw.trim())
            .map_err(|e| ScrapeError::InvalidProxy(format!("{}: {}", raw, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| ScrapeError::InvalidProxy(format!("{}: missing host", raw)))?;
        let port = url
            .port_or_known_default()
            .or_else(|| match url.scheme() {
                "socks4" | "socks5" => Some(1080),
                _ => None,
            })
            .ok_or_else(|| ScrapeError::InvalidProxy(format!("{}: missing port", raw)))?;
        Self::from_parts(url.scheme(), host, port)
    }

    pub fn curl_url(&self) -> &str {
        &self.curl_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_and_https_map_to_http_proxy() {
        let p = Proxy::parse("http://10.0.0.1:8080").unwrap();
        assert_eq!(p.curl_url(), "http://10.0.0.1:8080");
        let p = Proxy::from_parts("HTTPS", "proxy.local", 3128).unwrap();
        assert_eq!(p.curl_url(), "http://proxy.local:3128");
    }

    #[test]
    fn socks_schemes_resolve_remotely() {
        assert_eq!(
            Proxy::parse("socks5://127.0.0.1:9050").unwrap().curl_url(),
            "socks5h://127.0.0.1:9050"
        );
        assert_eq!(
            Proxy::parse("socks4://127.0.0.1").unwrap().curl_url(),
            "socks4a://127.0.0.1:1080"
        );
    }

    #[test]
    fn unsupported_scheme_rejected() {
        assert!(matches!(
            Proxy::parse("ftp://127.0.0.1:21"),
            Err(ScrapeError::InvalidProxy(_))
        ));
        assert!(matches!(
            Proxy::parse("not a url"),
            Err(ScrapeError::InvalidProxy(_))
        ));
    }
}

//! Blocking HTTP requests over libcurl.
//!
//! One `Easy` handle per request, redirects followed, response header lines
//! collected through the header callback and folded into name/value pairs.
//! Runs in the current thread.

mod parse;
mod proxy;

pub use parse::parse_header_lines;
pub use proxy::Proxy;

use std::str;
use std::time::Duration;

use crate::config::HttpConfig;

/// Connection settings shared by every request of one client.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub proxy: Option<Proxy>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(30),
            proxy: None,
        }
    }
}

impl HttpOptions {
    pub fn from_config(cfg: &HttpConfig, proxy: Option<Proxy>) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            proxy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
}

/// A single outgoing request.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    method: Method,
    url: &'a str,
    headers: Vec<(&'a str, &'a str)>,
    body: &'a [u8],
    headers_only: bool,
}

impl<'a> Request<'a> {
    pub fn get(url: &'a str) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn head(url: &'a str) -> Self {
        Self::new(Method::Head, url)
    }

    pub fn post(url: &'a str, body: &'a [u8]) -> Self {
        let mut req = Self::new(Method::Post, url);
        req.body = body;
        req
    }

    fn new(method: Method, url: &'a str) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: &[],
            headers_only: false,
        }
    }

    /// Adds a header. A blank value is sent as an empty header rather than dropped.
    pub fn header(mut self, name: &'a str, value: &'a str) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Stop the transfer as soon as the first body bytes arrive.
    pub fn headers_only(mut self) -> Self {
        self.headers_only = true;
        self
    }
}

/// Status, final-hop headers and (unless headers-only) body of a response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header with this name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All headers with this name, in arrival order.
    pub fn headers_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s str> + 's {
        self.headers
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    opts: HttpOptions,
}

impl HttpClient {
    pub fn new(opts: HttpOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &HttpOptions {
        &self.opts
    }

    /// Performs the request. Non-2xx statuses are returned, not treated as errors.
    pub fn send(&self, req: &Request<'_>) -> Result<HttpResponse, curl::Error> {
        let mut lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(req.url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.timeout(self.opts.timeout)?;
        if let Some(proxy) = &self.opts.proxy {
            easy.proxy(proxy.curl_url())?;
        }

        match req.method {
            Method::Get => easy.get(true)?,
            Method::Head => easy.nobody(true)?,
            Method::Post => {
                easy.post(true)?;
                easy.post_fields_copy(req.body)?;
            }
        }

        let mut list = curl::easy::List::new();
        for (k, v) in &req.headers {
            if v.trim().is_empty() {
                // libcurl syntax for "send this header with no value".
                list.append(&format!("{};", k.trim()))?;
            } else {
                list.append(&format!("{}: {}", k.trim(), v.trim()))?;
            }
        }
        if !req.headers.is_empty() {
            easy.http_headers(list)?;
        }

        let headers_only = req.headers_only;
        let outcome = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                if headers_only {
                    // Returning short aborts the transfer with a write error.
                    return Ok(0);
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()
        };
        if let Err(e) = outcome {
            if !(headers_only && e.is_write_error()) {
                return Err(e);
            }
        }

        let status = easy.response_code()?;
        tracing::debug!("{:?} {} -> HTTP {}", req.method, req.url, status);

        Ok(HttpResponse {
            status,
            headers: parse_header_lines(&lines),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(headers: &[(&str, &str)]) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: Vec::new(),
        }
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let r = response(&[("content-length", "42"), ("Set-Cookie", "a=1")]);
        assert_eq!(r.header("Content-Length"), Some("42"));
        assert_eq!(r.header("set-cookie"), Some("a=1"));
        assert!(r.header("Content-Range").is_none());
    }

    #[test]
    fn repeated_headers_are_all_visible() {
        let r = response(&[("Set-Cookie", "a=1"), ("X", "y"), ("set-cookie", "b=2")]);
        let cookies: Vec<&str> = r.headers_named("Set-Cookie").collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
    }

    #[test]
    fn request_builder_collects_headers() {
        let req = Request::get("https://example.com/")
            .header("cache-control", "no-cache")
            .header("User-Agent", " ")
            .headers_only();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.headers.len(), 2);
        assert!(req.headers_only);
    }

    #[test]
    fn success_range() {
        let mut r = response(&[]);
        assert!(r.is_success());
        r.status = 302;
        assert!(!r.is_success());
    }
}

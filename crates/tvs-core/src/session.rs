//! Anonymous guest session: token acquisition and cookie state.

use std::sync::Mutex;

use crate::backend::{bearer_header, Endpoints, BOT_USER_AGENT};
use crate::error::{Result, ScrapeError};
use crate::http::{HttpClient, Request};
use crate::json_view::{self, JsonView};

/// Cookie name the backend uses for the guest token.
pub const GUEST_TOKEN_COOKIE: &str = "gt";
pub const COOKIE_DOMAIN: &str = ".x.com";
pub const COOKIE_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
}

impl Cookie {
    /// Parses a `Set-Cookie` value; missing Domain/Path fall back to the backend scope.
    pub fn parse_set_cookie(header: &str) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let mut cookie = Cookie {
            name: name.to_string(),
            value: value.trim().trim_matches('"').to_string(),
            domain: COOKIE_DOMAIN.to_string(),
            path: COOKIE_PATH.to_string(),
        };
        for attr in parts {
            if let Some((k, v)) = attr.split_once('=') {
                let k = k.trim();
                if k.eq_ignore_ascii_case("domain") {
                    cookie.domain = v.trim().to_string();
                } else if k.eq_ignore_ascii_case("path") {
                    cookie.path = v.trim().to_string();
                }
            }
        }
        Some(cookie)
    }
}

/// Cookie jar holding the guest token and whatever the backend set alongside it.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    cookies: Vec<Cookie>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `gt` cookie scoped to the backend domain, if bootstrapped.
    pub fn guest_token(&self) -> Option<&str> {
        self.cookies
            .iter()
            .find(|c| c.name == GUEST_TOKEN_COOKIE && c.domain == COOKIE_DOMAIN)
            .map(|c| c.value.as_str())
    }

    pub fn set_guest_token(&mut self, token: &str) {
        self.set_cookie(Cookie {
            name: GUEST_TOKEN_COOKIE.to_string(),
            value: token.to_string(),
            domain: COOKIE_DOMAIN.to_string(),
            path: COOKIE_PATH.to_string(),
        });
    }

    /// Inserts or replaces the cookie with the same name, domain and path.
    pub fn set_cookie(&mut self, cookie: Cookie) {
        match self.cookies.iter_mut().find(|c| {
            c.name == cookie.name && c.domain == cookie.domain && c.path == cookie.path
        }) {
            Some(existing) => existing.value = cookie.value,
            None => self.cookies.push(cookie),
        }
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }
}

/// Requests a fresh guest token and stores it in `session`.
///
/// Every failure (transport, non-2xx, bad body, missing token) becomes
/// [`ScrapeError::BootstrapFailed`] and leaves `session` untouched. No retry
/// at this layer.
pub fn bootstrap(
    client: &HttpClient,
    endpoints: &Endpoints,
    session: &mut SessionContext,
) -> Result<()> {
    let (token, cookies) = fetch_guest_token(client, endpoints).map_err(|e| match e {
        ScrapeError::BootstrapFailed(msg) => ScrapeError::BootstrapFailed(msg),
        other => ScrapeError::BootstrapFailed(other.to_string()),
    })?;
    for cookie in cookies {
        session.set_cookie(cookie);
    }
    session.set_guest_token(&token);
    tracing::info!("guest token acquired");
    Ok(())
}

/// Guest token plus the cookies set alongside it.
fn fetch_guest_token(client: &HttpClient, endpoints: &Endpoints) -> Result<(String, Vec<Cookie>)> {
    let auth = bearer_header();
    let req = Request::post(&endpoints.activate_url, &[])
        .header("authorization", &auth)
        .header("User-Agent", BOT_USER_AGENT);
    let resp = client.send(&req)?;

    if !resp.is_success() {
        return Err(ScrapeError::BootstrapFailed(format!(
            "activation returned HTTP {}: {}",
            resp.status,
            resp.text()
        )));
    }

    let tree = json_view::parse(&resp.text())?;
    let token = JsonView::new(&tree).get("guest_token")?.as_str()?;
    if token.is_empty() {
        return Err(ScrapeError::BootstrapFailed("empty guest_token".into()));
    }

    let cookies = resp
        .headers_named("Set-Cookie")
        .filter_map(Cookie::parse_set_cookie)
        .collect();
    Ok((token.to_string(), cookies))
}

/// A [`SessionContext`] shared between concurrent pipelines.
///
/// Token reads that may trigger a refresh hold the lock for the whole
/// read-then-refresh step, so at most one bootstrap is in flight.
#[derive(Debug, Default)]
pub struct SharedSession {
    inner: Mutex<SessionContext>,
}

impl SharedSession {
    pub fn new(session: SessionContext) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    /// Current token, bootstrapping first if none is set.
    pub fn guest_token_or_bootstrap(
        &self,
        client: &HttpClient,
        endpoints: &Endpoints,
    ) -> Result<String> {
        let mut session = self.lock()?;
        if let Some(token) = session.guest_token() {
            return Ok(token.to_string());
        }
        bootstrap(client, endpoints, &mut session)?;
        session
            .guest_token()
            .map(str::to_string)
            .ok_or_else(|| ScrapeError::BootstrapFailed("guest token not set".into()))
    }

    /// Replaces the token unconditionally.
    pub fn refresh(&self, client: &HttpClient, endpoints: &Endpoints) -> Result<()> {
        let mut session = self.lock()?;
        bootstrap(client, endpoints, &mut session)
    }

    /// Copy of the current context (for a single query).
    pub fn snapshot(&self) -> Result<SessionContext> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, SessionContext>> {
        self.inner
            .lock()
            .map_err(|_| ScrapeError::BootstrapFailed("session lock poisoned".into()))
    }
}

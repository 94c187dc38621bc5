//! End-to-end resolution: post URL → id → guest token → media → sizes.

use serde::Serialize;

use crate::backend::Endpoints;
use crate::config::TvsConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpOptions, Proxy};
use crate::post_id::extract_post_id;
use crate::probe::{probe_sizes, CurlHeaderSource, ProbeOptions, SizeReport};
use crate::query::{resolve_media, MediaResolution};
use crate::session::{bootstrap, SessionContext};

/// Everything resolved for one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeReport {
    pub post_id: String,
    pub media: MediaResolution,
    /// Empty when probing was skipped or nothing was resolved.
    pub sizes: SizeReport,
}

/// Owns the clients and session for repeated pipeline runs.
///
/// Backend calls go through `client` (proxied when configured); size probing
/// uses its own client, proxied only with `probe.use_proxy`.
#[derive(Debug, Clone)]
pub struct Scraper {
    client: HttpClient,
    probe_source: CurlHeaderSource,
    endpoints: Endpoints,
    probe: ProbeOptions,
    session: SessionContext,
}

impl Scraper {
    pub fn new(cfg: &TvsConfig) -> Result<Self> {
        let proxy = cfg.proxy.as_deref().map(Proxy::parse).transpose()?;
        let probe_proxy = if cfg.probe.use_proxy {
            proxy.clone()
        } else {
            None
        };
        if let Some(p) = &proxy {
            tracing::info!("proxy set to {}", p.curl_url());
        }
        Ok(Self {
            client: HttpClient::new(HttpOptions::from_config(&cfg.http, proxy)),
            probe_source: CurlHeaderSource::new(HttpClient::new(HttpOptions::from_config(
                &cfg.http,
                probe_proxy,
            ))),
            endpoints: Endpoints::default(),
            probe: ProbeOptions::from_config(&cfg.probe),
            session: SessionContext::new(),
        })
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_probe_options(mut self, probe: ProbeOptions) -> Self {
        self.probe = probe;
        self
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Runs every stage once. `with_sizes = false` skips the size probe.
    pub fn run(&mut self, post_url: &str, with_sizes: bool) -> Result<ScrapeReport> {
        let post_id = extract_post_id(post_url)?;
        tracing::info!("resolving post {}", post_id);

        bootstrap(&self.client, &self.endpoints, &mut self.session)?;
        let media = resolve_media(&self.client, &self.endpoints, &self.session, &post_id)?;

        let sizes = if with_sizes && !media.is_empty() {
            self.probe_sizes(&media.video_urls)
        } else {
            SizeReport::default()
        };

        Ok(ScrapeReport {
            post_id,
            media,
            sizes,
        })
    }

    /// Size probe alone over arbitrary URLs.
    pub fn probe_sizes(&self, urls: &[String]) -> SizeReport {
        probe_sizes(&self.probe_source, urls, &self.probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;

    #[test]
    fn invalid_proxy_rejected_at_construction() {
        let cfg = TvsConfig {
            proxy: Some("gopher://127.0.0.1:70".into()),
            ..TvsConfig::default()
        };
        assert!(matches!(Scraper::new(&cfg), Err(ScrapeError::InvalidProxy(_))));
    }

    #[test]
    fn probe_client_unproxied_by_default() {
        let cfg = TvsConfig {
            proxy: Some("socks5://127.0.0.1:9050".into()),
            ..TvsConfig::default()
        };
        let s = Scraper::new(&cfg).unwrap();
        assert!(s.client.options().proxy.is_some());
        assert!(s.probe_source_proxy().is_none());

        let mut cfg = cfg;
        cfg.probe.use_proxy = true;
        let s = Scraper::new(&cfg).unwrap();
        assert!(s.probe_source_proxy().is_some());
    }

    #[test]
    fn invalid_url_fails_before_network() {
        let mut s = Scraper::new(&TvsConfig::default())
            .unwrap()
            .with_endpoints(Endpoints::with_base("http://127.0.0.1:9"));
        assert!(matches!(
            s.run("https://example.com/nothing", true),
            Err(ScrapeError::InvalidUrl(_))
        ));
        assert!(s.session().guest_token().is_none());
    }

    impl Scraper {
        fn probe_source_proxy(&self) -> Option<&Proxy> {
            self.probe_source.client().options().proxy.as_ref()
        }
    }
}

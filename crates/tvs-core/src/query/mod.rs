//! Structured-query resolver: post id → media URLs and thumbnails.
//!
//! Builds the `variables`/`features` parameters, issues the GET with the
//! session's guest token, and hands the parsed body to [`extract_media`].

mod extract;
mod params;

pub use extract::{extract_media, NSFW_REASON};
pub use params::{build_query_url, features, variables_for, FlagMap, FlagValue};

use serde::Serialize;

use crate::backend::{bearer_header, Endpoints};
use crate::error::{Result, ScrapeError};
use crate::http::{HttpClient, Request};
use crate::json_view::{self, JsonView};
use crate::session::SessionContext;

/// Video URLs and thumbnails of one post, parallel-indexed.
///
/// When `sensitive` is set the backend withheld media and both lists are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaResolution {
    pub video_urls: Vec<String>,
    pub thumbnails: Vec<String>,
    pub sensitive: bool,
}

impl MediaResolution {
    pub fn sensitive() -> Self {
        Self {
            video_urls: Vec::new(),
            thumbnails: Vec::new(),
            sensitive: true,
        }
    }

    pub fn len(&self) -> usize {
        self.video_urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.video_urls.is_empty()
    }
}

/// Queries the backend for `post_id` and extracts its media.
pub fn resolve_media(
    client: &HttpClient,
    endpoints: &Endpoints,
    session: &SessionContext,
    post_id: &str,
) -> Result<MediaResolution> {
    let guest_token = session
        .guest_token()
        .ok_or_else(|| ScrapeError::BootstrapFailed("guest token not set".into()))?;

    let url = build_query_url(&endpoints.query_url, post_id)?;
    let auth = bearer_header();
    let req = Request::get(&url)
        .header("authorization", &auth)
        .header("User-Agent", " ")
        .header("cache-control", "no-cache")
        .header("x-guest-token", guest_token);

    tracing::info!("querying media for post {}", post_id);
    let resp = client.send(&req)?;
    if !resp.is_success() {
        return Err(ScrapeError::QueryFailed {
            status: resp.status,
            body: resp.text(),
        });
    }

    let tree = json_view::parse(&resp.text())?;
    extract_media(JsonView::new(&tree))
}

//! Media extraction from a `TweetResultByRestId` response tree.

use crate::error::{Result, ScrapeError};
use crate::json_view::JsonView;

use super::MediaResolution;

/// `reason` value the backend returns when logged-out viewers may not see media.
pub const NSFW_REASON: &str = "NsfwLoggedOut";
const MP4: &str = "video/mp4";

const RESULT_PATH: &[&str] = &["data", "tweetResult", "result"];
const MEDIA_PATH: &[&str] = &["legacy", "entities", "media"];

/// Walks the response down to the media entries and collects one video URL
/// and one thumbnail per entry.
pub fn extract_media(root: JsonView<'_>) -> Result<MediaResolution> {
    if is_sensitive(root) {
        tracing::info!("post withheld for logged-out sessions ({})", NSFW_REASON);
        return Ok(MediaResolution::sensitive());
    }

    let media = root
        .path(RESULT_PATH)
        .and_then(|result| result.path(MEDIA_PATH))
        .map_err(|e| ScrapeError::MediaNotFound(e.to_string()))?;

    let mut video_urls = Vec::new();
    let mut thumbnails = Vec::new();
    for entry in media {
        thumbnails.push(entry.get("media_url_https")?.as_str()?.to_string());
        let variants = entry
            .path(&["video_info", "variants"])
            .map_err(|e| ScrapeError::MediaNotFound(e.to_string()))?;
        video_urls.push(last_mp4_url(variants)?);
    }

    tracing::debug!("extracted {} media entries", video_urls.len());
    Ok(MediaResolution {
        video_urls,
        thumbnails,
        sensitive: false,
    })
}

/// True when `data.tweetResult.result.reason` is the sensitivity sentinel.
/// A missing or non-string `reason` is the ordinary path.
fn is_sensitive(root: JsonView<'_>) -> bool {
    root.path(RESULT_PATH)
        .and_then(|r| r.get("reason"))
        .and_then(|r| r.as_str())
        .map(|reason| reason == NSFW_REASON)
        .unwrap_or(false)
}

/// URL of the last `video/mp4` variant, or an empty string if there is none.
fn last_mp4_url(variants: JsonView<'_>) -> Result<String> {
    let mut url = String::new();
    for variant in variants {
        if variant.get("content_type")?.as_str()? == MP4 {
            url = variant.get("url")?.as_str()?.to_string();
        }
    }
    Ok(url)
}

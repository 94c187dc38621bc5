//! Error taxonomy shared by every pipeline stage.

use thiserror::Error;

/// Failure of one resolution stage.
///
/// Size probing never produces one of these; an unresolved size is
/// reported as [`crate::probe::MediaSize::Unknown`] instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// No post identifier could be extracted from the input.
    #[error("invalid post URL: {0}")]
    InvalidUrl(String),
    /// Proxy URL is malformed or uses an unsupported scheme.
    #[error("invalid proxy: {0}")]
    InvalidProxy(String),
    /// Acquiring the anonymous guest token failed.
    #[error("guest token bootstrap failed: {0}")]
    BootstrapFailed(String),
    /// The structured-query endpoint answered with a non-2xx status.
    #[error("query failed with HTTP {status}: {body}")]
    QueryFailed { status: u32, body: String },
    /// A JSON node was absent or not the container kind we indexed into.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    /// The response did not carry the media structure we expect.
    #[error("media not found: {0}")]
    MediaNotFound(String),
    /// A JSON scalar had a different type than requested.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Query parameters could not be serialized.
    #[error("encoding query parameters: {0}")]
    Encode(serde_json::Error),
    /// libcurl reported a transport failure (DNS, connect, timeout, ...).
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

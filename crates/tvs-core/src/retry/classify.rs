//! Classify pipeline errors into retry policy error kinds.

use crate::error::ScrapeError;
use crate::retry::policy::ErrorKind;

/// Classify a backend HTTP status.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        _ => ErrorKind::Backend,
    }
}

/// Classify a pipeline error into an ErrorKind.
pub fn classify(e: &ScrapeError) -> ErrorKind {
    match e {
        ScrapeError::InvalidUrl(_) | ScrapeError::InvalidProxy(_) => ErrorKind::Fatal,
        ScrapeError::TypeMismatch { .. } | ScrapeError::Encode(_) => ErrorKind::Fatal,
        ScrapeError::Transport(_) | ScrapeError::BootstrapFailed(_) => ErrorKind::Transport,
        ScrapeError::QueryFailed { status, .. } => classify_http_status(*status),
        ScrapeError::SchemaMismatch(_) | ScrapeError::MediaNotFound(_) => ErrorKind::Schema,
    }
}

//! Whole-pipeline retry policy.
//!
//! Classifies [`ScrapeError`](crate::error::ScrapeError)s into kinds that
//! are worth another run (transport hiccups, backend refusals, transient
//! schema drift) and kinds that are not (bad input, type errors), and
//! drives the bounded re-run loop around the pipeline.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;

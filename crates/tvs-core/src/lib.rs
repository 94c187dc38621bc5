pub mod config;
pub mod logging;

pub mod backend;
pub mod error;
pub mod http;
pub mod json_view;
pub mod pipeline;
pub mod post_id;
pub mod probe;
pub mod query;
pub mod retry;
pub mod session;

pub use error::{Result, ScrapeError};
pub use pipeline::{ScrapeReport, Scraper};

//! CLI command handlers.

mod id;
mod probe;
mod resolve;

pub use id::run_id;
pub use probe::run_probe;
pub use resolve::{format_report, run_resolve, ResolveArgs};

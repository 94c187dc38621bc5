//! `tvs resolve <url>` – full pipeline with bounded retries.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use tvs_core::config::TvsConfig;
use tvs_core::retry::{run_with_retry, RetryPolicy};
use tvs_core::{ScrapeReport, Scraper};

#[derive(Debug, Clone)]
pub struct ResolveArgs {
    pub url: String,
    pub proxy: Option<String>,
    pub attempts: Option<u32>,
    pub with_sizes: bool,
    pub json: bool,
}

pub fn run_resolve(cfg: &TvsConfig, args: &ResolveArgs) -> Result<()> {
    let mut cfg = cfg.clone();
    if let Some(proxy) = &args.proxy {
        cfg.proxy = Some(proxy.clone());
    }
    let mut policy = RetryPolicy::from_config(&cfg.retry);
    if let Some(n) = args.attempts {
        policy = policy.with_max_attempts(n);
    }

    let mut scraper = Scraper::new(&cfg)?;
    let report = run_with_retry(&policy, |attempt| {
        tracing::debug!("pipeline attempt {}/{}", attempt, policy.max_attempts);
        scraper.run(&args.url, args.with_sizes)
    })
    .with_context(|| {
        format!(
            "could not resolve {} within {} attempts",
            args.url, policy.max_attempts
        )
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }
    Ok(())
}

/// Human-readable report: one block per media item.
pub fn format_report(report: &ScrapeReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "post {}", report.post_id);
    if report.media.sensitive {
        let _ = writeln!(
            out,
            "sensitive content: media withheld for logged-out sessions"
        );
        return out;
    }
    if report.media.is_empty() {
        let _ = writeln!(out, "no media");
        return out;
    }
    for (i, (video, thumb)) in report
        .media
        .video_urls
        .iter()
        .zip(&report.media.thumbnails)
        .enumerate()
    {
        let video = if video.is_empty() { "(no mp4 variant)" } else { video };
        let _ = writeln!(out, "[{}] {}", i + 1, video);
        let _ = writeln!(out, "    thumbnail: {}", thumb);
        if let Some(size) = report.sizes.get(i) {
            let _ = writeln!(out, "    size: {}", size);
        }
    }
    out
}

//! Remote size probing with layered strategies and bounded retries.
//!
//! Per URL, each cycle tries HEAD, then a one-byte Range GET, then a plain
//! GET; the first response carrying a usable length ends the probe. A cycle
//! that yields nothing is followed by a fixed delay. Once every cycle is
//! spent the size is [`MediaSize::Unknown`]; probing never fails.

mod parse;
mod source;

pub use parse::{bytes_to_megabytes, content_length, content_range_total};
pub use source::{CurlHeaderSource, HeaderSource, ProbeHeaders, Strategy};

use serde::{Serialize, Serializer};
use std::fmt;
use std::thread;
use std::time::Duration;

use crate::config::ProbeConfig;

/// Size of one media resource in whole megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSize {
    Megabytes(u64),
    /// Every strategy and cycle was exhausted.
    Unknown,
}

impl MediaSize {
    pub fn from_bytes(bytes: u64) -> Self {
        MediaSize::Megabytes(bytes_to_megabytes(bytes))
    }

    pub fn megabytes(&self) -> Option<u64> {
        match self {
            MediaSize::Megabytes(mb) => Some(*mb),
            MediaSize::Unknown => None,
        }
    }

    /// Numeric form with `-1` for unknown.
    pub fn as_i64(&self) -> i64 {
        match self {
            MediaSize::Megabytes(mb) => i64::try_from(*mb).unwrap_or(i64::MAX),
            MediaSize::Unknown => -1,
        }
    }
}

impl fmt::Display for MediaSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSize::Megabytes(mb) => write!(f, "{} MB", mb),
            MediaSize::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for MediaSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

/// One size per probed URL, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SizeReport {
    pub sizes: Vec<MediaSize>,
}

impl SizeReport {
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<MediaSize> {
        self.sizes.get(i).copied()
    }
}

#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Cycles per URL (each cycle runs every strategy at most once).
    pub max_cycles: u32,
    /// Pause after a cycle that produced no length.
    pub retry_delay: Duration,
    /// Probe URLs on separate threads.
    pub parallel: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            max_cycles: 50,
            retry_delay: Duration::from_secs(1),
            parallel: false,
        }
    }
}

impl ProbeOptions {
    pub fn from_config(cfg: &ProbeConfig) -> Self {
        Self {
            max_cycles: cfg.max_cycles,
            retry_delay: Duration::from_millis(cfg.retry_delay_ms),
            parallel: cfg.parallel,
        }
    }
}

/// Probes a single URL.
pub fn probe_size<S>(source: &S, url: &str, opts: &ProbeOptions) -> MediaSize
where
    S: HeaderSource + ?Sized,
{
    if url.is_empty() {
        tracing::debug!("skipping size probe for empty URL");
        return MediaSize::Unknown;
    }

    for cycle in 1..=opts.max_cycles {
        for strategy in Strategy::ORDER {
            match source.fetch(url, strategy) {
                Ok(headers) => {
                    if let Some(bytes) = headers.size_bytes(strategy) {
                        tracing::debug!(
                            "size of {} via {:?}: {} bytes (cycle {})",
                            url,
                            strategy,
                            bytes,
                            cycle
                        );
                        return MediaSize::from_bytes(bytes);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "URL: {}... | retries {} ({:?}) fail: {}",
                        truncate(url, 50),
                        cycle,
                        strategy,
                        e
                    );
                }
            }
        }
        if !opts.retry_delay.is_zero() {
            thread::sleep(opts.retry_delay);
        }
    }

    tracing::warn!(
        "size of {} unknown after {} cycles",
        truncate(url, 50),
        opts.max_cycles
    );
    MediaSize::Unknown
}

/// Probes every URL; one URL's failure never affects the others.
pub fn probe_sizes<S>(source: &S, urls: &[String], opts: &ProbeOptions) -> SizeReport
where
    S: HeaderSource + ?Sized,
{
    let sizes: Vec<MediaSize> = if opts.parallel && urls.len() > 1 {
        thread::scope(|scope| {
            let handles: Vec<_> = urls
                .iter()
                .map(|url| scope.spawn(move || probe_size(source, url, opts)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or(MediaSize::Unknown))
                .collect()
        })
    } else {
        urls.iter().map(|url| probe_size(source, url, opts)).collect()
    };
    SizeReport { sizes }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

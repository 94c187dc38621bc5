//! Length header parsing for the size probe.

const KIB: u64 = 1024;

/// `Content-Length` value as bytes.
pub fn content_length(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

/// Total size from a `Content-Range` value such as `bytes 0-0/5242880`.
/// An unknown total (`*`) yields `None`.
pub fn content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse::<u64>().ok()
}

/// Whole megabytes, truncating: bytes / 1024 / 1024.
pub fn bytes_to_megabytes(bytes: u64) -> u64 {
    bytes / KIB / KIB
}

//! Fold raw response header lines into name/value pairs.

/// Parse collected header lines into `(name, value)` pairs.
///
/// With redirects followed, libcurl reports the headers of every hop; only
/// the block after the last status line is kept.
pub fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    let start = lines
        .iter()
        .rposition(|l| l.trim_start().starts_with("HTTP/"))
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut headers = Vec::new();
    for line in &lines[start..] {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    headers
}

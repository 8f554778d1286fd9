//! Line scanner for `key: value` pseudo-file blobs.
//!
//! `/proc/cpuinfo` and friends are blocks of `key\t: value` lines with
//! arbitrary blank lines in between. The scanner yields one pair per line
//! that contains a `:`; everything else is skipped without error.

/// Longest key kept; longer keys are truncated, not rejected.
const MAX_KEY_LEN: usize = 128;
/// Longest value kept; longer values are truncated, not rejected.
const MAX_VALUE_LEN: usize = 512;

/// Iterator over `(key, value)` pairs of a text blob.
///
/// Keys are trimmed of trailing whitespace (cpuinfo pads them with tabs),
/// values of leading spaces after the colon. Each call to [`KvPairs::new`]
/// restarts from the top of the blob.
pub struct KvPairs<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> KvPairs<'a> {
    pub fn new(blob: &'a str) -> Self {
        Self {
            lines: blob.lines(),
        }
    }
}

impl<'a> Iterator for KvPairs<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<(&'a str, &'a str)> {
        for line in self.lines.by_ref() {
            if let Some((key, value)) = line.split_once(':') {
                let key = truncate(key.trim_end(), MAX_KEY_LEN);
                let value = truncate(value.trim_start_matches(' '), MAX_VALUE_LEN);
                return Some((key, value));
            }
        }
        None
    }
}

/// Truncates to at most `max` bytes without splitting a UTF-8 sequence.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

//! Hardware identity collection from `/proc` and `/sys` text sources.
//!
//! The collectors are deliberately forgiving: a malformed line is skipped,
//! a missing sysfs file reads as zero, and an unknown code is rendered
//! with the code kept verbatim. The only failure surfaced to callers is
//! the primary pseudo-file being unavailable.

pub mod board;
pub mod cpu;
pub mod kv;
pub mod mock;
pub mod sysfs;
pub mod traits;

pub use board::BoardScanner;
pub use cpu::CpuScanner;
pub use traits::{FileSystem, RealFs};

use std::io;

/// Error type for collection failures.
#[derive(Debug)]
pub enum CollectError {
    /// The primary source file (e.g. `/proc/cpuinfo`) is missing or
    /// unreadable.
    Unavailable(String),
    /// Other I/O error reading a source file.
    Io(io::Error),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Unavailable(path) => write!(f, "source unavailable: {}", path),
            CollectError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CollectError {}

impl From<io::Error> for CollectError {
    fn from(e: io::Error) -> Self {
        CollectError::Io(e)
    }
}

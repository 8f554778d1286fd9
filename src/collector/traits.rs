//! Filesystem abstraction so collectors can run against real `/proc` and
//! `/sys` or an in-memory mock in tests.

use std::io;
use std::path::Path;

/// Read-only filesystem operations the collectors need.
///
/// Every source this crate consumes is a small pseudo-file read in one shot,
/// so the surface is just "read whole file" plus an existence probe.
pub trait FileSystem {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

impl<F: FileSystem> FileSystem for &F {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (*self).read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (*self).exists(path)
    }
}

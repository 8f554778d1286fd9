//! sbcinfo - Single-board computer hardware identification library.
//!
//! Scans `/proc/cpuinfo` and sysfs into per-core records, decodes ARM and
//! RISC-V identity codes against static tables, recognizes Raspberry Pi
//! boards by revision code, and exposes everything as ordered field
//! registries for rendering.

pub mod collector;
pub mod decode;
pub mod fields;
pub mod flags;
pub mod interner;
pub mod report;
pub mod view;

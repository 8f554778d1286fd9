//! Per-core sysfs attribute reads and other scalar pseudo-files.
//!
//! Everything here degrades to zero/empty when a file is absent; a core
//! without a cpufreq directory simply reports 0 kHz.

use crate::collector::traits::FileSystem;
use std::path::Path;

/// Min/max/current scaling frequency of one core, in kHz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuClocks {
    pub min_khz: u32,
    pub max_khz: u32,
    pub cur_khz: u32,
}

/// Reader for `/sys/devices/system/cpu/cpu<N>/...` scalar files.
#[derive(Debug, Clone)]
pub struct SysCpuReader<F: FileSystem> {
    fs: F,
    sys_root: String,
}

impl<F: FileSystem> SysCpuReader<F> {
    pub fn new(fs: F, sys_root: impl Into<String>) -> Self {
        Self {
            fs,
            sys_root: sys_root.into(),
        }
    }

    /// Reads a per-core attribute file, e.g. `cpufreq/scaling_max_freq`.
    pub fn core_attr(&self, id: i32, item: &str) -> Option<String> {
        let path = format!("{}/devices/system/cpu/cpu{}/{}", self.sys_root, id, item);
        self.fs.read_to_string(Path::new(&path)).ok()
    }

    /// Reads a per-core attribute as an integer; absent or malformed is 0.
    pub fn core_int(&self, id: i32, item: &str) -> u32 {
        self.core_attr(id, item)
            .map(|s| parse_leading_u32(&s))
            .unwrap_or(0)
    }

    /// Reads the cpufreq scaling triple for one core.
    pub fn core_clocks(&self, id: i32) -> CpuClocks {
        CpuClocks {
            min_khz: self.core_int(id, "cpufreq/scaling_min_freq"),
            max_khz: self.core_int(id, "cpufreq/scaling_max_freq"),
            cur_khz: self.core_int(id, "cpufreq/scaling_cur_freq"),
        }
    }

    /// Reads the current scaling frequency only. Used by the
    /// always-recompute field path.
    pub fn core_cur_khz(&self, id: i32) -> u32 {
        self.core_int(id, "cpufreq/scaling_cur_freq")
    }

    /// Reads an aarch64 identification register, e.g.
    /// `regs/identification/midr_el1`. The kernel prints these as `0x...`.
    pub fn core_id_reg(&self, id: i32, name: &str) -> u64 {
        self.core_attr(id, &format!("regs/identification/{}", name))
            .map(|s| parse_auto_radix_u64(&s))
            .unwrap_or(0)
    }

    /// SoC temperature in degrees Celsius from thermal_zone0, or `None`
    /// when the zone is absent.
    pub fn soc_temp(&self) -> Option<f32> {
        let path = format!("{}/class/thermal/thermal_zone0/temp", self.sys_root);
        let content = self.fs.read_to_string(Path::new(&path)).ok()?;
        let milli = parse_leading_u32(&content);
        Some(milli as f32 / 1000.0)
    }
}

/// Reads a device-tree string file, e.g. `/proc/device-tree/model`.
///
/// Device-tree strings are NUL-terminated; trailing NULs and newlines are
/// stripped.
pub fn dt_string<F: FileSystem>(fs: &F, proc_root: &str, item: &str) -> Option<String> {
    let path = format!("{}/device-tree/{}", proc_root, item);
    let content = fs.read_to_string(Path::new(&path)).ok()?;
    Some(content.trim_end_matches(['\0', '\n']).to_string())
}

/// Parses the leading decimal digits of a scalar file, ignoring trailing
/// whitespace or junk. Malformed input is 0, never an error.
fn parse_leading_u32(s: &str) -> u32 {
    let t = s.trim_start();
    let digits: &str = &t[..t.len() - t.trim_start_matches(|c: char| c.is_ascii_digit()).len()];
    digits.parse().unwrap_or(0)
}

/// Parses an integer with C `strtoull(_, _, 0)` radix selection: a `0x`
/// prefix means hex, otherwise decimal.
fn parse_auto_radix_u64(s: &str) -> u64 {
    let t = s.trim();
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        let digits = &hex[..hex.len() - hex.trim_start_matches(|c: char| c.is_ascii_hexdigit()).len()];
        u64::from_str_radix(digits, 16).unwrap_or(0)
    } else {
        let digits = &t[..t.len() - t.trim_start_matches(|c: char| c.is_ascii_digit()).len()];
        digits.parse().unwrap_or(0)
    }
}

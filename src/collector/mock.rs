//! In-memory mock filesystem plus pre-built board scenarios for tests.
//!
//! The scenarios mirror real `/proc/cpuinfo` and sysfs layouts from boards
//! this tool targets, including the kernel variant that prints shared CPU
//! attributes only for the first core.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content. Parent directories are created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
        self.files.insert(path, content.into());
    }

    /// Adds the cpufreq scaling files for one core.
    pub fn add_cpufreq(&mut self, id: i32, min_khz: u32, max_khz: u32, cur_khz: u32) {
        let base = format!("/sys/devices/system/cpu/cpu{}/cpufreq", id);
        self.add_file(format!("{}/scaling_min_freq", base), format!("{}\n", min_khz));
        self.add_file(format!("{}/scaling_max_freq", base), format!("{}\n", max_khz));
        self.add_file(format!("{}/scaling_cur_freq", base), format!("{}\n", cur_khz));
    }

    /// Adds the aarch64 identification register files for one core.
    pub fn add_id_regs(&mut self, id: i32, midr: &str, revidr: &str) {
        let base = format!("/sys/devices/system/cpu/cpu{}/regs/identification", id);
        self.add_file(format!("{}/midr_el1", base), format!("{}\n", midr));
        self.add_file(format!("{}/revidr_el1", base), format!("{}\n", revidr));
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{:?}", path)))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }
}

const PI3_FEATURES: &str =
    "half thumb fastmult vfp edsp neon vfpv3 tls vfpv4 idiva idivt vfpd32 lpae evtstrm crc32";

impl MockFs {
    /// Raspberry Pi 3 Model B running a 32-bit kernel: four Cortex-A53
    /// cores with the full attribute block repeated for every core.
    pub fn raspberry_pi3() -> Self {
        let mut fs = Self::new();

        let mut cpuinfo = String::new();
        for i in 0..4 {
            cpuinfo.push_str(&format!(
                "processor\t: {}\n\
                 model name\t: ARMv7 Processor rev 4 (v7l)\n\
                 BogoMIPS\t: 38.40\n\
                 Features\t: {}\n\
                 CPU implementer\t: 0x41\n\
                 CPU architecture: 7\n\
                 CPU variant\t: 0x0\n\
                 CPU part\t: 0xd03\n\
                 CPU revision\t: 4\n\n",
                i, PI3_FEATURES
            ));
        }
        cpuinfo.push_str(
            "Hardware\t: BCM2709\n\
             Revision\t: a02082\n\
             Serial\t\t: 00000000deadbeef\n",
        );
        fs.add_file("/proc/cpuinfo", cpuinfo);
        fs.add_file(
            "/proc/device-tree/model",
            "Raspberry Pi 3 Model B Rev 1.2\0",
        );
        fs.add_file("/sys/class/thermal/thermal_zone0/temp", "48312\n");

        for i in 0..4 {
            fs.add_cpufreq(i, 600000, 1200000, 600000);
            fs.add_id_regs(i, "0x410fd034", "0x0000000000000080");
        }
        fs
    }

    /// An arm64 kernel variant that prints the shared attribute block
    /// (Features, implementer, part, ...) only for the first core.
    pub fn arm64_deduplicated() -> Self {
        let mut fs = Self::new();
        fs.add_file(
            "/proc/cpuinfo",
            "processor\t: 0\n\
             model name\t: ARMv8 Processor rev 4 (v8l)\n\
             Features\t: fp asimd evtstrm crc32 cpuid\n\
             CPU implementer\t: 0x41\n\
             CPU architecture: 8\n\
             CPU variant\t: 0x0\n\
             CPU part\t: 0xd03\n\
             CPU revision\t: 4\n\
             \n\
             processor\t: 1\n\
             \n\
             processor\t: 2\n\
             \n\
             processor\t: 3\n\
             \n\
             Hardware\t: BCM2837\n\
             Revision\t: a02082\n\
             Serial\t\t: 00000000cafef00d\n",
        );
        fs.add_file(
            "/proc/device-tree/model",
            "Raspberry Pi 3 Model B Rev 1.2\0",
        );
        fs.add_file("/sys/class/thermal/thermal_zone0/temp", "52101\n");
        for i in 0..4 {
            fs.add_cpufreq(i, 600000, 1200000, 1200000);
        }
        fs
    }

    /// A SiFive-style RISC-V board: four harts numbered 1..=4, ISA string
    /// printed once per hart, no cpufreq sysfs.
    pub fn riscv_u54() -> Self {
        let mut fs = Self::new();
        let mut cpuinfo = String::new();
        for i in 1..=4 {
            cpuinfo.push_str(&format!(
                "processor\t: {}\n\
                 hart\t: {}\n\
                 isa\t: rv64imafdc\n\
                 mmu\t: sv39\n\
                 uarch\t: sifive,u54-mc\n\n",
                i - 1,
                i
            ));
        }
        fs.add_file("/proc/cpuinfo", cpuinfo);
        fs
    }

    /// A single-core cpuinfo with no boundary key at all; architecture
    /// keys imply one implicit core with id 0.
    pub fn implicit_single_core() -> Self {
        let mut fs = Self::new();
        fs.add_file(
            "/proc/cpuinfo",
            "Processor\t: ARMv6-compatible processor rev 7 (v6l)\n\
             model name\t: ARMv6-compatible processor rev 7 (v6l)\n\
             Features\t: half thumb fastmult vfp edsp java tls\n\
             CPU implementer\t: 0x41\n\
             CPU architecture: 7\n\
             CPU variant\t: 0x0\n\
             CPU part\t: 0xb76\n\
             CPU revision\t: 7\n\
             Hardware\t: BCM2708\n\
             Revision\t: 0002\n\
             Serial\t\t: 000000003d9a54c5\n",
        );
        fs.add_file("/proc/device-tree/model", "Raspberry Pi Model B Rev 1.0\0");
        fs.add_cpufreq(0, 700000, 700000, 700000);
        fs
    }
}

//! Board identification from the cpuinfo revision code and device tree.

use crate::collector::kv::KvPairs;
use crate::collector::sysfs::dt_string;
use crate::collector::traits::FileSystem;
use crate::decode::boards::{self, BoardInfo};
use std::path::Path;
use tracing::debug;

/// Resolved board identity. Immutable once scanned.
#[derive(Debug, Clone)]
pub struct BoardRecord {
    /// Raw `Revision:` code from cpuinfo, overvolt prefix included.
    pub revision_code: Option<String>,
    pub serial: Option<String>,
    /// `Hardware:` key; the reported SoC on Raspberry Pi kernels.
    pub reported_soc: Option<String>,
    /// Matched revision-history row; the sentinel row when unknown.
    pub info: &'static BoardInfo,
    /// The warranty-voiding overclock marker was present in the code.
    pub overvolt: bool,
    /// `/proc/device-tree/model`, if the file exists.
    pub dt_model: Option<String>,
    pub description: String,
}

impl BoardRecord {
    /// SoC name: the historical table's spec when known, otherwise
    /// whatever the kernel reported.
    pub fn soc(&self) -> Option<&str> {
        self.info.soc.or(self.reported_soc.as_deref())
    }
}

/// Scans board identity sources under a `/proc` root.
pub struct BoardScanner<F: FileSystem> {
    fs: F,
    proc_root: String,
}

impl<F: FileSystem> BoardScanner<F> {
    pub fn new(fs: F, proc_root: impl Into<String>) -> Self {
        Self {
            fs,
            proc_root: proc_root.into(),
        }
    }

    /// True when the device tree says this is a Raspberry Pi.
    pub fn is_raspberry_pi(&self) -> bool {
        dt_string(&self.fs, &self.proc_root, "model")
            .map(|m| m.contains("Raspberry Pi"))
            .unwrap_or(false)
    }

    /// Builds the board record. Missing sources degrade to absent fields;
    /// this never fails.
    pub fn scan(&self) -> BoardRecord {
        let mut revision_code = None;
        let mut serial = None;
        let mut reported_soc = None;

        let path = format!("{}/cpuinfo", self.proc_root);
        if let Ok(cpuinfo) = self.fs.read_to_string(Path::new(&path)) {
            for (key, value) in KvPairs::new(&cpuinfo) {
                match key {
                    "Revision" => revision_code = Some(value.to_string()),
                    "Serial" => serial = Some(value.to_string()),
                    "Hardware" => reported_soc = Some(value.to_string()),
                    _ => {}
                }
            }
        }

        let index = revision_code
            .as_deref()
            .map(boards::find_board)
            .unwrap_or(0);
        let info = boards::board(index);
        let overvolt = revision_code
            .as_deref()
            .map(|code| boards::overvolt_prefix_len(code) > 0)
            .unwrap_or(false);

        let dt_model = dt_string(&self.fs, &self.proc_root, "model");
        let description = if index != 0 {
            format!("Raspberry Pi {} Rev {}", info.model, info.pcb)
        } else {
            dt_model
                .clone()
                .unwrap_or_else(|| boards::UNKNOWN.to_string())
        };
        debug!(?revision_code, index, overvolt, "board identified");

        BoardRecord {
            revision_code,
            serial,
            reported_soc,
            info,
            overvolt,
            dt_model,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_pi3_board_record() {
        let board = BoardScanner::new(MockFs::raspberry_pi3(), "/proc").scan();

        assert_eq!(board.revision_code.as_deref(), Some("a02082"));
        assert_eq!(board.serial.as_deref(), Some("00000000deadbeef"));
        assert_eq!(board.info.model, "3 Model B");
        assert_eq!(board.info.pcb, "1.2");
        assert_eq!(board.soc(), Some("BCM2837"));
        assert_eq!(board.description, "Raspberry Pi 3 Model B Rev 1.2");
        assert!(!board.overvolt);
    }

    #[test]
    fn test_overvolt_detection() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "Revision\t: 1000003\n");
        let board = BoardScanner::new(fs, "/proc").scan();

        assert!(board.overvolt);
        assert_eq!(board.info.model, "B (ECN0001)");

        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "Revision\t: 0003\n");
        let board = BoardScanner::new(fs, "/proc").scan();
        assert!(!board.overvolt);
        assert_eq!(board.info.model, "B (ECN0001)");
    }

    #[test]
    fn test_unknown_revision_falls_back_to_dt_model() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "Revision\t: ffffff\n");
        fs.add_file("/proc/device-tree/model", "Custom Board v9\0");
        let board = BoardScanner::new(fs, "/proc").scan();

        assert_eq!(board.info.model, boards::UNKNOWN);
        assert_eq!(board.description, "Custom Board v9");

        // Without a device tree either, the sentinel description stands.
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "Revision\t: ffffff\n");
        let board = BoardScanner::new(fs, "/proc").scan();
        assert_eq!(board.description, "(Unknown)");
    }

    #[test]
    fn test_nothing_available_is_unknown() {
        let board = BoardScanner::new(MockFs::new(), "/proc").scan();

        assert!(board.revision_code.is_none());
        assert_eq!(board.description, "(Unknown)");
        assert_eq!(board.soc(), None);
        assert!(!board.overvolt);
    }

    #[test]
    fn test_is_raspberry_pi_gate() {
        assert!(BoardScanner::new(MockFs::raspberry_pi3(), "/proc").is_raspberry_pi());
        assert!(!BoardScanner::new(MockFs::riscv_u54(), "/proc").is_raspberry_pi());
    }

    #[test]
    fn test_reported_soc_when_spec_missing() {
        // Revision 0004 has no SoC spec in the table; the kernel-reported
        // Hardware value stands in.
        let mut fs = MockFs::new();
        fs.add_file(
            "/proc/cpuinfo",
            "Hardware\t: BCM2835\nRevision\t: 0004\n",
        );
        let board = BoardScanner::new(fs, "/proc").scan();
        assert_eq!(board.info.model, "B");
        assert_eq!(board.soc(), Some("BCM2835"));
    }
}

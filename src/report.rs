//! Report objects: each owns a scanned record and lazily builds its field
//! registry exactly once.
//!
//! Tags follow a fixed declaration order: summary fields, then detail
//! fields, then one block per core. Rendering the registry in insertion
//! order therefore reproduces a stable report layout.

use crate::collector::board::BoardRecord;
use crate::collector::cpu::{CoreRecord, ProcessorInventory};
use crate::collector::sysfs::SysCpuReader;
use crate::collector::traits::FileSystem;
use crate::decode::{self, arm, riscv};
use crate::fields::{ComputedField, Field, FieldCompute, FieldRegistry};
use std::cell::OnceCell;

/// Processor inventory plus its memoized field registry.
pub struct ProcessorReport<F: FileSystem> {
    inventory: ProcessorInventory,
    sys: SysCpuReader<F>,
    fields: OnceCell<FieldRegistry>,
}

impl<F: FileSystem> ProcessorReport<F> {
    pub fn new(inventory: ProcessorInventory, sys: SysCpuReader<F>) -> Self {
        Self {
            inventory,
            sys,
            fields: OnceCell::new(),
        }
    }

    pub fn inventory(&self) -> &ProcessorInventory {
        &self.inventory
    }

    /// First call builds the registry; later calls return the same
    /// instance unchanged.
    pub fn fields(&self) -> &FieldRegistry {
        self.fields.get_or_init(|| self.build_fields())
    }

    fn build_fields(&self) -> FieldRegistry {
        let mut reg = FieldRegistry::new();
        reg.insert(Field::computed(
            "summary.proc_desc",
            "Processor",
            false,
            false,
            ComputedField::ProcessorDescription,
        ));
        reg.insert(Field::computed(
            "cpu.name",
            "Processor Name",
            false,
            false,
            ComputedField::ProcessorName,
        ));
        reg.insert(Field::computed(
            "cpu.desc",
            "Processor Description",
            false,
            false,
            ComputedField::ProcessorDescription,
        ));
        reg.insert(Field::computed(
            "cpu.count",
            "Core Count",
            true,
            false,
            ComputedField::CoreCount,
        ));

        for (i, core) in self.inventory.cores.iter().enumerate() {
            let id = core.id();
            match core {
                CoreRecord::Arm(c) => {
                    reg.insert(Field::literal(
                        format!("cpu.thread[{}].model_name", i),
                        format!("[{}] linux name", id),
                        true,
                        c.model_name.as_deref().unwrap_or(""),
                    ));
                    reg.insert(Field::literal(
                        format!("cpu.thread[{}].decoded_name", i),
                        format!("[{}] decoded name", id),
                        true,
                        c.decoded_name.as_deref().unwrap_or(""),
                    ));
                    reg.insert(Field::literal(
                        format!("cpu.thread[{}].cpu_implementer", i),
                        format!("[{}] implementer", id),
                        true,
                        annotate(c.implementer.as_deref(), arm::implementer),
                    ));
                    reg.insert(Field::literal(
                        format!("cpu.thread[{}].cpu_architecture", i),
                        format!("[{}] architecture", id),
                        true,
                        annotate(c.architecture.as_deref(), arm::architecture),
                    ));
                    reg.insert(Field::literal(
                        format!("cpu.thread[{}].cpu_part", i),
                        format!("[{}] part", id),
                        true,
                        match (c.implementer.as_deref(), c.part.as_deref()) {
                            (Some(imp), Some(p)) => decode::annotated(p, arm::part(imp, p)),
                            _ => String::new(),
                        },
                    ));
                    reg.insert(Field::literal(
                        format!("cpu.thread[{}].cpu_variant", i),
                        format!("[{}] variant", id),
                        true,
                        c.variant.as_deref().unwrap_or(""),
                    ));
                    reg.insert(Field::literal(
                        format!("cpu.thread[{}].cpu_revision", i),
                        format!("[{}] revision", id),
                        true,
                        c.revision.as_deref().unwrap_or(""),
                    ));
                    reg.insert(Field::literal(
                        format!("cpu.thread[{}].reg_midr_el1", i),
                        format!("[{}] reg_midr_el1", id),
                        true,
                        format!("0x{:016x}", c.reg_midr_el1),
                    ));
                    reg.insert(Field::literal(
                        format!("cpu.thread[{}].reg_revidr_el1", i),
                        format!("[{}] reg_revidr_el1", id),
                        true,
                        format!("0x{:016x}", c.reg_revidr_el1),
                    ));
                }
                CoreRecord::Riscv(c) => {
                    reg.insert(Field::literal(
                        format!("cpu.thread[{}].model_name", i),
                        format!("[{}] linux name", id),
                        true,
                        c.model_name.as_deref().unwrap_or(""),
                    ));
                    reg.insert(Field::literal(
                        format!("cpu.thread[{}].isa", i),
                        format!("[{}] isa", id),
                        true,
                        c.isa.as_deref().unwrap_or(""),
                    ));
                    reg.insert(Field::literal(
                        format!("cpu.thread[{}].isa_decoded", i),
                        format!("[{}] decoded isa", id),
                        true,
                        c.flags.as_deref().map(riscv::describe_flags).unwrap_or_default(),
                    ));
                }
            }
            reg.insert(Field::computed(
                format!("cpu.thread[{}].cur_khz", i),
                format!("[{}] current clock", id),
                true,
                true,
                ComputedField::CoreCurKhz(i),
            ));
        }
        reg
    }
}

impl<F: FileSystem> FieldCompute for ProcessorReport<F> {
    fn compute(&self, field: ComputedField) -> String {
        match field {
            ComputedField::ProcessorDescription => self.inventory.description.clone(),
            ComputedField::ProcessorName => self.inventory.hardware_name.clone(),
            ComputedField::CoreCount => self.inventory.core_count().to_string(),
            ComputedField::CoreCurKhz(i) => self
                .inventory
                .cores
                .get(i)
                .map(|c| self.sys.core_cur_khz(c.id()).to_string())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }
}

/// Board record plus its memoized field registry.
pub struct BoardReport<F: FileSystem> {
    record: BoardRecord,
    sys: SysCpuReader<F>,
    fields: OnceCell<FieldRegistry>,
}

impl<F: FileSystem> BoardReport<F> {
    pub fn new(record: BoardRecord, sys: SysCpuReader<F>) -> Self {
        Self {
            record,
            sys,
            fields: OnceCell::new(),
        }
    }

    pub fn record(&self) -> &BoardRecord {
        &self.record
    }

    pub fn fields(&self) -> &FieldRegistry {
        self.fields.get_or_init(|| self.build_fields())
    }

    fn build_fields(&self) -> FieldRegistry {
        let mut reg = FieldRegistry::new();
        reg.insert(Field::computed(
            "summary.board_name",
            "Board Name",
            false,
            false,
            ComputedField::BoardDescription,
        ));
        reg.insert(Field::computed(
            "summary.soc_temp",
            "SOC Temp",
            true,
            true,
            ComputedField::SocTemp,
        ));
        reg.insert(Field::computed(
            "board.name",
            "Model",
            false,
            false,
            ComputedField::BoardDescription,
        ));
        reg.insert(Field::computed(
            "board.intro",
            "Introduction",
            false,
            false,
            ComputedField::BoardIntro,
        ));
        reg.insert(Field::computed(
            "board.mfg_by",
            "Manufacturer",
            false,
            false,
            ComputedField::BoardManufacturer,
        ));
        reg.insert(Field::computed(
            "board.mem_spec",
            "Memory (spec)",
            false,
            false,
            ComputedField::BoardMemorySpec,
        ));
        if let Some(soc_spec) = self.record.info.soc {
            reg.insert(Field::literal("board.soc_spec", "SOC (spec)", false, soc_spec));
        }
        reg.insert(Field::literal(
            "board.soc",
            "SOC (reported)",
            false,
            self.record.reported_soc.as_deref().unwrap_or(""),
        ));
        reg.insert(Field::computed(
            "board.rcode",
            "RCode",
            false,
            false,
            ComputedField::BoardRevisionCode,
        ));
        reg.insert(Field::computed(
            "board.serial",
            "Serial Number",
            false,
            false,
            ComputedField::BoardSerial,
        ));
        reg.insert(Field::computed(
            "board.overvolt",
            "Overvolt",
            true,
            false,
            ComputedField::BoardOvervolt,
        ));
        reg.insert(Field::computed(
            "board.soc_temp",
            "SOC Temp",
            true,
            true,
            ComputedField::SocTemp,
        ));
        reg
    }
}

impl<F: FileSystem> FieldCompute for BoardReport<F> {
    fn compute(&self, field: ComputedField) -> String {
        match field {
            ComputedField::BoardDescription => self.record.description.clone(),
            ComputedField::BoardIntro => self.record.info.intro.to_string(),
            ComputedField::BoardManufacturer => self.record.info.manufacturer.to_string(),
            ComputedField::BoardMemorySpec => self.record.info.memory.to_string(),
            ComputedField::BoardRevisionCode => {
                self.record.revision_code.clone().unwrap_or_default()
            }
            ComputedField::BoardSerial => self.record.serial.clone().unwrap_or_default(),
            ComputedField::BoardOvervolt => if self.record.overvolt {
                "yes (warranty void!)"
            } else {
                "never"
            }
            .to_string(),
            ComputedField::SocTemp => {
                format!("{:.2}'C", self.sys.soc_temp().unwrap_or(0.0))
            }
            _ => String::new(),
        }
    }
}

/// Annotates a raw code with a single-key table lookup.
fn annotate(code: Option<&str>, lookup: impl Fn(&str) -> Option<&'static str>) -> String {
    code.map(|c| decode::annotated(c, lookup(c))).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;
    use crate::collector::{BoardScanner, CpuScanner};
    use crate::decode::arm::KNOWN_FLAGS;
    use crate::flags::FlagVocabulary;

    fn processor_report(fs: MockFs) -> ProcessorReport<MockFs> {
        let mut vocab = FlagVocabulary::with_known(KNOWN_FLAGS);
        let inventory = CpuScanner::new(fs.clone(), "/proc", "/sys")
            .scan(&mut vocab)
            .unwrap();
        ProcessorReport::new(inventory, SysCpuReader::new(fs, "/sys"))
    }

    fn board_report(fs: MockFs) -> BoardReport<MockFs> {
        let record = BoardScanner::new(fs.clone(), "/proc").scan();
        BoardReport::new(record, SysCpuReader::new(fs, "/sys"))
    }

    #[test]
    fn test_registry_built_once() {
        let report = processor_report(MockFs::raspberry_pi3());
        let first = report.fields() as *const FieldRegistry;
        let second = report.fields() as *const FieldRegistry;
        assert_eq!(first, second);

        let tags1: Vec<String> = report.fields().iter().map(|f| f.tag().to_string()).collect();
        let tags2: Vec<String> = report.fields().iter().map(|f| f.tag().to_string()).collect();
        assert_eq!(tags1, tags2);
    }

    #[test]
    fn test_processor_summary_fields() {
        let report = processor_report(MockFs::raspberry_pi3());
        let reg = report.fields();

        assert_eq!(
            reg.get("summary.proc_desc").unwrap().value(&report),
            "4x ARM Cortex-A53 r0p4; 4x 1200.00 MHz"
        );
        assert_eq!(reg.get("cpu.name").unwrap().value(&report), "BCM2709");
        assert_eq!(reg.get("cpu.count").unwrap().value(&report), "4");
    }

    #[test]
    fn test_processor_per_core_fields() {
        let report = processor_report(MockFs::raspberry_pi3());
        let reg = report.fields();

        assert_eq!(
            reg.get("cpu.thread[3].cpu_part").unwrap().value(&report),
            "[0xd03] Cortex-A53"
        );
        assert_eq!(
            reg.get("cpu.thread[0].cpu_implementer").unwrap().value(&report),
            "[0x41] ARM"
        );
        assert_eq!(
            reg.get("cpu.thread[0].reg_midr_el1").unwrap().value(&report),
            "0x00000000410fd034"
        );
        assert_eq!(
            reg.get("cpu.thread[0].cur_khz").unwrap().value(&report),
            "600000"
        );
        assert!(reg.get("cpu.thread[0].cur_khz").unwrap().recompute());
    }

    #[test]
    fn test_riscv_field_layout() {
        let report = processor_report(MockFs::riscv_u54());
        let reg = report.fields();

        assert_eq!(
            reg.get("cpu.thread[0].isa").unwrap().value(&report),
            "rv64imafdc"
        );
        assert_eq!(reg.get("cpu.thread[0].isa").unwrap().label(), "[1] isa");
        assert_eq!(
            reg.get("cpu.thread[0].isa_decoded").unwrap().value(&report),
            "rv64 (RV64 base) i (base integer) m (integer multiply/divide) \
             a (atomic operations) f (single-precision float) \
             d (double-precision float) c (compressed instructions)"
        );
        assert!(reg.get("cpu.thread[0].cpu_part").is_none());
    }

    #[test]
    fn test_board_fields() {
        let report = board_report(MockFs::raspberry_pi3());
        let reg = report.fields();

        assert_eq!(
            reg.get("summary.board_name").unwrap().value(&report),
            "Raspberry Pi 3 Model B Rev 1.2"
        );
        assert_eq!(reg.get("board.soc_spec").unwrap().value(&report), "BCM2837");
        assert_eq!(reg.get("board.soc").unwrap().value(&report), "BCM2709");
        assert_eq!(reg.get("board.rcode").unwrap().value(&report), "a02082");
        assert_eq!(reg.get("board.overvolt").unwrap().value(&report), "never");
        assert_eq!(reg.get("board.soc_temp").unwrap().value(&report), "48.31'C");
        assert_eq!(reg.get("board.intro").unwrap().value(&report), "Q1 2016");
    }

    #[test]
    fn test_board_field_order_is_stable() {
        let report = board_report(MockFs::raspberry_pi3());
        let tags: Vec<&str> = report.fields().iter().map(|f| f.tag()).collect();
        assert_eq!(
            tags,
            vec![
                "summary.board_name",
                "summary.soc_temp",
                "board.name",
                "board.intro",
                "board.mfg_by",
                "board.mem_spec",
                "board.soc_spec",
                "board.soc",
                "board.rcode",
                "board.serial",
                "board.overvolt",
                "board.soc_temp",
            ]
        );
    }

    #[test]
    fn test_end_to_end_against_real_files() {
        use crate::collector::RealFs;
        use std::fs;
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let proc_root = dir.path().join("proc");
        let sys_root = dir.path().join("sys");

        fs::create_dir_all(proc_root.join("device-tree")).unwrap();
        fs::write(
            proc_root.join("cpuinfo"),
            "processor\t: 0\n\
             model name\t: ARMv7 Processor rev 4 (v7l)\n\
             Features\t: half thumb vfp neon\n\
             CPU implementer\t: 0x41\n\
             CPU architecture: 7\n\
             CPU variant\t: 0x0\n\
             CPU part\t: 0xd03\n\
             CPU revision\t: 4\n\
             \n\
             Hardware\t: BCM2709\n\
             Revision\t: a02082\n\
             Serial\t\t: 0000000012345678\n",
        )
        .unwrap();
        fs::write(
            proc_root.join("device-tree/model"),
            b"Raspberry Pi 3 Model B Rev 1.2\0",
        )
        .unwrap();
        let cpufreq = sys_root.join("devices/system/cpu/cpu0/cpufreq");
        fs::create_dir_all(&cpufreq).unwrap();
        fs::write(cpufreq.join("scaling_min_freq"), "600000\n").unwrap();
        fs::write(cpufreq.join("scaling_max_freq"), "1200000\n").unwrap();
        fs::write(cpufreq.join("scaling_cur_freq"), "900000\n").unwrap();
        let thermal = sys_root.join("class/thermal/thermal_zone0");
        fs::create_dir_all(&thermal).unwrap();
        fs::write(thermal.join("temp"), "51234\n").unwrap();

        let proc_root = proc_root.to_str().unwrap().to_string();
        let sys_root = sys_root.to_str().unwrap().to_string();

        let mut vocab = FlagVocabulary::with_known(KNOWN_FLAGS);
        let inventory = CpuScanner::new(RealFs, &*proc_root, &*sys_root)
            .scan(&mut vocab)
            .unwrap();
        let report = ProcessorReport::new(inventory, SysCpuReader::new(RealFs, &*sys_root));
        assert_eq!(
            report.fields().get("summary.proc_desc").unwrap().value(&report),
            "1x ARM Cortex-A53 r0p4; 1x 1200.00 MHz"
        );
        assert_eq!(
            report.fields().get("cpu.thread[0].cur_khz").unwrap().value(&report),
            "900000"
        );

        let scanner = BoardScanner::new(RealFs, &*proc_root);
        assert!(scanner.is_raspberry_pi());
        let board = BoardReport::new(scanner.scan(), SysCpuReader::new(RealFs, &*sys_root));
        assert_eq!(
            board.fields().get("summary.board_name").unwrap().value(&board),
            "Raspberry Pi 3 Model B Rev 1.2"
        );
        assert_eq!(
            board.fields().get("board.soc_temp").unwrap().value(&board),
            "51.23'C"
        );
    }

    #[test]
    fn test_board_without_soc_spec_omits_field() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "Revision\t: 0004\n");
        let report = board_report(fs);
        assert!(report.fields().get("board.soc_spec").is_none());
        assert_eq!(report.fields().get("board.mfg_by").unwrap().value(&report), "Sony");
    }
}

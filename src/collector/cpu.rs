//! Per-core attribute aggregation from `/proc/cpuinfo`.
//!
//! The scan walks the key/value stream once, segmenting it into per-core
//! records at each boundary key (`processor` for ARM, `hart` for RISC-V).
//! Some kernels print shared attributes only for the first core; the
//! backward backfill pass copies those onto the cores that omitted them,
//! re-referencing the interned value rather than duplicating it.

use crate::collector::kv::KvPairs;
use crate::collector::sysfs::{CpuClocks, SysCpuReader};
use crate::collector::traits::FileSystem;
use crate::collector::CollectError;
use crate::decode::{arm, riscv};
use crate::flags::{collect_flags, FlagVocabulary};
use crate::interner::WeightedStringTable;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Processor architecture, detected once per scan from the keys present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Arm,
    Riscv,
}

impl Arch {
    /// Detects the architecture from a cpuinfo blob: `hart`/`isa` keys mean
    /// RISC-V, anything else is treated as ARM-style.
    pub fn detect(cpuinfo: &str) -> Arch {
        for (key, _) in KvPairs::new(cpuinfo) {
            if key == "hart" || key == "isa" {
                return Arch::Riscv;
            }
        }
        Arch::Arm
    }
}

/// One ARM logical core. String slots reference entries in the inventory
/// tables; `None` means the attribute never appeared, even after backfill.
#[derive(Debug, Clone, Default)]
pub struct ArmCore {
    pub id: i32,
    pub clocks: CpuClocks,
    pub reg_midr_el1: u64,
    pub reg_revidr_el1: u64,
    pub model_name: Option<Arc<str>>,
    pub flags: Option<Arc<str>>,
    pub implementer: Option<Arc<str>>,
    pub architecture: Option<Arc<str>>,
    pub variant: Option<Arc<str>>,
    pub part: Option<Arc<str>>,
    pub revision: Option<Arc<str>>,
    pub decoded_name: Option<Arc<str>>,
}

/// One RISC-V hart. `flags` is the expanded ISA string.
#[derive(Debug, Clone, Default)]
pub struct RiscvCore {
    pub id: i32,
    pub clocks: CpuClocks,
    pub model_name: Option<Arc<str>>,
    pub isa: Option<Arc<str>>,
    pub flags: Option<Arc<str>>,
}

/// A detected logical core, one of the supported record layouts.
#[derive(Debug, Clone)]
pub enum CoreRecord {
    Arm(ArmCore),
    Riscv(RiscvCore),
}

impl CoreRecord {
    pub fn id(&self) -> i32 {
        match self {
            CoreRecord::Arm(c) => c.id,
            CoreRecord::Riscv(c) => c.id,
        }
    }

    pub fn clocks(&self) -> CpuClocks {
        match self {
            CoreRecord::Arm(c) => c.clocks,
            CoreRecord::Riscv(c) => c.clocks,
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        match self {
            CoreRecord::Arm(c) => c.model_name.as_deref(),
            CoreRecord::Riscv(c) => c.model_name.as_deref(),
        }
    }

    /// Canonical human name. RISC-V has no vendor code tables; the model
    /// name (or failing that, the ISA string) passes through.
    pub fn decoded_name(&self) -> Option<&str> {
        match self {
            CoreRecord::Arm(c) => c.decoded_name.as_deref(),
            CoreRecord::Riscv(c) => c.model_name.as_deref().or(c.isa.as_deref()),
        }
    }
}

/// Weighted tables backing the core records. Tables that do not apply to
/// the detected architecture stay empty.
#[derive(Debug, Clone, Default)]
pub struct InventoryTables {
    pub model_name: WeightedStringTable,
    pub decoded_name: WeightedStringTable,
    pub flags: WeightedStringTable,
    pub implementer: WeightedStringTable,
    pub architecture: WeightedStringTable,
    pub variant: WeightedStringTable,
    pub part: WeightedStringTable,
    pub revision: WeightedStringTable,
    pub isa: WeightedStringTable,
    pub khz_max: WeightedStringTable,
}

/// Everything known about the processor complex after one scan.
#[derive(Debug, Clone)]
pub struct ProcessorInventory {
    pub arch: Arch,
    /// Value of the `Hardware:` key, if present.
    pub hardware_name: String,
    /// Human summary, `"4x ARM Cortex-A53 r0p4; 4x 1200.00 MHz"` style.
    pub description: String,
    /// Highest max scaling frequency seen across cores, kHz.
    pub max_khz: u32,
    pub cores: Vec<CoreRecord>,
    pub tables: InventoryTables,
    /// Per-token flag inventory; a token's weight is the number of cores
    /// carrying it.
    pub flag_inventory: WeightedStringTable,
}

impl ProcessorInventory {
    pub fn core_count(&self) -> usize {
        self.cores.len()
    }

    /// Number of cores carrying `flag`, 0 when absent.
    pub fn flag_weight(&self, flag: &str) -> u32 {
        self.flag_inventory.weight_of(flag)
    }
}

/// Scans `/proc/cpuinfo` plus per-core sysfs attributes into a
/// [`ProcessorInventory`].
pub struct CpuScanner<F: FileSystem + Clone> {
    fs: F,
    proc_root: String,
    sys: SysCpuReader<F>,
}

impl<F: FileSystem + Clone> CpuScanner<F> {
    pub fn new(fs: F, proc_root: impl Into<String>, sys_root: impl Into<String>) -> Self {
        let sys = SysCpuReader::new(fs.clone(), sys_root);
        Self {
            fs,
            proc_root: proc_root.into(),
            sys,
        }
    }

    /// Runs the full scan. The vocabulary grows with any flag tokens not
    /// already known; everything else about the scan is self-contained.
    pub fn scan(&self, vocab: &mut FlagVocabulary) -> Result<ProcessorInventory, CollectError> {
        let path = format!("{}/cpuinfo", self.proc_root);
        if !self.fs.exists(Path::new(&path)) {
            return Err(CollectError::Unavailable(path));
        }
        let cpuinfo = self.fs.read_to_string(Path::new(&path))?;

        let arch = Arch::detect(&cpuinfo);
        debug!(?arch, "scanning cpuinfo");
        let inventory = match arch {
            Arch::Arm => self.scan_arm(&cpuinfo, vocab),
            Arch::Riscv => self.scan_riscv(&cpuinfo, vocab),
        };
        debug!(cores = inventory.core_count(), "cpuinfo scan complete");
        Ok(inventory)
    }

    fn scan_arm(&self, cpuinfo: &str, vocab: &mut FlagVocabulary) -> ProcessorInventory {
        let mut tables = InventoryTables::default();
        let mut cores: Vec<ArmCore> = Vec::new();
        let mut reported_name = String::new();
        let mut hardware_name = String::new();

        for (key, value) in KvPairs::new(cpuinfo) {
            match key {
                "Processor" => {
                    reported_name = value.to_string();
                    continue;
                }
                "Hardware" => {
                    hardware_name = value.to_string();
                    continue;
                }
                "processor" => {
                    finalize_core(cores.last_mut(), &reported_name, &mut tables.model_name, |c| {
                        &mut c.model_name
                    });
                    let id = parse_core_id(value, cores.last().map(|c| c.id));
                    cores.push(ArmCore {
                        id,
                        ..ArmCore::default()
                    });
                    continue;
                }
                _ => {}
            }

            // No boundary key yet, but architecture keys showing up: this
            // cpuinfo variant has a single implicit core.
            if cores.is_empty() && matches!(key, "model name" | "Features" | "flags") {
                cores.push(ArmCore::default());
            }
            if let Some(core) = cores.last_mut() {
                match key {
                    "model name" => core.model_name = Some(tables.model_name.intern(value)),
                    "Features" | "flags" => core.flags = Some(tables.flags.intern(value)),
                    "CPU implementer" => {
                        core.implementer = Some(tables.implementer.intern(value))
                    }
                    "CPU architecture" => {
                        core.architecture = Some(tables.architecture.intern(value))
                    }
                    "CPU variant" => core.variant = Some(tables.variant.intern(value)),
                    "CPU part" => core.part = Some(tables.part.intern(value)),
                    "CPU revision" => core.revision = Some(tables.revision.intern(value)),
                    _ => {}
                }
            }
        }
        finalize_core(cores.last_mut(), &reported_name, &mut tables.model_name, |c| {
            &mut c.model_name
        });

        backfill(&mut cores, &mut tables.flags, |c| &mut c.flags);
        backfill(&mut cores, &mut tables.implementer, |c| &mut c.implementer);
        backfill(&mut cores, &mut tables.architecture, |c| &mut c.architecture);
        backfill(&mut cores, &mut tables.variant, |c| &mut c.variant);
        backfill(&mut cores, &mut tables.part, |c| &mut c.part);
        backfill(&mut cores, &mut tables.revision, |c| &mut c.revision);

        let mut max_khz = 0;
        for core in &mut cores {
            core.reg_midr_el1 = self.sys.core_id_reg(core.id, "midr_el1");
            core.reg_revidr_el1 = self.sys.core_id_reg(core.id, "revidr_el1");

            let decoded = arm::decoded_name(
                core.implementer.as_deref(),
                core.part.as_deref(),
                core.variant.as_deref(),
                core.revision.as_deref(),
                core.architecture.as_deref(),
                core.model_name.as_deref(),
            );
            core.decoded_name = Some(tables.decoded_name.intern(&decoded));

            core.clocks = self.sys.core_clocks(core.id);
            tables.khz_max.intern(&core.clocks.max_khz.to_string());
            max_khz = max_khz.max(core.clocks.max_khz);
        }

        let description = describe(&tables.decoded_name, &tables.khz_max);
        let mut flag_inventory = WeightedStringTable::new();
        collect_flags(&tables.flags, &mut flag_inventory, vocab);

        ProcessorInventory {
            arch: Arch::Arm,
            hardware_name,
            description,
            max_khz,
            cores: cores.into_iter().map(CoreRecord::Arm).collect(),
            tables,
            flag_inventory,
        }
    }

    fn scan_riscv(&self, cpuinfo: &str, vocab: &mut FlagVocabulary) -> ProcessorInventory {
        let mut tables = InventoryTables::default();
        let mut cores: Vec<RiscvCore> = Vec::new();
        let mut reported_name = String::from("RISC-V Processor");
        let mut hardware_name = String::new();

        for (key, value) in KvPairs::new(cpuinfo) {
            match key {
                "Processor" => {
                    reported_name = value.to_string();
                    continue;
                }
                "Hardware" => {
                    hardware_name = value.to_string();
                    continue;
                }
                "hart" => {
                    finalize_core(cores.last_mut(), &reported_name, &mut tables.model_name, |c| {
                        &mut c.model_name
                    });
                    let id = parse_core_id(value, cores.last().map(|c| c.id));
                    cores.push(RiscvCore {
                        id,
                        ..RiscvCore::default()
                    });
                    continue;
                }
                _ => {}
            }

            if cores.is_empty() && matches!(key, "model name" | "isa") {
                cores.push(RiscvCore::default());
            }
            if let Some(core) = cores.last_mut() {
                match key {
                    "model name" => core.model_name = Some(tables.model_name.intern(value)),
                    "isa" => core.isa = Some(tables.isa.intern(value)),
                    _ => {}
                }
            }
        }
        finalize_core(cores.last_mut(), &reported_name, &mut tables.model_name, |c| {
            &mut c.model_name
        });

        backfill(&mut cores, &mut tables.isa, |c| &mut c.isa);

        let mut max_khz = 0;
        for core in &mut cores {
            if let Some(isa) = core.isa.as_deref() {
                let expanded = riscv::isa_to_flags(isa);
                core.flags = Some(tables.flags.intern(&expanded));
            }
            core.clocks = self.sys.core_clocks(core.id);
            tables.khz_max.intern(&core.clocks.max_khz.to_string());
            max_khz = max_khz.max(core.clocks.max_khz);
        }

        let description = describe(&tables.model_name, &tables.khz_max);
        let mut flag_inventory = WeightedStringTable::new();
        collect_flags(&tables.flags, &mut flag_inventory, vocab);

        ProcessorInventory {
            arch: Arch::Riscv,
            hardware_name,
            description,
            max_khz,
            cores: cores.into_iter().map(CoreRecord::Riscv).collect(),
            tables,
            flag_inventory,
        }
    }
}

/// On closing a core record, gives it the most recently seen reported
/// name when no `model name` key was scanned for it.
fn finalize_core<C>(
    core: Option<&mut C>,
    reported_name: &str,
    model_table: &mut WeightedStringTable,
    slot: impl Fn(&mut C) -> &mut Option<Arc<str>>,
) {
    if let Some(core) = core {
        let slot = slot(core);
        if slot.is_none() {
            *slot = Some(model_table.intern(reported_name));
        }
    }
}

/// Boundary key values are core ids; a value that fails to parse falls
/// back to the previous id + 1 rather than aborting the scan.
fn parse_core_id(value: &str, prev: Option<i32>) -> i32 {
    value.trim().parse().unwrap_or_else(|_| {
        let fallback = prev.map(|p| p + 1).unwrap_or(0);
        debug!(value, fallback, "unparsable core id");
        fallback
    })
}

/// Backward pass copying a shared attribute onto cores that omitted it.
///
/// Walks from the highest index down, tracking the nearest core at or
/// above the current index that has the attribute (the donor). Absent
/// slots re-intern the donor's value, which bumps the entry's weight by
/// the ordinary insertion weight and returns the same allocation.
fn backfill<C>(
    cores: &mut [C],
    table: &mut WeightedStringTable,
    slot: impl Fn(&mut C) -> &mut Option<Arc<str>>,
) {
    if cores.is_empty() {
        return;
    }
    let mut donor = cores.len() - 1;
    for i in (0..cores.len()).rev() {
        if slot(&mut cores[i]).is_some() {
            donor = i;
        } else if let Some(value) = slot(&mut cores[donor]).clone() {
            let value = table.intern(&value);
            *slot(&mut cores[i]) = Some(value);
        }
    }
}

/// Renders the `"Nx name + Mx name; Nx FFF.FF MHz"` processor summary from
/// the weighted name and max-frequency tables.
fn describe(names: &WeightedStringTable, khz_max: &WeightedStringTable) -> String {
    let mut out = String::new();
    for (i, (name, weight)) in names.iter().enumerate() {
        if i > 0 {
            out.push_str(" + ");
        }
        out.push_str(&format!("{}x {}", weight, name));
    }
    out.push_str("; ");
    for (i, (khz, weight)) in khz_max.iter().enumerate() {
        if i > 0 {
            out.push_str(" + ");
        }
        let mhz = khz.parse::<f32>().unwrap_or(0.0) / 1000.0;
        out.push_str(&format!("{}x {:.2} MHz", weight, mhz));
    }
    out
}

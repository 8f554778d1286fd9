//! sbcinfo - Hardware identification tool for single-board computers.
//!
//! Reads `/proc/cpuinfo`, per-core sysfs attributes and the device tree,
//! and prints a decoded processor and board report.

use clap::Parser;
use tracing::{debug, error, Level};
use tracing_subscriber::EnvFilter;

use sbcinfo::collector::sysfs::SysCpuReader;
use sbcinfo::collector::{BoardScanner, CpuScanner, RealFs};
use sbcinfo::decode::{arm, riscv};
use sbcinfo::flags::FlagVocabulary;
use sbcinfo::report::{BoardReport, ProcessorReport};
use sbcinfo::view;

/// Hardware identification tool for single-board computers.
#[derive(Parser)]
#[command(name = "sbcinfo", about = "Single-board computer hardware identification", version)]
struct Args {
    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Path to /sys filesystem (for testing/mocking).
    #[arg(long, default_value = "/sys")]
    sys_path: String,

    /// Show every field, including per-core detail.
    #[arg(short, long)]
    all: bool,

    /// Emit the report as JSON instead of aligned text.
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(args: &Args) {
    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("sbcinfo={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> std::process::ExitCode {
    let args = Args::parse();
    init_logging(&args);

    let fs = RealFs;
    let mut vocab = FlagVocabulary::with_known(arm::KNOWN_FLAGS);
    vocab.add_if_missing_all(riscv::KNOWN_FLAGS);

    let scanner = CpuScanner::new(fs, &*args.proc_path, &*args.sys_path);
    let inventory = match scanner.scan(&mut vocab) {
        Ok(inv) => inv,
        Err(e) => {
            error!("cpu scan failed: {}", e);
            return std::process::ExitCode::FAILURE;
        }
    };
    debug!(cores = inventory.core_count(), "inventory ready");
    let cpu_report = ProcessorReport::new(inventory, SysCpuReader::new(fs, &*args.sys_path));

    let board_scanner = BoardScanner::new(fs, &*args.proc_path);
    let board_report = if board_scanner.is_raspberry_pi() {
        Some(BoardReport::new(
            board_scanner.scan(),
            SysCpuReader::new(fs, &*args.sys_path),
        ))
    } else {
        None
    };

    if args.json {
        let mut doc = serde_json::Map::new();
        doc.insert(
            "cpu".to_string(),
            view::render_json(cpu_report.fields(), &cpu_report, args.all),
        );
        if let Some(board) = &board_report {
            doc.insert(
                "board".to_string(),
                view::render_json(board.fields(), board, args.all),
            );
        }
        match serde_json::to_string_pretty(&doc) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                error!("serialization failed: {}", e);
                return std::process::ExitCode::FAILURE;
            }
        }
    } else {
        print!(
            "{}",
            view::render_text(cpu_report.fields(), &cpu_report, args.all)
        );
        if let Some(board) = &board_report {
            println!();
            print!("{}", view::render_text(board.fields(), board, args.all));
        }
    }

    std::process::ExitCode::SUCCESS
}

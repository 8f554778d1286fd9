//! Static knowledge tables behind the code -> name lookup contract.
//!
//! Lookups are pure: a hit returns the canonical name, a miss is rendered
//! by the caller with the raw code kept verbatim so the output stays
//! diagnostic.

pub mod arm;
pub mod boards;
pub mod riscv;

/// Renders a raw code with its looked-up name, `"[0xd03] Cortex-A53"`
/// style. A table miss keeps the code and marks the name unknown.
pub fn annotated(code: &str, name: Option<&str>) -> String {
    format!("[{}] {}", code, name.unwrap_or("(Unknown)"))
}

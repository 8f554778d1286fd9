//! RISC-V ISA string expansion and extension name table.

/// Single-letter extensions and the named multi-letter ones commonly seen
/// in `isa:` lines.
const EXTENSIONS: &[(&str, &str)] = &[
    ("rv32", "RV32 base"),
    ("rv64", "RV64 base"),
    ("rv128", "RV128 base"),
    ("i", "base integer"),
    ("e", "reduced base integer"),
    ("m", "integer multiply/divide"),
    ("a", "atomic operations"),
    ("f", "single-precision float"),
    ("d", "double-precision float"),
    ("q", "quad-precision float"),
    ("g", "general (IMAFD)"),
    ("c", "compressed instructions"),
    ("b", "bit manipulation"),
    ("j", "dynamic translation"),
    ("l", "decimal float"),
    ("n", "user-level interrupts"),
    ("p", "packed SIMD"),
    ("t", "transactional memory"),
    ("v", "vector operations"),
    ("h", "hypervisor"),
    ("s", "supervisor mode"),
    ("u", "user mode"),
    ("zicsr", "control/status registers"),
    ("zifencei", "instruction-fetch fence"),
];

/// Baseline vocabulary of known extension tokens.
pub const KNOWN_FLAGS: &[&str] = &[
    "rv32", "rv64", "rv128", "i", "e", "m", "a", "f", "d", "q", "g", "c", "b", "j", "l", "n", "p",
    "t", "v", "h", "s", "u", "zicsr", "zifencei",
];

/// Extension token -> description.
pub fn extension(token: &str) -> Option<&'static str> {
    EXTENSIONS
        .iter()
        .find(|(k, _)| *k == token)
        .map(|(_, n)| *n)
}

/// Expands an ISA identifier into a space-separated flag list,
/// `"rv64imafdc"` -> `"rv64 i m a f d c"`.
///
/// The width prefix becomes the first token. `g` expands to `i m a f d`.
/// Underscore-separated suffixes (`_zicsr`, `_sv48`) are kept as whole
/// tokens. Unrecognized letters still become tokens; the flag builder
/// grows the vocabulary from them.
pub fn isa_to_flags(isa: &str) -> String {
    let isa = isa.trim().to_ascii_lowercase();
    let mut tokens: Vec<String> = Vec::new();

    let mut rest = isa.as_str();
    for prefix in ["rv128", "rv64", "rv32"] {
        if let Some(r) = rest.strip_prefix(prefix) {
            tokens.push(prefix.to_string());
            rest = r;
            break;
        }
    }

    let mut parts = rest.split('_');
    if let Some(letters) = parts.next() {
        for c in letters.chars() {
            if c == 'g' {
                for x in ["i", "m", "a", "f", "d"] {
                    push_unique(&mut tokens, x);
                }
            } else if c.is_ascii_alphanumeric() {
                push_unique(&mut tokens, &c.to_string());
            }
        }
    }
    for ext in parts {
        if !ext.is_empty() {
            push_unique(&mut tokens, ext);
        }
    }

    tokens.join(" ")
}

/// Renders an expanded flag list with extension meanings,
/// `"rv64 i"` -> `"rv64 (RV64 base) i (base integer)"`. Tokens without a
/// table entry are kept bare.
pub fn describe_flags(flags: &str) -> String {
    flags
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(|t| match extension(t) {
            Some(name) => format!("{} ({})", t, name),
            None => t.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_unique(tokens: &mut Vec<String>, token: &str) {
    if !tokens.iter().any(|t| t == token) {
        tokens.push(token.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isa_to_flags_basic() {
        assert_eq!(isa_to_flags("rv64imafdc"), "rv64 i m a f d c");
        assert_eq!(isa_to_flags("rv32ima"), "rv32 i m a");
    }

    #[test]
    fn test_isa_to_flags_g_expands() {
        assert_eq!(isa_to_flags("rv64gc"), "rv64 i m a f d c");
    }

    #[test]
    fn test_isa_to_flags_underscore_extensions() {
        assert_eq!(
            isa_to_flags("rv64imac_zicsr_zifencei"),
            "rv64 i m a c zicsr zifencei"
        );
    }

    #[test]
    fn test_isa_to_flags_tolerates_odd_input() {
        assert_eq!(isa_to_flags(""), "");
        assert_eq!(isa_to_flags("RV64IMAFDC"), "rv64 i m a f d c");
        // No width prefix: letters still expand.
        assert_eq!(isa_to_flags("imac"), "i m a c");
    }

    #[test]
    fn test_describe_flags_annotates_known_extensions() {
        assert_eq!(
            describe_flags("rv64 i zzz"),
            "rv64 (RV64 base) i (base integer) zzz"
        );
        assert_eq!(describe_flags(""), "");
    }

    #[test]
    fn test_extension_lookup() {
        assert_eq!(extension("m"), Some("integer multiply/divide"));
        assert_eq!(extension("zicsr"), Some("control/status registers"));
        assert_eq!(extension("zzz"), None);
    }
}

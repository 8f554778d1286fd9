//! Raspberry Pi board revision history table and the revision match rule.
//!
//! Table data from http://elinux.org/RPi_HardwareHistory. Row 0 is the
//! explicit unknown sentinel; a failed lookup resolves there.

pub const UNKNOWN: &str = "(Unknown)";

/// One historical board revision.
#[derive(Debug, Clone, Copy)]
pub struct BoardInfo {
    pub code: &'static str,
    pub intro: &'static str,
    pub model: &'static str,
    pub pcb: &'static str,
    pub memory: &'static str,
    pub manufacturer: &'static str,
    pub soc: Option<&'static str>,
}

const fn row(
    code: &'static str,
    intro: &'static str,
    model: &'static str,
    pcb: &'static str,
    memory: &'static str,
    manufacturer: &'static str,
    soc: Option<&'static str>,
) -> BoardInfo {
    BoardInfo {
        code,
        intro,
        model,
        pcb,
        memory,
        manufacturer,
        soc,
    }
}

#[rustfmt::skip]
const BOARDS: &[BoardInfo] = &[
    row(UNKNOWN,  UNKNOWN,    UNKNOWN,               UNKNOWN, UNKNOWN,       UNKNOWN,                         None),
    row("Beta",   "Q1 2012",  "B (Beta)",            UNKNOWN, "256MB",       "(Beta board)",                  None),
    row("0002",   "Q1 2012",  "B",                   "1.0",   "256MB",       UNKNOWN,                         Some("BCM2835")),
    row("0003",   "Q3 2012",  "B (ECN0001)",         "1.0",   "256MB",       "(Fuses mod and D14 removed)",   None),
    row("0004",   "Q3 2012",  "B",                   "2.0",   "256MB",       "Sony",                          None),
    row("0005",   "Q4 2012",  "B",                   "2.0",   "256MB",       "Qisda",                         None),
    row("0006",   "Q4 2012",  "B",                   "2.0",   "256MB",       "Egoman",                        None),
    row("0007",   "Q1 2013",  "A",                   "2.0",   "256MB",       "Egoman",                        None),
    row("0008",   "Q1 2013",  "A",                   "2.0",   "256MB",       "Sony",                          None),
    row("0009",   "Q1 2013",  "A",                   "2.0",   "256MB",       "Qisda",                         None),
    row("000d",   "Q4 2012",  "B",                   "2.0",   "512MB",       "Egoman",                        None),
    row("000e",   "Q4 2012",  "B",                   "2.0",   "512MB",       "Sony",                          None),
    row("000f",   "Q4 2012",  "B",                   "2.0",   "512MB",       "Qisda",                         None),
    row("0010",   "Q3 2014",  "B+",                  "1.0",   "512MB",       "Sony",                          None),
    row("0011",   "Q2 2014",  "Compute Module 1",    "1.0",   "512MB",       "Sony",                          None),
    row("0012",   "Q4 2014",  "A+",                  "1.1",   "256MB",       "Sony",                          None),
    row("0013",   "Q1 2015",  "B+",                  "1.2",   "512MB",       UNKNOWN,                         None),
    row("0014",   "Q2 2014",  "Compute Module 1",    "1.0",   "512MB",       "Embest",                        None),
    row("0015",   UNKNOWN,    "A+",                  "1.1",   "256MB/512MB", "Embest",                        None),
    row("a01040", UNKNOWN,    "2 Model B",           "1.0",   "1GB",         "Sony",                          Some("BCM2836")),
    row("a01041", "Q1 2015",  "2 Model B",           "1.1",   "1GB",         "Sony",                          Some("BCM2836")),
    row("a21041", "Q1 2015",  "2 Model B",           "1.1",   "1GB",         "Embest",                        Some("BCM2836")),
    row("a22042", "Q3 2016",  "2 Model B",           "1.2",   "1GB",         "Embest",                        Some("BCM2837")),
    row("900021", "Q3 2016",  "A+",                  "1.1",   "512MB",       "Sony",                          None),
    row("900032", "Q2 2016?", "B+",                  "1.2",   "512MB",       "Sony",                          None),
    row("900092", "Q4 2015",  "Zero",                "1.2",   "512MB",       "Sony",                          None),
    row("900093", "Q2 2016",  "Zero",                "1.3",   "512MB",       "Sony",                          None),
    row("920093", "Q4 2016?", "Zero",                "1.3",   "512MB",       "Embest",                        None),
    row("9000c1", "Q1 2017",  "Zero W",              "1.1",   "512MB",       "Sony",                          None),
    row("a02082", "Q1 2016",  "3 Model B",           "1.2",   "1GB",         "Sony",                          Some("BCM2837")),
    row("a020a0", "Q1 2017",  "Compute Module 3 or CM3 Lite", "1.0", "1GB",  "Sony",                          None),
    row("a22082", "Q1 2016",  "3 Model B",           "1.2",   "1GB",         "Embest",                        Some("BCM2837")),
    row("a32082", "Q4 2016",  "3 Model B",           "1.2",   "1GB",         "Sony Japan",                    None),
];

/// Returns the table row at `index`; index 0 is the unknown sentinel.
pub fn board(index: usize) -> &'static BoardInfo {
    &BOARDS[index.min(BOARDS.len() - 1)]
}

/// Number of chars of overvolt prefix to skip.
///
/// Sources disagree whether the warranty bit shows up as a leading "1000"
/// or a single leading "1"; this keeps the single-digit rule. Do not
/// change without confirming intended hardware semantics.
pub fn overvolt_prefix_len(code: &str) -> usize {
    if code.starts_with('1') { 1 } else { 0 }
}

/// Compares two revision codes: numerically when both parse as non-zero
/// hex, exact string equality otherwise (legacy non-hex codes).
fn code_match(a: &str, b: &str) -> bool {
    let ca = parse_hex_prefix(a);
    let cb = parse_hex_prefix(b);
    if ca != 0 && cb != 0 {
        ca == cb
    } else {
        a == b
    }
}

/// C `strtol(_, _, 16)` semantics: optional `0x`, then as many hex digits
/// as parse; no digits means 0.
fn parse_hex_prefix(s: &str) -> i64 {
    let t = s.trim_start();
    let t = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")).unwrap_or(t);
    let digits = &t[..t.len() - t.trim_start_matches(|c: char| c.is_ascii_hexdigit()).len()];
    i64::from_str_radix(digits, 16).unwrap_or(0)
}

/// Finds the table index for a revision code, first match wins.
///
/// The overvolt prefix is stripped before matching. No match (or a missing
/// code) resolves to the sentinel row at index 0.
pub fn find_board(revision_code: &str) -> usize {
    let stripped = &revision_code[overvolt_prefix_len(revision_code)..];
    BOARDS
        .iter()
        .position(|b| code_match(stripped, b.code))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_revision_codes() {
        let b = board(find_board("0002"));
        assert_eq!(b.model, "B");
        assert_eq!(b.pcb, "1.0");
        assert_eq!(b.memory, "256MB");

        let b = board(find_board("a02082"));
        assert_eq!(b.model, "3 Model B");
        assert_eq!(b.soc, Some("BCM2837"));
    }

    #[test]
    fn test_unknown_code_hits_sentinel() {
        assert_eq!(find_board("ffffff"), 0);
        assert_eq!(board(0).model, UNKNOWN);
    }

    #[test]
    fn test_overvolt_prefix_stripped_before_match() {
        // "1000003" strips one digit, and "000003" matches "0003"
        // numerically.
        let i = find_board("1000003");
        assert_eq!(board(i).model, "B (ECN0001)");
        assert_eq!(overvolt_prefix_len("1000003"), 1);
        assert_eq!(overvolt_prefix_len("0003"), 0);
    }

    #[test]
    fn test_leading_zeros_compare_numerically() {
        assert_eq!(find_board("0002"), find_board("2"));
    }

    #[test]
    fn test_legacy_non_hex_code_is_string_matched() {
        let i = find_board("Beta");
        assert_eq!(board(i).model, "B (Beta)");
    }
}

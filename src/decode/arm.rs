//! ARM implementer/part/architecture tables and decoded-name synthesis.
//!
//! Codes arrive as the raw strings `/proc/cpuinfo` prints (`0x41`, `0xd03`,
//! decimal revision numbers) and are compared numerically, so `0x41` and
//! `65` refer to the same implementer.

/// Known implementer codes (MIDR bits [31:24]).
const IMPLEMENTERS: &[(u32, &str)] = &[
    (0x41, "ARM"),
    (0x42, "Broadcom"),
    (0x43, "Cavium"),
    (0x44, "DEC"),
    (0x4e, "NVIDIA"),
    (0x50, "APM"),
    (0x51, "Qualcomm"),
    (0x53, "Samsung"),
    (0x56, "Marvell"),
    (0x61, "Apple"),
    (0x66, "Faraday"),
    (0x69, "Intel"),
];

/// Known part numbers, per implementer.
const PARTS: &[(u32, u32, &str)] = &[
    (0x41, 0x920, "ARM920"),
    (0x41, 0x926, "ARM926"),
    (0x41, 0xb02, "ARM11 MPCore"),
    (0x41, 0xb36, "ARM1136"),
    (0x41, 0xb56, "ARM1156"),
    (0x41, 0xb76, "ARM1176"),
    (0x41, 0xc05, "Cortex-A5"),
    (0x41, 0xc07, "Cortex-A7"),
    (0x41, 0xc08, "Cortex-A8"),
    (0x41, 0xc09, "Cortex-A9"),
    (0x41, 0xc0d, "Cortex-A12"),
    (0x41, 0xc0e, "Cortex-A17"),
    (0x41, 0xc0f, "Cortex-A15"),
    (0x41, 0xd01, "Cortex-A32"),
    (0x41, 0xd03, "Cortex-A53"),
    (0x41, 0xd04, "Cortex-A35"),
    (0x41, 0xd05, "Cortex-A55"),
    (0x41, 0xd07, "Cortex-A57"),
    (0x41, 0xd08, "Cortex-A72"),
    (0x41, 0xd09, "Cortex-A73"),
    (0x41, 0xd0a, "Cortex-A75"),
    (0x41, 0xd0b, "Cortex-A76"),
    (0x42, 0x00f, "Brahma B15"),
    (0x42, 0x100, "Brahma B53"),
    (0x51, 0x00f, "Scorpion"),
    (0x51, 0x02d, "Scorpion"),
    (0x51, 0x04d, "Krait"),
    (0x51, 0x06f, "Krait"),
    (0x51, 0x201, "Kryo"),
    (0x51, 0x205, "Kryo"),
    (0x51, 0x800, "Kryo (Falkor)"),
];

/// `CPU architecture:` values as the kernel prints them.
const ARCHITECTURES: &[(&str, &str)] = &[
    ("4", "ARMv4"),
    ("4T", "ARMv4T"),
    ("5", "ARMv5"),
    ("5T", "ARMv5T"),
    ("5TE", "ARMv5TE"),
    ("5TEJ", "ARMv5TEJ"),
    ("6", "ARMv6"),
    ("6TEJ", "ARMv6TEJ"),
    ("7", "ARMv7"),
    ("8", "ARMv8 (AArch64)"),
    ("AArch64", "ARMv8 (AArch64)"),
];

/// Baseline vocabulary of known feature flags (32-bit hwcaps plus the
/// aarch64 set). Flags seen in cpuinfo but not listed here are appended
/// to the run's vocabulary by the flag builder.
pub const KNOWN_FLAGS: &[&str] = &[
    "swp", "half", "thumb", "26bit", "fastmult", "fpa", "vfp", "edsp", "java", "iwmmxt", "crunch",
    "thumbee", "neon", "vfpv3", "vfpv3d16", "tls", "vfpv4", "idiva", "idivt", "vfpd32", "lpae",
    "evtstrm", "fp", "asimd", "aes", "pmull", "sha1", "sha2", "crc32", "atomics", "fphp",
    "asimdhp", "cpuid", "asimdrdm", "jscvt", "fcma", "lrcpc",
];

/// Parses a raw code with C `strtol(_, _, 0)` radix selection.
fn parse_code(code: &str) -> Option<u32> {
    let t = code.trim();
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        t.parse().ok()
    }
}

/// Implementer code -> vendor name.
pub fn implementer(code: &str) -> Option<&'static str> {
    let c = parse_code(code)?;
    IMPLEMENTERS.iter().find(|(k, _)| *k == c).map(|(_, n)| *n)
}

/// (implementer, part) -> design name.
pub fn part(implementer_code: &str, part_code: &str) -> Option<&'static str> {
    let imp = parse_code(implementer_code)?;
    let p = parse_code(part_code)?;
    PARTS
        .iter()
        .find(|(i, k, _)| *i == imp && *k == p)
        .map(|(_, _, n)| *n)
}

/// Architecture code -> family name.
pub fn architecture(code: &str) -> Option<&'static str> {
    ARCHITECTURES
        .iter()
        .find(|(k, _)| *k == code.trim())
        .map(|(_, n)| *n)
}

/// Builds the canonical decoded name for a core, e.g.
/// `"ARM Cortex-A53 r0p4"`.
///
/// A lookup miss keeps the raw code in the output instead of dropping it.
/// When the vendor codes are missing entirely, the kernel-reported model
/// name is passed through.
pub fn decoded_name(
    implementer_code: Option<&str>,
    part_code: Option<&str>,
    variant_code: Option<&str>,
    revision_code: Option<&str>,
    _architecture_code: Option<&str>,
    model_name: Option<&str>,
) -> String {
    match (implementer_code, part_code) {
        (Some(imp), Some(prt)) => {
            let imp_name = implementer(imp)
                .map(str::to_string)
                .unwrap_or_else(|| format!("unknown [{}]", imp));
            let part_name = part(imp, prt)
                .map(str::to_string)
                .unwrap_or_else(|| format!("unknown [{}]", prt));
            let r = variant_code.and_then(parse_code).unwrap_or(0);
            let p = revision_code.and_then(parse_code).unwrap_or(0);
            format!("{} {} r{}p{}", imp_name, part_name, r, p)
        }
        _ => model_name
            .filter(|m| !m.is_empty())
            .unwrap_or("unknown")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implementer_lookup() {
        assert_eq!(implementer("0x41"), Some("ARM"));
        assert_eq!(implementer("65"), Some("ARM"));
        assert_eq!(implementer("0x99"), None);
        assert_eq!(implementer("garbage"), None);
    }

    #[test]
    fn test_part_lookup_is_scoped_to_implementer() {
        assert_eq!(part("0x41", "0xd03"), Some("Cortex-A53"));
        assert_eq!(part("0x41", "0xb76"), Some("ARM1176"));
        // Qualcomm's 0x04d is not an ARM part.
        assert_eq!(part("0x41", "0x04d"), None);
        assert_eq!(part("0x51", "0x04d"), Some("Krait"));
    }

    #[test]
    fn test_decoded_name_full() {
        let name = decoded_name(
            Some("0x41"),
            Some("0xd03"),
            Some("0x0"),
            Some("4"),
            Some("7"),
            Some("ARMv7 Processor rev 4 (v7l)"),
        );
        assert_eq!(name, "ARM Cortex-A53 r0p4");
    }

    #[test]
    fn test_decoded_name_keeps_unknown_codes() {
        let name = decoded_name(Some("0x41"), Some("0xfff"), None, None, None, None);
        assert_eq!(name, "ARM unknown [0xfff] r0p0");

        let name = decoded_name(Some("0x99"), Some("0xd03"), None, None, None, None);
        assert!(name.contains("unknown [0x99]"));
    }

    #[test]
    fn test_decoded_name_falls_back_to_model_name() {
        let name = decoded_name(None, None, None, None, None, Some("Some CPU"));
        assert_eq!(name, "Some CPU");
        assert_eq!(decoded_name(None, None, None, None, None, None), "unknown");
        assert_eq!(decoded_name(None, None, None, None, None, Some("")), "unknown");
    }

    #[test]
    fn test_architecture_lookup() {
        assert_eq!(architecture("7"), Some("ARMv7"));
        assert_eq!(architecture("8"), Some("ARMv8 (AArch64)"));
        assert_eq!(architecture("9000"), None);
    }
}

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{CleanupError, Result};

/// Binary units, indexed by their power of 1024.
const UNITS: [(&str, &str); 5] = [
    ("", "B"),
    ("K", "KiB"),
    ("M", "MiB"),
    ("G", "GiB"),
    ("T", "TiB"),
];

/// Parse a free-up amount like "15G", "500m", "1.5T" or "1024" into bytes.
///
/// The unit letter may be followed by `B` or `iB` and is case-insensitive; a
/// bare number is bytes. Whole numbers are scaled exactly, fractions through
/// `f64`.
pub(crate) fn parse_byte_count(spec: &str) -> Result<u64> {
    static AMOUNT_RE: OnceLock<Regex> = OnceLock::new();

    let re = AMOUNT_RE.get_or_init(|| {
        Regex::new(r"(?i)^(\d+(?:\.\d*)?|\.\d+)\s*([KMGT]?)(?:I?B)?$")
            .expect("byte count regex should compile")
    });

    let spec = spec.trim();
    let invalid = |reason: &str| CleanupError::InvalidSize(spec.to_string(), reason.to_string());

    let captures = re
        .captures(spec)
        .ok_or_else(|| invalid("expected a number with an optional K, M, G or T unit"))?;
    let exponent = UNITS
        .iter()
        .position(|(letter, _)| letter.eq_ignore_ascii_case(&captures[2]))
        .unwrap_or(0);
    let scale = 1u64 << (10 * exponent);

    let number = &captures[1];
    let bytes = match number.parse::<u64>() {
        Ok(whole) => whole.checked_mul(scale),
        Err(_) => {
            let value: f64 = number.parse().map_err(|_| invalid("not a number"))?;
            let bytes = value * scale as f64;
            (bytes <= u64::MAX as f64).then_some(bytes as u64)
        }
    };

    bytes.ok_or_else(|| invalid("amount does not fit in 64 bits"))
}

/// Render a byte count with the largest unit that keeps it at or above one.
pub(crate) fn format_bytes(bytes: u64) -> String {
    let exponent = (1..UNITS.len())
        .take_while(|&exponent| bytes >= 1u64 << (10 * exponent))
        .last()
        .unwrap_or(0);

    if exponent == 0 {
        format!("{bytes} B")
    } else {
        let scaled = bytes as f64 / (1u64 << (10 * exponent)) as f64;
        format!("{scaled:.1} {}", UNITS[exponent].1)
    }
}

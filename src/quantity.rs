//! Parses Kubernetes resource `Quantity` strings into plain integers:
//! CPU into milli-units, memory into bytes.
//!
//! Grounded on the `parse_k8s_quantity`/`ScaledQuantity` approach used to
//! decode metrics-server quantities in the reference corpus. Like that
//! source, this only needs to handle the non-negative integral magnitudes
//! that node allocatable lists and pod resource requests actually contain
//! — no scientific notation, no fractional coefficients.

use crate::errors::Error;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

const DEC_SUFFIXES: &[(&str, i32)] = &[
    ("n", -9),
    ("u", -6),
    ("m", -3),
    ("", 0),
    ("k", 3),
    ("M", 6),
    ("G", 9),
    ("T", 12),
    ("P", 15),
    ("E", 18),
];

const BIN_SUFFIXES: &[(&str, i32)] = &[
    ("Ki", 10),
    ("Mi", 20),
    ("Gi", 30),
    ("Ti", 40),
    ("Pi", 50),
    ("Ei", 60),
];

struct Scaled {
    integral: u64,
    exponent: i32,
    base10: bool,
}

impl Scaled {
    fn to_scale(&self, target_exponent: i32, target_base10: bool) -> Option<i64> {
        if self.base10 != target_base10 {
            return None;
        }
        let mut result = self.integral as i64;
        let diff = self.exponent - target_exponent;
        let base: i64 = if self.base10 { 10 } else { 2 };
        if diff >= 0 {
            for _ in 0..diff {
                result = result.checked_mul(base)?;
            }
        } else {
            for _ in diff..0 {
                result /= base;
            }
        }
        Some(result)
    }
}

fn parse_scaled(raw: &str) -> Result<Scaled, Error> {
    let bad = |msg: &str| Error::Quantity(raw.to_string(), msg.to_string());

    let s = match raw.strip_prefix('+') {
        Some(rest) => rest,
        None => raw,
    };
    if s.starts_with('-') {
        return Err(bad("negative quantities are not supported"));
    }

    let split_at = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (num, suffix) = s.split_at(split_at);
    if num.is_empty() {
        return Err(bad("missing numeric part"));
    }
    let integral: u64 = num.parse().map_err(|_| bad("non-integral magnitude"))?;

    if let Some((_, exponent)) = BIN_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Ok(Scaled {
            integral,
            exponent: *exponent,
            base10: false,
        });
    }
    if let Some((_, exponent)) = DEC_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Ok(Scaled {
            integral,
            exponent: *exponent,
            base10: true,
        });
    }
    Err(bad("unrecognized suffix"))
}

/// Parses a CPU `Quantity` (e.g. `"250m"`, `"2"`) into milli-units.
pub fn parse_cpu_millis(q: &Quantity) -> Result<i64, Error> {
    let scaled = parse_scaled(&q.0)?;
    scaled
        .to_scale(-3, true)
        .ok_or_else(|| Error::Quantity(q.0.clone(), "cannot express CPU in milli-units".into()))
}

/// Parses a memory `Quantity` (e.g. `"128Mi"`, `"128M"`, `"512000000"`)
/// into bytes.
///
/// Memory quantities are conventionally expressed in binary (`Ki`/`Mi`/…)
/// suffixes but decimal SI suffixes (`k`/`M`/`G`/…) and a bare integer
/// byte count are also valid.
pub fn parse_memory_bytes(q: &Quantity) -> Result<i64, Error> {
    let scaled = parse_scaled(&q.0)?;
    scaled
        .to_scale(0, scaled.base10)
        .ok_or_else(|| Error::Quantity(q.0.clone(), "cannot express memory in bytes".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_cpu() {
        assert_eq!(parse_cpu_millis(&Quantity("2".into())).unwrap(), 2000);
    }

    #[test]
    fn parses_milli_cpu() {
        assert_eq!(parse_cpu_millis(&Quantity("250m".into())).unwrap(), 250);
    }

    #[test]
    fn parses_binary_memory() {
        assert_eq!(
            parse_memory_bytes(&Quantity("128Mi".into())).unwrap(),
            128 * 1024 * 1024
        );
    }

    #[test]
    fn parses_decimal_suffixed_memory() {
        assert_eq!(parse_memory_bytes(&Quantity("128M".into())).unwrap(), 128_000_000);
    }

    #[test]
    fn parses_bare_byte_memory() {
        assert_eq!(
            parse_memory_bytes(&Quantity("512000000".into())).unwrap(),
            512_000_000
        );
    }

    #[test]
    fn rejects_negative_quantities() {
        assert!(parse_cpu_millis(&Quantity("-1".into())).is_err());
    }

    #[test]
    fn rejects_unknown_suffix() {
        assert!(parse_cpu_millis(&Quantity("5Q".into())).is_err());
    }
}

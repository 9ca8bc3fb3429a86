//! Canonical JSON encoding used as the block hash preimage.
//!
//! The output is byte-compatible with a sorted-key, ASCII-only JSON dump:
//! keys are sorted at every level, items are separated by `", "`, keys from
//! values by `": "`, and every character outside printable ASCII is written
//! as a lowercase `\uXXXX` escape. Integers keep every digit they were
//! written with; floats use the shortest round-trip digits, switching to
//! exponent form (`1e-05`, `1.5e+300`) below 1e-4 and from 1e16 up.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Formatter producing the spaced separators and ASCII-only strings.
struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(float_repr(value).as_bytes())
    }

    /// Numbers held by a `Value` arrive here as their source text.
    fn write_number_str<W>(&mut self, writer: &mut W, value: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let is_float = value.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'));
        match value.parse::<f64>() {
            Ok(float) if is_float => writer.write_all(float_repr(float).as_bytes()),
            _ if value.trim_start_matches('-').bytes().all(|b| b == b'0') => writer.write_all(b"0"),
            _ => writer.write_all(value.as_bytes()),
        }
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Shortest round-trip spelling of `value`: positional between 1e-4 and
/// 1e16 (always with a fractional part), exponent form with a signed,
/// two-digit-minimum exponent outside that range.
fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let repr = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return repr.to_string();
    }

    // `{:e}` yields the shortest digits, e.g. `-1.5e300`, `1e-5`, `0e0`.
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };

    if !(-4..16).contains(&exponent) {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{mantissa}e{exp_sign}{:02}", exponent.unsigned_abs());
    }

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let body = if exponent < 0 {
        format!("0.{}{digits}", "0".repeat(exponent.unsigned_abs() as usize - 1))
    } else {
        let int_len = exponent as usize + 1;
        if digits.len() <= int_len {
            format!("{digits}{}.0", "0".repeat(int_len - digits.len()))
        } else {
            format!("{}.{}", &digits[..int_len], &digits[int_len..])
        }
    };
    format!("{sign}{body}")
}

/// Rebuild `value` with every object's keys in sorted order, independent of
/// how `serde_json::Map` orders its entries.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::with_capacity(entries.len());
            for (key, inner) in entries {
                sorted.insert(key.clone(), sort_keys(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Encode `value` in canonical form.
pub fn canonical_json(value: &Value) -> Vec<u8> {
    let mut out = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, CanonicalFormatter);
    sort_keys(value)
        .serialize(&mut ser)
        .expect("writing a JSON value into memory cannot fail");
    out
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_keys_and_spaces_separators() {
        let v = json!({"b": 1, "a": [1, 2], "c": {"z": null, "y": true}});
        let s = String::from_utf8(canonical_json(&v)).unwrap();
        assert_eq!(s, r#"{"a": [1, 2], "b": 1, "c": {"y": true, "z": null}}"#);
    }

    #[test]
    fn escapes_non_ascii_and_controls() {
        let v = json!({"details": "x\u{7f}/\n", "patient_id": "p\u{e9}", "emoji": "\u{1F600}"});
        let s = String::from_utf8(canonical_json(&v)).unwrap();
        assert_eq!(
            s,
            r#"{"details": "x\u007f/\n", "emoji": "\ud83d\ude00", "patient_id": "p\u00e9"}"#
        );
    }

    #[test]
    fn numbers_keep_their_canonical_spelling() {
        let v: Value = serde_json::from_str(
            "[0.00001, 1e16, 18446744073709551616, 1.5e300, -0.0, 100.0, 1E5, 0.0001, \
             123456789.125, 1e15, -12, -2.5e-7]",
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(canonical_json(&v)).unwrap(),
            "[1e-05, 1e+16, 18446744073709551616, 1.5e+300, -0.0, 100.0, 100000.0, 0.0001, \
             123456789.125, 1000000000000000.0, -12, -2.5e-07]"
        );
    }

    #[test]
    fn float_repr_edges() {
        assert_eq!(float_repr(0.0), "0.0");
        assert_eq!(float_repr(0.1), "0.1");
        assert_eq!(float_repr(1e-4), "0.0001");
        assert_eq!(float_repr(9.5e-5), "9.5e-05");
        assert_eq!(float_repr(1234567890123456.0), "1234567890123456.0");
        assert_eq!(float_repr(12345678901234567.0), "1.2345678901234568e+16");
        assert_eq!(float_repr(f64::INFINITY), "Infinity");
    }

    #[test]
    fn matches_reference_digest() {
        // sha256 of the sorted, spaced dump of a genesis-shaped record.
        let v = json!({
            "index": 0,
            "timestamp": 1700000000.5,
            "data": {"patient_id": "Genesis", "details": "First Block"},
            "proof": 100,
            "previous_hash": "0"
        });
        assert_eq!(
            String::from_utf8(canonical_json(&v)).unwrap(),
            r#"{"data": {"details": "First Block", "patient_id": "Genesis"}, "index": 0, "previous_hash": "0", "proof": 100, "timestamp": 1700000000.5}"#
        );
        assert_eq!(
            sha256_hex(&canonical_json(&v)),
            "cc49e97437cb590b69dcf2e5be33f273aa8cf25f40250fc0642acd5f3b36532d"
        );
    }
}

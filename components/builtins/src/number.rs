//! Number conversions: `float`, `number`, `int`, `abs` and `round`
//!
//! Strings containing a `.` parse as decimals; anything else parses as an
//! integer in the requested base, with base 0 picking it from the prefix
//! (`0x` hex, leading `0` octal). Parsing stops at the first character
//! that does not fit, so `"12abc"` is 12 and `"abc"` is 0.

use core_types::{Value, VmError, VmResult};
use interpreter::{Args, NativeFn, Vm};

/// Strings at least this long are rejected by the number conversions.
pub const MAX_NUMERIC_LEN: usize = 32;

pub(crate) const NATIVES: [(&str, NativeFn); 5] = [
    ("float", float),
    ("number", float),
    ("int", int),
    ("abs", abs),
    ("round", round),
];

/// Parses the longest decimal prefix of `s`; 0 when there is none.
pub fn parse_float(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    end = digits(end);
    if bytes.get(end) == Some(&b'.') {
        end = digits(end + 1);
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let after = digits(exp);
        if after > exp {
            end = after;
        }
    }
    s[..end].parse().unwrap_or(0.0)
}

/// Parses the longest integer prefix of `s` in `base`.
///
/// Base 0 detects hex and octal prefixes; base 16 accepts an optional
/// `0x`. Returns `None` for a base outside 0 and 2..=36.
pub fn parse_int(s: &str, base: u32) -> Option<f64> {
    if base == 1 || base > 36 {
        return None;
    }
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let hex_prefix = (rest.starts_with("0x") || rest.starts_with("0X"))
        && rest[2..].starts_with(|c: char| c.is_ascii_hexdigit());
    let (radix, digits) = match base {
        0 if hex_prefix => (16, &rest[2..]),
        0 if rest.starts_with('0') => (8, rest),
        0 => (10, rest),
        16 if hex_prefix => (16, &rest[2..]),
        b => (b, rest),
    };
    let n = digits
        .chars()
        .map_while(|c| c.to_digit(radix))
        .fold(0.0, |n, d| n * radix as f64 + d as f64);
    Some(if negative { -n } else { n })
}

/// Converts the first parameter to a number, reading an optional base.
fn to_number(vm: &Vm, name: &'static str, params: Value) -> VmResult<f64> {
    let mut args = Args::new(vm, name, params)?;
    let v = args.value()?;
    let base = match args.value_or(Value::None) {
        Value::Number(n) => n as u32,
        _ => 0,
    };
    match v {
        Value::Number(n) => Ok(n),
        Value::Str(s) if s.len() < MAX_NUMERIC_LEN => {
            let text = String::from_utf8_lossy(vm.heap().str_bytes(s)?).into_owned();
            if text.contains('.') {
                return Ok(parse_float(&text));
            }
            parse_int(&text, base).ok_or_else(|| {
                VmError::value_error(format!("{}() base must be 0 or 2..36, got {}", name, base))
            })
        }
        other => Err(VmError::type_error(format!(
            "{}() cannot convert {} to a number",
            name,
            other.tag()
        ))),
    }
}

fn float(vm: &mut Vm, params: Value) -> VmResult<Value> {
    to_number(vm, "float", params).map(Value::Number)
}

fn int(vm: &mut Vm, params: Value) -> VmResult<Value> {
    to_number(vm, "int", params).map(|n| Value::Number(n.trunc()))
}

fn abs(vm: &mut Vm, params: Value) -> VmResult<Value> {
    to_number(vm, "abs", params).map(|n| Value::Number(n.abs()))
}

/// Rounds half away from zero.
fn round(vm: &mut Vm, params: Value) -> VmResult<Value> {
    to_number(vm, "round", params).map(|n| Value::Number(n.round()))
}

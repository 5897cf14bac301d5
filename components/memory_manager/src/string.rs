//! String operations.
//!
//! Strings are immutable. Operations that keep bytes in place (slicing,
//! split, strip) return views over the same buffer; the rest build a new
//! buffer with [`Heap::new_string`], fill it and track it.

use crate::heap::Heap;
use crate::object::FnCode;
use core_types::{StrView, Value, VmError, VmResult};

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&i| &haystack[i..i + needle.len()] == needle)
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Formats a number the way `str()` shows it.
///
/// Values within 1e-6 of an integer print as that integer, everything else
/// with six decimals.
pub fn format_number(n: f64) -> String {
    let whole = n as i64;
    if n.abs() - (whole as f64).abs() < 0.000001 {
        whole.to_string()
    } else {
        format!("{:.6}", n)
    }
}

impl Heap {
    /// Builds a tracked string from bytes produced by `fill`.
    fn build_string(&mut self, len: usize, fill: impl FnOnce(&mut [u8])) -> VmResult<Value> {
        let s = self.new_string(len);
        if let Value::Str(view) = s {
            fill(self.string_buffer_mut(view.buf)?);
        }
        self.track(s)
    }

    /// Tracked string copied from a Rust string.
    pub fn string(&mut self, s: &str) -> VmResult<Value> {
        self.copy_string(s.as_bytes())
    }

    /// Byte offset of the first occurrence of `needle` in `s`.
    pub fn str_find(&self, s: StrView, needle: StrView) -> VmResult<Option<usize>> {
        Ok(find_bytes(self.str_bytes(s)?, self.str_bytes(needle)?))
    }

    /// Like [`Heap::str_find`] but a miss is a ValueError.
    pub fn str_index(&self, s: StrView, needle: StrView) -> VmResult<usize> {
        self.str_find(s, needle)?
            .ok_or_else(|| VmError::value_error("substring not found"))
    }

    /// Concatenation.
    pub fn str_concat(&mut self, a: StrView, b: StrView) -> VmResult<Value> {
        let mut bytes = self.str_bytes(a)?.to_vec();
        bytes.extend_from_slice(self.str_bytes(b)?);
        self.copy_string(&bytes)
    }

    /// `s` repeated `n` times; non-positive counts give the empty string.
    ///
    /// Results longer than a string view can address are a ValueError.
    pub fn str_repeat(&mut self, s: StrView, n: i64) -> VmResult<Value> {
        let count = usize::try_from(n.max(0)).unwrap_or(usize::MAX);
        let size = (s.len as usize).checked_mul(count);
        if size.map_or(true, |size| size > u32::MAX as usize) {
            return Err(VmError::value_error("repeated string is too long"));
        }
        let bytes = self.str_bytes(s)?.repeat(count);
        self.copy_string(&bytes)
    }

    /// `s` without leading and trailing ASCII whitespace, as a view.
    pub fn str_strip(&self, s: StrView) -> VmResult<StrView> {
        let bytes = self.str_bytes(s)?;
        let start = bytes.iter().position(|b| !is_space(*b)).unwrap_or(bytes.len());
        let end = bytes
            .iter()
            .rposition(|b| !is_space(*b))
            .map_or(start, |i| i + 1);
        Ok(s.substring(start as i64, end as i64))
    }

    /// List of views of `s` between occurrences of `delim`.
    pub fn str_split(&mut self, s: StrView, delim: StrView) -> VmResult<Value> {
        if delim.is_empty() {
            return Err(VmError::value_error("empty separator"));
        }
        let mut parts = Vec::new();
        let mut rest = s;
        while let Some(i) = self.str_find(rest, delim)? {
            parts.push(Value::Str(rest.substring(0, i as i64)));
            rest = rest.substring((i + delim.len()) as i64, rest.len() as i64);
        }
        parts.push(Value::Str(rest));
        self.list_from(&parts)
    }

    /// Every occurrence of `old` replaced by `new`, in one pass.
    pub fn str_replace(&mut self, s: StrView, old: StrView, new: StrView) -> VmResult<Value> {
        if old.is_empty() {
            return Err(VmError::value_error("empty substring"));
        }
        let src = self.str_bytes(s)?;
        let from = self.str_bytes(old)?;
        let to = self.str_bytes(new)?;
        let mut count = 0;
        let mut at = 0;
        while let Some(i) = find_bytes(&src[at..], from) {
            count += 1;
            at += i + from.len();
        }
        let mut out = Vec::with_capacity(src.len() + count * to.len() - count * from.len());
        let mut at = 0;
        while let Some(i) = find_bytes(&src[at..], from) {
            out.extend_from_slice(&src[at..at + i]);
            out.extend_from_slice(to);
            at += i + from.len();
        }
        out.extend_from_slice(&src[at..]);
        self.copy_string(&out)
    }

    /// `items` rendered with `str()` and joined by `delim`.
    pub fn str_join(&mut self, delim: StrView, items: &[Value]) -> VmResult<Value> {
        let sep = self.str_bytes(delim)?.to_vec();
        let mut out = Vec::new();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.extend_from_slice(&sep);
            }
            out.extend_from_slice(&self.to_bytes(*item)?);
        }
        self.build_string(out.len(), |buf| buf.copy_from_slice(&out))
    }

    /// The `str()` rendering of any value, as bytes.
    pub fn to_bytes(&self, v: Value) -> VmResult<Vec<u8>> {
        Ok(match v {
            Value::Str(s) => self.str_bytes(s)?.to_vec(),
            Value::Number(n) => format_number(n).into_bytes(),
            Value::None => b"None".to_vec(),
            Value::Dict(r, _) => format!("<dict 0x{:x}>", r.index).into_bytes(),
            Value::List(r) => format!("<list 0x{:x}>", r.index).into_bytes(),
            Value::Data(r) => format!("<data 0x{:x}>", r.index).into_bytes(),
            Value::Function(r) => match self.function(r)?.code {
                FnCode::Native(_) => format!("<native fnc 0x{:x}>", r.index).into_bytes(),
                FnCode::Bytecode(_) => format!("<fnc 0x{:x}>", r.index).into_bytes(),
            },
        })
    }

    /// `str(v)`: strings are returned unchanged, everything else is rendered
    /// into a new string.
    pub fn to_str(&mut self, v: Value) -> VmResult<Value> {
        if let Value::Str(_) = v {
            return Ok(v);
        }
        let bytes = self.to_bytes(v)?;
        self.copy_string(&bytes)
    }

    /// Lossy text rendering for messages. Never fails.
    pub fn display(&self, v: Value) -> String {
        match self.to_bytes(v) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => format!("<{}>", v.tag()),
        }
    }
}

//! Value ordering and hashing.
//!
//! Dict key equality is `cmp == Equal`, so the hash must agree with
//! [`Heap::cmp`]: equal values hash equally.

use crate::heap::Heap;
use core_types::{GcRef, Value, VmResult};
use std::cmp::Ordering;

/// Rolling byte hash.
///
/// Seeds with the length plus the first four bytes, then mixes in up to 32
/// bytes sampled from the end towards the start.
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    let l = bytes.len();
    let step = (l >> 5) + 1;
    let mut h = l as i32;
    if l >= 4 {
        h = h.wrapping_add(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]));
    }
    let mut i = l;
    while i >= step {
        h ^= h
            .wrapping_shl(5)
            .wrapping_add(h >> 2)
            .wrapping_add(bytes[i - 1] as i32);
        i -= step;
    }
    h as u32
}

fn hash_number(n: f64) -> u32 {
    let n = if n == 0.0 { 0.0 } else { n };
    hash_bytes(&n.to_le_bytes())
}

fn hash_identity(r: GcRef) -> u32 {
    hash_bytes(&r.index.to_le_bytes())
}

fn cmp_numbers(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
    }
}

impl Heap {
    /// Hash of a value, consistent with [`Heap::cmp`].
    ///
    /// Lists combine their elements' hashes; nested lists contribute their
    /// identity so self-containing lists terminate.
    pub fn hash(&self, v: Value) -> VmResult<u32> {
        Ok(match v {
            Value::None => 0,
            Value::Number(n) => hash_number(n),
            Value::Str(s) => hash_bytes(self.str_bytes(s)?),
            Value::List(r) => {
                let items = &self.list(r)?.items;
                let mut h = items.len() as u32;
                for item in items {
                    h = h.wrapping_add(match *item {
                        Value::List(inner) => hash_identity(inner),
                        other => self.hash(other)?,
                    });
                }
                h
            }
            Value::Dict(r, _) | Value::Function(r) | Value::Data(r) => hash_identity(r),
        })
    }

    /// Total ordering over values.
    ///
    /// Different tags order by tag rank. Strings compare bytewise with the
    /// shorter string first on a common prefix. Lists compare elementwise
    /// (nested lists by identity) and then by length. Dicts, functions and
    /// data compare by identity.
    pub fn cmp(&self, a: Value, b: Value) -> VmResult<Ordering> {
        if a.tag() != b.tag() {
            return Ok(a.tag().cmp(&b.tag()));
        }
        Ok(match (a, b) {
            (Value::None, Value::None) => Ordering::Equal,
            (Value::Number(x), Value::Number(y)) => cmp_numbers(x, y),
            (Value::Str(x), Value::Str(y)) => self.str_bytes(x)?.cmp(self.str_bytes(y)?),
            (Value::List(x), Value::List(y)) => {
                let xs = &self.list(x)?.items;
                let ys = &self.list(y)?.items;
                for (p, q) in xs.iter().zip(ys.iter()) {
                    let order = match (*p, *q) {
                        (Value::List(i), Value::List(j)) => i.cmp(&j),
                        (p, q) => self.cmp(p, q)?,
                    };
                    if order != Ordering::Equal {
                        return Ok(order);
                    }
                }
                xs.len().cmp(&ys.len())
            }
            (Value::Dict(x, _), Value::Dict(y, _))
            | (Value::Function(x), Value::Function(y))
            | (Value::Data(x), Value::Data(y)) => x.cmp(&y),
            _ => Ordering::Equal,
        })
    }

    /// `cmp(a, b) == Equal`.
    pub fn equals(&self, a: Value, b: Value) -> VmResult<bool> {
        Ok(self.cmp(a, b)? == Ordering::Equal)
    }
}

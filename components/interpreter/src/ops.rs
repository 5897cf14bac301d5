//! Value operations
//!
//! Indexing, membership, length, truthiness and the arithmetic operators,
//! as the dispatch loop and host code see them. Dict access goes through
//! the hook protocol and prototype lookup according to the dict's kind.

use crate::methods::Method;
use crate::vm::Vm;
use core_types::{DictKind, Value, VmError, VmResult};
use std::cmp::Ordering;

/// Binary operators on values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `**`
    Pow,
    /// `%`
    Mod,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Lsh,
    /// `>>`
    Rsh,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "**",
            BinOp::Mod => "%",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Lsh => "<<",
            BinOp::Rsh => ">>",
        }
    }
}

/// Python-style index wraparound; no bounds check.
fn wrap(n: f64, len: usize) -> i64 {
    let n = n as i64;
    if n < 0 {
        n + len as i64
    } else {
        n
    }
}

fn slice_bound(v: Value, default: i64) -> VmResult<i64> {
    match v {
        Value::Number(n) => Ok(n as i64),
        Value::None => Ok(default),
        _ => Err(VmError::type_error("indices must be numbers")),
    }
}

impl Vm {
    /// Prototype lookup of `key` on `obj`.
    ///
    /// Checks the dict's own table, then walks `meta` links for class and
    /// object dicts. A function found through the chain of an object dict
    /// comes back bound to that object. Returns `None` for a miss or a
    /// non-dict `obj`.
    ///
    /// # Errors
    ///
    /// RuntimeError "maximum lookup depth exceeded" after
    /// [`crate::VmConfig::lookup_depth`] consecutive misses.
    pub fn lookup(&mut self, obj: Value, key: Value) -> VmResult<Option<Value>> {
        self.lookup_in(obj, key, self.config.lookup_depth)
    }

    fn lookup_in(&mut self, obj: Value, key: Value, depth: usize) -> VmResult<Option<Value>> {
        let Value::Dict(r, kind) = obj else {
            return Ok(None);
        };
        if let Some(v) = self.heap.dict_lookup(r, key)? {
            return Ok(Some(v));
        }
        let depth = depth.saturating_sub(1);
        if depth == 0 {
            return Err(VmError::runtime_error("maximum lookup depth exceeded"));
        }
        let meta = self.heap.dict_meta(r)?;
        if kind == DictKind::Raw || !matches!(meta, Value::Dict(..)) {
            return Ok(None);
        }
        match self.lookup_in(meta, key, depth)? {
            Some(Value::Function(f)) if kind == DictKind::Object => {
                let bound = self.heap.function(f)?.bind(obj);
                Ok(Some(self.heap.new_function(bound)?))
            }
            found => Ok(found),
        }
    }

    /// `obj[key]`.
    pub fn get(&mut self, obj: Value, key: Value) -> VmResult<Value> {
        match obj {
            Value::Dict(r, kind) => {
                if kind == DictKind::Object {
                    if let Some(hook) = self.lookup(obj, self.names.get)? {
                        return self.call(hook, &[key]);
                    }
                }
                if kind != DictKind::Raw {
                    if let Some(v) = self.lookup(obj, key)? {
                        return Ok(v);
                    }
                }
                return self.heap.dict_get(r, key);
            }
            Value::List(r) => match key {
                Value::Number(n) => {
                    let i = wrap(n, self.heap.list_len(r)?);
                    return self.heap.list_get(r, i);
                }
                Value::Str(s) => {
                    let name = self.heap.str_bytes(s)?;
                    let (star, method) = (name == b"*", Method::for_list(name));
                    if star {
                        let copy = self.heap.list_copy(r)?;
                        self.heap.list_clear(r)?;
                        return Ok(copy);
                    }
                    if let Some(m) = method {
                        return self.bound_native(obj, m.id());
                    }
                }
                Value::None => return self.heap.list_pop(r, 0),
                _ => {}
            },
            Value::Str(s) => match key {
                Value::Number(n) => {
                    let i = wrap(n, s.len());
                    if i < 0 || i as usize >= s.len() {
                        return Err(VmError::index_error(format!(
                            "string index {} out of range",
                            n as i64
                        )));
                    }
                    return Ok(Value::Str(s.substring(i, i + 1)));
                }
                Value::Str(k) => {
                    if let Some(m) = Method::for_str(self.heap.str_bytes(k)?) {
                        return self.bound_native(obj, m.id());
                    }
                }
                _ => {}
            },
            _ => {}
        }
        if let Value::List(k) = key {
            let len = self.len(obj)? as i64;
            let a = slice_bound(self.heap.list_get(k, 0)?, 0)?;
            let b = slice_bound(self.heap.list_get(k, 1)?, len)?;
            match obj {
                Value::List(r) => return self.heap.list_slice(r, a, b),
                Value::Str(s) => return Ok(Value::Str(s.substring(a, b))),
                _ => {}
            }
        }
        Err(VmError::type_error(format!(
            "cannot index {} with {}",
            obj.tag(),
            key.tag()
        )))
    }

    /// Non-raising get used by `IGET` and `GGET`.
    ///
    /// Dicts are read raw with no hooks or prototypes; an empty list is a
    /// miss; everything else is a full [`Vm::get`].
    pub fn safe_get(&mut self, obj: Value, key: Value) -> VmResult<Option<Value>> {
        match obj {
            Value::Dict(r, _) => self.heap.dict_lookup(r, key),
            Value::List(r) if self.heap.list_len(r)? == 0 => Ok(None),
            _ => self.get(obj, key).map(Some),
        }
    }

    /// `obj[key] = v`.
    pub fn set(&mut self, obj: Value, key: Value, v: Value) -> VmResult<()> {
        match obj {
            Value::Dict(r, kind) => {
                if kind == DictKind::Object {
                    if let Some(hook) = self.lookup(obj, self.names.set)? {
                        self.call(hook, &[key, v])?;
                        return Ok(());
                    }
                }
                return self.heap.dict_set(r, key, v);
            }
            Value::List(r) => match key {
                Value::Number(n) => {
                    let i = wrap(n, self.heap.list_len(r)?);
                    return self.heap.list_set(r, i, v);
                }
                Value::None => return self.heap.list_append(r, v),
                Value::Str(s) if self.heap.str_bytes(s)? == b"*" => {
                    if let Value::List(other) = v {
                        return self.heap.list_extend(r, other);
                    }
                }
                _ => {}
            },
            _ => {}
        }
        Err(VmError::type_error(format!(
            "{} does not support item assignment",
            obj.tag()
        )))
    }

    /// Membership: dict key, substring, or list element.
    pub fn has(&mut self, obj: Value, key: Value) -> VmResult<bool> {
        match (obj, key) {
            (Value::Dict(r, _), _) => self.heap.dict_has(r, key),
            (Value::Str(s), Value::Str(k)) => Ok(self.heap.str_find(s, k)?.is_some()),
            (Value::List(r), _) => Ok(self.heap.list_find(r, key)?.is_some()),
            _ => Err(VmError::type_error(format!(
                "argument of type {} is not iterable",
                obj.tag()
            ))),
        }
    }

    /// `del obj[key]`: dict key or list index.
    pub fn del(&mut self, obj: Value, key: Value) -> VmResult<()> {
        match (obj, key) {
            (Value::Dict(r, _), _) => self.heap.dict_del(r, key),
            (Value::List(r), Value::Number(n)) => {
                let i = wrap(n, self.heap.list_len(r)?);
                self.heap.list_pop(r, i).map(|_| ())
            }
            _ => Err(VmError::type_error(format!(
                "{} does not support item deletion",
                obj.tag()
            ))),
        }
    }

    /// Length of a string, list or dict.
    pub fn len(&self, obj: Value) -> VmResult<usize> {
        match obj {
            Value::Str(s) => Ok(s.len()),
            Value::List(r) => self.heap.list_len(r),
            Value::Dict(r, _) => self.heap.dict_len(r),
            _ => Err(VmError::type_error(format!(
                "len() of unsized {}",
                obj.tag()
            ))),
        }
    }

    /// The `n`-th item of an iteration over `seq`.
    ///
    /// Dicts ignore `n` and advance their own cursor, so the order of keys
    /// is unspecified.
    pub fn iterate(&mut self, seq: Value, n: Value) -> VmResult<Value> {
        match (seq, n) {
            (Value::List(_) | Value::Str(_), _) => self.get(seq, n),
            (Value::Dict(r, _), Value::Number(_)) => self.heap.dict_next_key(r),
            _ => Err(VmError::type_error(format!(
                "iteration over non-sequence {}",
                seq.tag()
            ))),
        }
    }

    /// Truthiness.
    pub fn truthy(&self, v: Value) -> VmResult<bool> {
        Ok(match v {
            Value::None => false,
            Value::Number(n) => n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(r) => self.heap.list_len(r)? != 0,
            Value::Dict(r, _) => self.heap.dict_len(r)? != 0,
            Value::Function(_) | Value::Data(_) => true,
        })
    }

    /// Value ordering.
    pub fn compare(&self, a: Value, b: Value) -> VmResult<Ordering> {
        self.heap.cmp(a, b)
    }

    /// Applies a binary operator.
    ///
    /// `+` also concatenates strings and lists; `*` repeats strings.
    /// Everything else takes two numbers. Integer operators truncate
    /// their operands to `i64`.
    pub fn binary(&mut self, op: BinOp, a: Value, b: Value) -> VmResult<Value> {
        match (op, a, b) {
            (_, Value::Number(x), Value::Number(y)) => numeric(op, x, y),
            (BinOp::Add, Value::Str(x), Value::Str(y)) => self.heap.str_concat(x, y),
            (BinOp::Add, Value::List(x), Value::List(y)) => {
                let copy = self.heap.list_copy(x)?;
                if let Value::List(c) = copy {
                    self.heap.list_extend(c, y)?;
                }
                Ok(copy)
            }
            (BinOp::Mul, Value::Str(s), Value::Number(n))
            | (BinOp::Mul, Value::Number(n), Value::Str(s)) => self.heap.str_repeat(s, n as i64),
            _ => Err(VmError::type_error(format!(
                "unsupported operand types for {}: {} and {}",
                op.symbol(),
                a.tag(),
                b.tag()
            ))),
        }
    }

    /// `~v` on a number.
    pub fn bit_not(&self, v: Value) -> VmResult<Value> {
        match v {
            Value::Number(n) => Ok(Value::Number(!(n as i64) as f64)),
            other => Err(VmError::type_error(format!(
                "unsupported operand type for ~: {}",
                other.tag()
            ))),
        }
    }
}

fn numeric(op: BinOp, x: f64, y: f64) -> VmResult<Value> {
    let (i, j) = (x as i64, y as i64);
    let n = match op {
        BinOp::Add => x + y,
        BinOp::Sub => x - y,
        BinOp::Mul => x * y,
        BinOp::Div => x / y,
        BinOp::Pow => x.powf(y),
        BinOp::Mod => {
            if j == 0 {
                return Err(VmError::value_error("integer modulo by zero"));
            }
            i.wrapping_rem(j) as f64
        }
        BinOp::BitAnd => (i & j) as f64,
        BinOp::BitOr => (i | j) as f64,
        BinOp::BitXor => (i ^ j) as f64,
        BinOp::Lsh => i.wrapping_shl(j as u32) as f64,
        BinOp::Rsh => i.wrapping_shr(j as u32) as f64,
    };
    Ok(Value::Number(n))
}

//! Methods of lists and strings
//!
//! `list.append`, `"s".split` and friends are natives bound to their
//! receiver at lookup time. They occupy the first slots of every VM's
//! native table so a lookup never has to register anything.

use crate::native::Args;
use crate::vm::{NativeFn, Vm};
use core_types::{Value, VmError, VmResult};
use memory_manager::NativeId;

/// Built-in methods, in native table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    ListAppend,
    ListPop,
    ListIndex,
    ListSort,
    ListExtend,
    StrJoin,
    StrSplit,
    StrIndex,
    StrFind,
    StrStrip,
    StrReplace,
}

/// Natives backing [`Method`], indexed by discriminant.
pub(crate) const TABLE: [NativeFn; 11] = [
    list_append,
    list_pop,
    list_index,
    list_sort,
    list_extend,
    str_join,
    str_split,
    str_index,
    str_find,
    str_strip,
    str_replace,
];

impl Method {
    pub(crate) fn id(self) -> NativeId {
        NativeId(self as u32)
    }

    pub(crate) fn for_list(name: &[u8]) -> Option<Method> {
        Some(match name {
            b"append" => Method::ListAppend,
            b"pop" => Method::ListPop,
            b"index" => Method::ListIndex,
            b"sort" => Method::ListSort,
            b"extend" => Method::ListExtend,
            _ => return None,
        })
    }

    pub(crate) fn for_str(name: &[u8]) -> Option<Method> {
        Some(match name {
            b"join" => Method::StrJoin,
            b"split" => Method::StrSplit,
            b"index" => Method::StrIndex,
            b"find" => Method::StrFind,
            b"strip" => Method::StrStrip,
            b"replace" => Method::StrReplace,
            _ => return None,
        })
    }
}

fn list_append(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "append", params)?;
    let list = args.list()?;
    let v = args.value()?;
    vm.heap.list_append(list, v)?;
    Ok(Value::None)
}

/// `list.pop([index])`, the last element by default.
fn list_pop(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "pop", params)?;
    let list = args.list()?;
    let len = vm.heap.list_len(list)? as i64;
    let index = match args.value_or(Value::None) {
        Value::Number(n) if n < 0.0 => len + n as i64,
        Value::Number(n) => n as i64,
        _ => len - 1,
    };
    if len == 0 {
        return Err(VmError::index_error("pop from empty list"));
    }
    vm.heap.list_pop(list, index)
}

fn list_index(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "index", params)?;
    let list = args.list()?;
    let v = args.value()?;
    match vm.heap.list_find(list, v)? {
        Some(i) => Ok(Value::Number(i as f64)),
        None => Err(VmError::value_error("list.index(x): x not in list")),
    }
}

fn list_sort(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "sort", params)?;
    let list = args.list()?;
    vm.heap.list_sort(list)?;
    Ok(Value::None)
}

fn list_extend(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "extend", params)?;
    let list = args.list()?;
    let other = args.list()?;
    vm.heap.list_extend(list, other)?;
    Ok(Value::None)
}

fn str_join(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "join", params)?;
    let delim = args.string()?;
    let list = args.list()?;
    let items = vm.heap.list_items(list)?.to_vec();
    vm.heap.str_join(delim, &items)
}

fn str_split(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "split", params)?;
    let s = args.string()?;
    let delim = args.string()?;
    vm.heap.str_split(s, delim)
}

fn str_index(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "index", params)?;
    let s = args.string()?;
    let needle = args.string()?;
    Ok(Value::Number(vm.heap.str_index(s, needle)? as f64))
}

fn str_find(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "find", params)?;
    let s = args.string()?;
    let needle = args.string()?;
    Ok(Value::Number(match vm.heap.str_find(s, needle)? {
        Some(i) => i as f64,
        None => -1.0,
    }))
}

fn str_strip(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "strip", params)?;
    let s = args.string()?;
    Ok(Value::Str(vm.heap.str_strip(s)?))
}

fn str_replace(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "replace", params)?;
    let s = args.string()?;
    let old = args.string()?;
    let new = args.string()?;
    vm.heap.str_replace(s, old, new)
}

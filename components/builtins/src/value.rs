//! Generic value builtins: `len`, `copy`, `bool` and `istype`

use core_types::{Value, VmError, VmResult};
use interpreter::{Args, NativeFn, Vm};

pub(crate) const NATIVES: [(&str, NativeFn); 4] = [
    ("len", len),
    ("copy", copy),
    ("bool", bool),
    ("istype", istype),
];

fn len(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let v = Args::new(vm, "len", params)?.value()?;
    Ok(Value::Number(vm.len(v)? as f64))
}

/// Shallow copy of a list or dict. Dict copies are class-kind with no meta.
fn copy(vm: &mut Vm, params: Value) -> VmResult<Value> {
    match Args::new(vm, "copy", params)?.value()? {
        Value::List(r) => vm.heap_mut().list_copy(r),
        Value::Dict(r, _) => vm.heap_mut().dict_copy(r),
        other => Err(VmError::type_error(format!(
            "copy() expected list or dict, got {}",
            other.tag()
        ))),
    }
}

fn bool(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let v = Args::new(vm, "bool", params)?.value()?;
    Ok(Value::from_bool(vm.truthy(v)?))
}

/// `istype(v, name)` for `string`, `list`, `dict`, `number`, `fnc` and
/// `method` (a bound function).
fn istype(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "istype", params)?;
    let v = args.value()?;
    let name = args.string()?;
    let bound = match v {
        Value::Function(r) => Some(vm.heap().function(r)?.bound),
        _ => None,
    };
    let matches = match vm.heap().str_bytes(name)? {
        b"string" => matches!(v, Value::Str(_)),
        b"list" => matches!(v, Value::List(_)),
        b"dict" => matches!(v, Value::Dict(..)),
        b"number" => matches!(v, Value::Number(_)),
        b"fnc" => bound == Some(false),
        b"method" => bound == Some(true),
        other => {
            return Err(VmError::type_error(format!(
                "istype() unknown type name {}",
                String::from_utf8_lossy(other)
            )))
        }
    };
    Ok(Value::from_bool(matches))
}

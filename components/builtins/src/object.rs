//! Objects, classes and meta dicts
//!
//! `object` is itself an object-kind dict. Calling it goes through its
//! `__call__`; classes made with [`Vm::class`] have it as their meta, so
//! calling a class finds `__new__` here and constructs an instance.

use core_types::{DictKind, Value, VmError, VmResult};
use interpreter::{Args, NativeFn, Vm};

pub(crate) const NATIVES: [(&str, NativeFn); 5] = [
    ("getraw", getraw),
    ("setmeta", setmeta),
    ("getmeta", getmeta),
    ("bind", bind),
    ("merge", merge),
];

/// Builds the `object` base and registers it.
pub(crate) fn install(vm: &mut Vm) -> VmResult<()> {
    let object = vm.heap_mut().new_dict(DictKind::Object)?;
    vm.register("object", object)?;
    for (name, f) in [("__call__", object_call as NativeFn), ("__new__", object_new)] {
        let key = vm.string(name)?;
        let f = vm.native(f)?;
        vm.set(object, key, f)?;
    }
    Ok(())
}

/// `object()` makes an empty object; `object(d)` views dict `d` as one.
fn object_call(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "object", params)?;
    if args.is_empty() {
        return vm.heap_mut().new_dict(DictKind::Object);
    }
    Ok(args.dict()?.with_kind(DictKind::Object))
}

/// `klass(...)`: the class arrives first, the rest go to `__init__`.
fn object_new(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let list = params
        .as_list()
        .ok_or_else(|| VmError::type_error("__new__() parameters must be a list"))?;
    let klass = vm.heap_mut().list_pop(list, 0)?;
    if !matches!(klass, Value::Dict(..)) {
        return Err(VmError::type_error(format!(
            "__new__() expected a class, got {}",
            klass.tag()
        )));
    }
    vm.construct(klass, params)
}

/// The same dict with hooks and meta lookup switched off.
fn getraw(vm: &mut Vm, params: Value) -> VmResult<Value> {
    Ok(Args::new(vm, "getraw", params)?.dict()?.with_kind(DictKind::Raw))
}

fn setmeta(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "setmeta", params)?;
    let (r, _) = args.dict()?.as_dict().ok_or_else(|| VmError::type_error("setmeta() expected dict"))?;
    let meta = args.dict()?;
    vm.heap_mut().set_dict_meta(r, meta)?;
    Ok(Value::None)
}

fn getmeta(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let d = Args::new(vm, "getmeta", params)?.dict()?;
    match d {
        Value::Dict(r, _) => vm.heap().dict_meta(r),
        _ => Ok(Value::None),
    }
}

/// `bind(f, self)`: a method calling `f` with `self` prepended.
fn bind(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "bind", params)?;
    let f = match args.value()? {
        Value::Function(r) => r,
        other => {
            return Err(VmError::type_error(format!(
                "bind() expected fnc, got {}",
                other.tag()
            )))
        }
    };
    let receiver = args.value()?;
    let bound = vm.heap().function(f)?.bind(receiver);
    vm.heap_mut().new_function(bound)
}

/// `merge(dst, src)` copies every entry of `src` into `dst`.
fn merge(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "merge", params)?;
    let (dst, src) = (args.dict()?, args.dict()?);
    if let (Value::Dict(dst, _), Value::Dict(src, _)) = (dst, src) {
        vm.heap_mut().dict_merge(dst, src)?;
    }
    Ok(Value::None)
}

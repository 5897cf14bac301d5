//! File builtins: `save`, `load`, `exists` and `mtime`
//!
//! Paths are taken as given, relative to the process working directory.

use core_types::{StrView, Value, VmError, VmResult};
use interpreter::{Args, NativeFn, Vm};
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

pub(crate) const NATIVES: [(&str, NativeFn); 4] = [
    ("save", save),
    ("load", load),
    ("exists", exists),
    ("mtime", mtime),
];

fn path(vm: &Vm, s: StrView) -> VmResult<PathBuf> {
    Ok(PathBuf::from(
        String::from_utf8_lossy(vm.heap().str_bytes(s)?).into_owned(),
    ))
}

/// `save(fname, s)` writes the bytes of `s`, replacing the file.
fn save(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "save", params)?;
    let fname = path(vm, args.string()?)?;
    let data = args.string()?;
    std::fs::write(&fname, vm.heap().str_bytes(data)?)
        .map_err(|e| VmError::io_error(format!("cannot save {}: {}", fname.display(), e)))?;
    Ok(Value::None)
}

fn load(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let fname = path(vm, Args::new(vm, "load", params)?.string()?)?;
    let bytes = std::fs::read(&fname)
        .map_err(|e| VmError::io_error(format!("cannot load {}: {}", fname.display(), e)))?;
    vm.bytes(&bytes)
}

fn exists(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let fname = path(vm, Args::new(vm, "exists", params)?.string()?)?;
    Ok(Value::from_bool(std::fs::metadata(fname).is_ok()))
}

/// Modification time in whole seconds since the Unix epoch.
fn mtime(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let fname = path(vm, Args::new(vm, "mtime", params)?.string()?)?;
    let modified = std::fs::metadata(&fname)
        .and_then(|m| m.modified())
        .map_err(|e| VmError::io_error(format!("cannot stat {}: {}", fname.display(), e)))?;
    let secs = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as f64)
        .unwrap_or(0.0);
    Ok(Value::Number(secs))
}

//! String builtins: `str`, `chr`, `ord` and `fpack`

use core_types::{Value, VmError, VmResult};
use interpreter::{Args, NativeFn, Vm};

pub(crate) const NATIVES: [(&str, NativeFn); 4] = [
    ("str", str),
    ("chr", chr),
    ("ord", ord),
    ("fpack", fpack),
];

/// `str(v)`; strings come back unchanged.
fn str(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let v = Args::new(vm, "str", params)?.value()?;
    vm.heap_mut().to_str(v)
}

/// One-byte string for a character code, taken modulo 256.
fn chr(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let code = Args::new(vm, "chr", params)?.number()?;
    vm.bytes(&[code as i64 as u8])
}

fn ord(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let s = Args::new(vm, "ord", params)?.string()?;
    match vm.heap().str_bytes(s)? {
        [byte] => Ok(Value::Number(*byte as f64)),
        _ => Err(VmError::type_error("ord() expected a character")),
    }
}

/// The 8 little-endian bytes of a number, as stored after `NUMBER`.
fn fpack(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let n = Args::new(vm, "fpack", params)?.number()?;
    vm.bytes(&n.to_le_bytes())
}

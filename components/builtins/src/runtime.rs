//! Builtins that drive the VM itself: `import`, `exec` and `assert`

use core_types::{ErrorKind, Value, VmError, VmResult};
use interpreter::{Args, NativeFn, Vm};

pub(crate) const NATIVES: [(&str, NativeFn); 3] = [
    ("import", import),
    ("exec", exec),
    ("assert", assert),
];

fn import(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let name = Args::new(vm, "import", params)?.string()?;
    let name = String::from_utf8_lossy(vm.heap().str_bytes(name)?).into_owned();
    vm.import(&name)
}

/// `exec(code, globals)` runs bytecode over a globals dict.
fn exec(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "exec", params)?;
    let code = args.value()?;
    let globals = args.dict()?;
    vm.exec(code, globals)
}

/// Raises AssertionError when its number argument is zero.
fn assert(vm: &mut Vm, params: Value) -> VmResult<Value> {
    if Args::new(vm, "assert", params)?.number()? != 0.0 {
        return Ok(Value::None);
    }
    Err(VmError::new(ErrorKind::AssertionError, "assertion failed"))
}

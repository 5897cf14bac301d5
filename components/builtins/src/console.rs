//! `print`

use core_types::{Value, VmResult};
use interpreter::{Args, NativeFn, Vm};

pub(crate) const NATIVES: [(&str, NativeFn); 1] = [("print", print)];

/// Writes the `str()` of every parameter, space separated, then a newline.
fn print(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let values = Args::new(vm, "print", params)?.rest();
    let mut line = values
        .iter()
        .map(|v| vm.text(*v))
        .collect::<Vec<_>>()
        .join(" ");
    line.push('\n');
    vm.write_out(line.as_bytes())?;
    Ok(Value::None)
}

//! Standard builtin functions for the Tern VM
//!
//! This crate fills a [`Vm`]'s builtins dict with the functions scripts
//! expect to find as globals:
//! - console output (`print`)
//! - numbers (`float`, `number`, `int`, `abs`, `round`)
//! - strings (`str`, `chr`, `ord`, `fpack`)
//! - sequences (`range`, `min`, `max`)
//! - generic values (`len`, `copy`, `bool`, `istype`)
//! - objects and classes (`object`, `bind`, `merge`, `getraw`, `setmeta`, `getmeta`)
//! - files (`save`, `load`, `exists`, `mtime`)
//! - the VM itself (`import`, `exec`, `assert`)
//!
//! # Example
//!
//! ```
//! use builtins::register_builtins;
//! use interpreter::{Vm, VmConfig};
//! use core_types::Value;
//!
//! let mut vm = Vm::new(VmConfig::default()).unwrap();
//! register_builtins(&mut vm).unwrap();
//!
//! let len = vm.builtin("len").unwrap();
//! let s = vm.string("tern").unwrap();
//! assert_eq!(vm.call(len, &[s]).unwrap(), Value::Number(4.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod console;
pub mod fs;
pub mod list;
pub mod number;
pub mod object;
pub mod runtime;
pub mod string;
pub mod value;

use core_types::VmResult;
use interpreter::{NativeFn, Vm, VmConfig};
use tracing::debug;

// Re-export main types for convenience
pub use list::range_items;
pub use number::{parse_float, parse_int, MAX_NUMERIC_LEN};

/// Registers every builtin function and the `object` base into `vm`.
pub fn register_builtins(vm: &mut Vm) -> VmResult<()> {
    let tables: [&[(&str, NativeFn)]; 8] = [
        &console::NATIVES,
        &number::NATIVES,
        &string::NATIVES,
        &list::NATIVES,
        &value::NATIVES,
        &object::NATIVES,
        &fs::NATIVES,
        &runtime::NATIVES,
    ];
    let mut count = 0;
    for table in tables {
        for &(name, f) in table {
            vm.register_native(name, f)?;
            count += 1;
        }
    }
    object::install(vm)?;
    debug!(count, "registered builtins");
    Ok(())
}

/// Creates a VM with the standard builtins already registered.
pub fn new_vm(config: VmConfig) -> VmResult<Vm> {
    let mut vm = Vm::new(config)?;
    register_builtins(&mut vm)?;
    Ok(vm)
}

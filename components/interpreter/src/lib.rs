//! Register bytecode interpreter for the Tern VM
//!
//! This crate provides the virtual machine that runs `.tpc` code:
//! - A shared register array carved into per-call windows
//! - The call protocol with bound functions and `__new__`/`__call__` hooks
//! - Attribute lookup through meta chains with `__get__`/`__set__` hooks
//! - Per-frame exception handlers and tracebacks
//! - Module import and host embedding helpers
//!
//! # Example
//!
//! ```
//! use interpreter::{Vm, VmConfig};
//! use bytecode_system::{BytecodeChunk, Opcode};
//! use core_types::Value;
//!
//! let mut vm = Vm::new(VmConfig::default()).unwrap();
//! let mut chunk = BytecodeChunk::new();
//! chunk.emit(Opcode::Regs, 1, 0, 0);
//! chunk.number(0, 42.0);
//! chunk.emit(Opcode::Return, 0, 0, 0);
//!
//! let code = vm.bytes(&chunk.finish().unwrap()).unwrap();
//! let globals = vm.dict().unwrap();
//! assert_eq!(vm.exec(code, globals).unwrap(), Value::Number(42.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod call;
pub mod call_frame;
pub mod config;
mod dispatch;
pub mod import;
mod methods;
pub mod native;
pub mod ops;
pub mod output;
pub mod vm;

// Re-export main types at crate root
pub use call_frame::{Frame, ReturnTo, FRAMES, REGS_EXTRA};
pub use config::{VmConfig, DEFAULT_LOOKUP_DEPTH, DEFAULT_REGISTERS};
pub use import::MODULE_EXT;
pub use native::Args;
pub use ops::BinOp;
pub use output::CaptureOutput;
pub use vm::{NativeFn, Vm};

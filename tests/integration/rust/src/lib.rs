//! Integration test suite for the Tern VM
//!
//! This crate provides integration tests that verify components work
//! together across crate boundaries, plus a few helpers for assembling
//! test programs.

use bytecode_system::{BytecodeChunk, Opcode};
use core_types::{Value, VmResult};
use interpreter::{Vm, VmConfig};

/// Re-export components for test convenience
pub mod components {
    pub use builtins;
    pub use bytecode_system;
    pub use core_types;
    pub use interpreter;
    pub use memory_manager;
    pub use tern_cli;
}

/// A VM with the standard builtins registered.
pub fn vm() -> Vm {
    vm_with(VmConfig::default())
}

/// Like [`vm`] with custom settings.
pub fn vm_with(config: VmConfig) -> Vm {
    builtins::new_vm(config).expect("vm with builtins")
}

/// Runs `chunk` over fresh globals and returns its result.
pub fn run(vm: &mut Vm, chunk: BytecodeChunk) -> VmResult<Value> {
    let code = vm.bytes(&chunk.finish().expect("assembled chunk"))?;
    let globals = vm.dict()?;
    vm.exec(code, globals)
}

/// Emits `R[dst] = name(R[first], .., R[first + argc - 1])`.
///
/// `R[dst + 1]` holds the parameter list.
pub fn call_global(chunk: &mut BytecodeChunk, dst: u8, name: &str, first: u8, argc: u8) {
    chunk.string(dst, name).expect("name fits");
    chunk.emit(Opcode::GGet, dst, dst, 0);
    chunk.emit(Opcode::Params, dst + 1, first, argc);
    chunk.emit(Opcode::Call, dst, dst, dst + 1);
}

/// Emits `R[dst] = R[obj].name(R[first], .., R[first + argc - 1])`.
pub fn call_method(chunk: &mut BytecodeChunk, dst: u8, obj: u8, name: &str, first: u8, argc: u8) {
    chunk.string(dst, name).expect("name fits");
    chunk.emit(Opcode::Get, dst, obj, dst);
    chunk.emit(Opcode::Params, dst + 1, first, argc);
    chunk.emit(Opcode::Call, dst, dst, dst + 1);
}

/// Emits `DEF` of `body` into `R[scratch]` and stores it as global `name`.
pub fn def_global(chunk: &mut BytecodeChunk, scratch: u8, name: &str, body: BytecodeChunk) {
    chunk.def(scratch, body).expect("body fits");
    chunk.string(scratch + 1, name).expect("name fits");
    chunk.emit(Opcode::GSet, scratch + 1, scratch, 0);
}

/// Emits `R[dst] = params[index]` for a function body, whose parameter
/// list sits in `R[0]`.
pub fn param(chunk: &mut BytecodeChunk, dst: u8, index: u8) {
    chunk.number(dst, index as f64);
    chunk.emit(Opcode::Get, dst, 0, dst);
}

//! Integration tests for interpreter
//!
//! Exercises the VM together with the heap and collector: recursion
//! limits, window clearing, garbage reclamation and module loading.

use bytecode_system::{BytecodeChunk, Opcode};
use core_types::{ErrorKind, Value, VmResult};
use interpreter::{Vm, VmConfig};

fn exec(vm: &mut Vm, chunk: BytecodeChunk) -> VmResult<Value> {
    let code = vm.bytes(&chunk.finish().unwrap()).unwrap();
    let globals = vm.dict().unwrap();
    vm.exec(code, globals)
}

/// Module body defining a global `f` that calls itself forever.
fn runaway_recursion() -> BytecodeChunk {
    let mut f = BytecodeChunk::new();
    f.emit(Opcode::Regs, 4, 0, 0);
    f.string(1, "f").unwrap();
    f.emit(Opcode::GGet, 1, 1, 0);
    f.emit(Opcode::List, 2, 2, 0);
    f.emit(Opcode::Call, 1, 1, 2);
    f.emit(Opcode::Return, 1, 0, 0);

    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 3, 0, 0);
    chunk.def(0, f).unwrap();
    chunk.string(1, "f").unwrap();
    chunk.emit(Opcode::GSet, 1, 0, 0);
    chunk
}

fn call_f(chunk: &mut BytecodeChunk) {
    chunk.emit(Opcode::GGet, 0, 1, 0);
    chunk.emit(Opcode::List, 2, 2, 0);
    chunk.emit(Opcode::Call, 0, 0, 2);
}

#[test]
fn test_unbounded_recursion_is_stack_overflow() {
    let mut vm = Vm::new(VmConfig::default()).unwrap();
    let mut chunk = runaway_recursion();
    call_f(&mut chunk);
    chunk.emit(Opcode::Eof, 0, 0, 0);

    let err = exec(&mut vm, chunk).unwrap_err();
    assert_eq!(err.kind, ErrorKind::RuntimeError);
    assert_eq!(err.message, "stack overflow");
    assert_eq!(vm.depth(), 0);
}

#[test]
fn test_stack_overflow_is_catchable() {
    let mut vm = Vm::new(VmConfig::default().with_registers(2048)).unwrap();
    let mut chunk = runaway_recursion();
    let catch = chunk.label();
    chunk.setjmp(catch);
    call_f(&mut chunk);
    chunk.emit(Opcode::Eof, 0, 0, 0);
    chunk.bind(catch).unwrap();
    chunk.number(0, 1.0);
    chunk.emit(Opcode::Return, 0, 0, 0);

    assert_eq!(exec(&mut vm, chunk).unwrap(), Value::Number(1.0));
    assert_eq!(vm.text(vm.exception()), "RuntimeError: stack overflow");
}

#[test]
fn test_vm_usable_after_uncaught_error() {
    let mut vm = Vm::new(VmConfig::default()).unwrap();
    let mut chunk = runaway_recursion();
    call_f(&mut chunk);
    assert!(exec(&mut vm, chunk).is_err());

    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 1, 0, 0);
    chunk.number(0, 5.0);
    chunk.emit(Opcode::Return, 0, 0, 0);
    assert_eq!(exec(&mut vm, chunk).unwrap(), Value::Number(5.0));
}

#[test]
fn test_garbage_lists_are_reclaimed() {
    let mut vm = Vm::new(VmConfig::default()).unwrap();
    vm.gc_full().unwrap();
    vm.gc_full().unwrap();
    let baseline = vm.gc_stats().live();

    let mut chunk = BytecodeChunk::new();
    let (top, done) = (chunk.label(), chunk.label());
    chunk.emit(Opcode::Regs, 5, 0, 0);
    chunk.number(0, 0.0);
    chunk.number(1, 10_000.0);
    chunk.number(3, 1.0);
    chunk.bind(top).unwrap();
    chunk.emit(Opcode::Lt, 4, 0, 1);
    chunk.emit(Opcode::If, 4, 0, 0);
    chunk.jump(done);
    chunk.emit(Opcode::List, 2, 2, 0);
    chunk.emit(Opcode::Add, 0, 0, 3);
    chunk.jump(top);
    chunk.bind(done).unwrap();
    chunk.emit(Opcode::Eof, 0, 0, 0);
    exec(&mut vm, chunk).unwrap();

    assert!(vm.gc_stats().allocated >= 10_000);
    vm.gc_full().unwrap();
    vm.gc_full().unwrap();
    assert!(vm.gc_stats().live() <= baseline);
}

#[test]
fn test_returned_window_no_longer_roots_values() {
    let mut vm = Vm::new(VmConfig::default()).unwrap();
    let mut body = BytecodeChunk::new();
    body.emit(Opcode::Regs, 3, 0, 0);
    body.emit(Opcode::List, 1, 1, 0);
    body.emit(Opcode::List, 2, 1, 1);
    body.emit(Opcode::None, 0, 0, 0);
    body.emit(Opcode::Return, 0, 0, 0);

    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 3, 0, 0);
    chunk.def(0, body).unwrap();
    chunk.emit(Opcode::Return, 0, 0, 0);
    let f = exec(&mut vm, chunk).unwrap();
    let keep = vm.list(&[f]).unwrap();
    vm.register("keep", keep).unwrap();

    vm.gc_full().unwrap();
    vm.gc_full().unwrap();
    let before = vm.gc_stats().live();
    assert_eq!(vm.call(f, &[]).unwrap(), Value::None);
    vm.gc_full().unwrap();
    vm.gc_full().unwrap();
    assert!(vm.gc_stats().live() <= before);
}

#[test]
fn test_traceback_lists_every_frame_with_a_line() {
    let mut vm = Vm::new(VmConfig::default()).unwrap();
    let mut body = BytecodeChunk::new();
    body.emit(Opcode::Regs, 2, 0, 0);
    body.string(1, "inner").unwrap();
    body.emit(Opcode::Name, 1, 0, 0);
    body.line(7, "raise 'oops'").unwrap();
    body.string(1, "oops").unwrap();
    body.emit(Opcode::Raise, 1, 0, 0);

    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 3, 0, 0);
    chunk.string(1, "prog.py").unwrap();
    chunk.emit(Opcode::File, 1, 0, 0);
    chunk.string(1, "?").unwrap();
    chunk.emit(Opcode::Name, 1, 0, 0);
    chunk.line(2, "inner()").unwrap();
    chunk.def(0, body).unwrap();
    chunk.emit(Opcode::List, 2, 2, 0);
    chunk.emit(Opcode::Call, 0, 0, 2);
    chunk.emit(Opcode::Eof, 0, 0, 0);

    let err = exec(&mut vm, chunk).unwrap_err();
    assert_eq!(err.stack.len(), 2);
    let tb = err.traceback();
    assert!(tb.contains("File \"prog.py\", line 2, in ?\n  inner()"));
    assert!(tb.contains("line 7, in inner\n  raise 'oops'"));
    assert!(tb.ends_with("\nException:\nException: oops\n"));
}

#[test]
fn test_module_imported_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 2, 0, 0);
    chunk.string(0, "loaded").unwrap();
    chunk.emit(Opcode::Debug, 0, 0, 0);
    chunk.emit(Opcode::Eof, 0, 0, 0);
    std::fs::write(dir.path().join("once.tpc"), chunk.finish().unwrap()).unwrap();

    let out = interpreter::CaptureOutput::new();
    let mut vm = Vm::new(VmConfig::default().with_module_dir(dir.path())).unwrap();
    vm.set_output(Box::new(out.clone()));
    let a = vm.import("once").unwrap();
    let b = vm.import("once").unwrap();
    assert_eq!(a, b);
    assert_eq!(out.contents(), "DEBUG: 0 loaded\n");
}

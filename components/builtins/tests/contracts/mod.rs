//! Contract tests for the builtins registry

use builtins::{new_vm, register_builtins};
use bytecode_system::{BytecodeChunk, Opcode};
use core_types::{DictKind, ErrorKind, Value};
use interpreter::{CaptureOutput, Vm, VmConfig};

const NAMES: [&str; 30] = [
    "print", "range", "min", "max", "bind", "copy", "import", "len", "assert", "str", "float",
    "number", "int", "abs", "round", "istype", "chr", "ord", "bool", "save", "load", "fpack",
    "exec", "exists", "mtime", "merge", "getraw", "setmeta", "getmeta", "object",
];

fn vm() -> Vm {
    new_vm(VmConfig::default()).unwrap()
}

fn run(vm: &mut Vm, chunk: BytecodeChunk) -> Value {
    let code = vm.bytes(&chunk.finish().unwrap()).unwrap();
    let globals = vm.dict().unwrap();
    vm.exec(code, globals).unwrap()
}

#[test]
fn test_every_builtin_is_registered() {
    let mut vm = vm();
    for name in NAMES {
        assert!(vm.builtin(name).is_ok(), "missing builtin {}", name);
    }
    assert_eq!(vm.builtin("system").unwrap_err().kind, ErrorKind::KeyError);
}

#[test]
fn test_register_builtins_keeps_registry_links() {
    let mut vm = Vm::new(VmConfig::default()).unwrap();
    register_builtins(&mut vm).unwrap();
    assert_eq!(vm.builtin("MODULES").unwrap(), vm.modules());
    let (modules, key) = (vm.modules(), vm.string("BUILTINS").unwrap());
    assert_eq!(vm.get(modules, key).unwrap(), vm.builtins());
}

#[test]
fn test_object_builtin_is_object_kind() {
    let mut vm = vm();
    let object = vm.builtin("object").unwrap();
    assert_eq!(object.as_dict().unwrap().1, DictKind::Object);
}

#[test]
fn test_argv_is_visible_to_scripts() {
    let mut vm = vm();
    vm.set_argv(&["prog.tpc".to_string(), "-x".to_string()]).unwrap();

    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 2, 0, 0);
    chunk.string(0, "ARGV").unwrap();
    chunk.emit(Opcode::GGet, 0, 0, 0);
    chunk.emit(Opcode::Len, 1, 0, 0);
    chunk.emit(Opcode::Return, 1, 0, 0);
    assert_eq!(run(&mut vm, chunk), Value::Number(2.0));
}

#[test]
fn test_print_from_bytecode() {
    let mut vm = vm();
    let out = CaptureOutput::new();
    vm.set_output(Box::new(out.clone()));

    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 4, 0, 0);
    chunk.string(0, "print").unwrap();
    chunk.emit(Opcode::GGet, 0, 0, 0);
    chunk.string(1, "x").unwrap();
    chunk.number(2, 1.5);
    chunk.emit(Opcode::Params, 3, 1, 2);
    chunk.emit(Opcode::Call, 0, 0, 3);
    chunk.emit(Opcode::Return, 0, 0, 0);
    assert_eq!(run(&mut vm, chunk), Value::None);
    assert_eq!(out.contents(), "x 1.500000\n");
}

/// `A = {}; setmeta(A, object); A.__init__ = def(self, v): self.v = v`,
/// then `A(5).v`.
#[test]
fn test_class_defined_in_bytecode() {
    let mut vm = vm();

    let mut init = BytecodeChunk::new();
    init.emit(Opcode::Regs, 5, 0, 0);
    init.number(1, 0.0);
    init.emit(Opcode::Get, 1, 0, 1);
    init.number(2, 1.0);
    init.emit(Opcode::Get, 2, 0, 2);
    init.string(3, "v").unwrap();
    init.emit(Opcode::Set, 1, 3, 2);
    init.emit(Opcode::None, 4, 0, 0);
    init.emit(Opcode::Return, 4, 0, 0);

    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 8, 0, 0);
    chunk.emit(Opcode::Dict, 0, 0, 0);
    chunk.string(1, "object").unwrap();
    chunk.emit(Opcode::GGet, 1, 1, 0);
    chunk.string(2, "setmeta").unwrap();
    chunk.emit(Opcode::GGet, 2, 2, 0);
    chunk.emit(Opcode::Params, 3, 0, 2);
    chunk.emit(Opcode::Call, 2, 2, 3);
    chunk.def(4, init).unwrap();
    chunk.string(5, "__init__").unwrap();
    chunk.emit(Opcode::Set, 0, 5, 4);
    chunk.number(4, 5.0);
    chunk.emit(Opcode::Params, 5, 4, 1);
    chunk.emit(Opcode::Call, 6, 0, 5);
    chunk.string(7, "v").unwrap();
    chunk.emit(Opcode::Get, 6, 6, 7);
    chunk.emit(Opcode::Return, 6, 0, 0);

    assert_eq!(run(&mut vm, chunk), Value::Number(5.0));
}

#[test]
fn test_failed_assert_reaches_host() {
    let mut vm = vm();
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 3, 0, 0);
    chunk.string(0, "assert").unwrap();
    chunk.emit(Opcode::GGet, 0, 0, 0);
    chunk.number(1, 0.0);
    chunk.emit(Opcode::Params, 2, 1, 1);
    chunk.emit(Opcode::Call, 0, 0, 2);
    let code = vm.bytes(&chunk.finish().unwrap()).unwrap();
    let globals = vm.dict().unwrap();
    let err = vm.exec(code, globals).unwrap_err();
    assert_eq!(err.kind, ErrorKind::AssertionError);
}

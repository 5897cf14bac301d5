//! Builtins and Interpreter Integration Tests
//!
//! Builtin functions reached from bytecode through `GGET`.

use bytecode_system::{BytecodeChunk, Opcode};
use core_types::{ErrorKind, Value};
use integration_tests::{call_global, run, vm, vm_with};
use interpreter::VmConfig;

#[test]
fn test_number_parsing_builtins() {
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 8, 0, 0);
    chunk.string(0, "42").unwrap();
    call_global(&mut chunk, 1, "int", 0, 1);
    chunk.string(3, "2.5").unwrap();
    call_global(&mut chunk, 4, "float", 3, 1);
    chunk.emit(Opcode::Add, 6, 1, 4);
    chunk.emit(Opcode::Return, 6, 0, 0);

    let mut vm = vm();
    assert_eq!(run(&mut vm, chunk).unwrap(), Value::Number(44.5));
}

#[test]
fn test_str_of_max() {
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 8, 0, 0);
    chunk.number(0, 3.0);
    chunk.number(1, 7.0);
    chunk.number(2, -2.0);
    call_global(&mut chunk, 3, "max", 0, 3);
    call_global(&mut chunk, 5, "str", 3, 1);
    chunk.emit(Opcode::Return, 5, 0, 0);

    let mut vm = vm();
    let v = run(&mut vm, chunk).unwrap();
    assert_eq!(vm.text(v), "7");
}

#[test]
fn test_copy_len_and_istype() {
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 12, 0, 0);
    chunk.number(0, 1.0);
    chunk.number(1, 2.0);
    chunk.emit(Opcode::List, 2, 0, 2);
    call_global(&mut chunk, 3, "copy", 2, 1);
    chunk.emit(Opcode::None, 5, 0, 0);
    chunk.emit(Opcode::Set, 3, 5, 0);
    chunk.string(5, "list").unwrap();
    chunk.emit(Opcode::Move, 6, 3, 0);
    chunk.emit(Opcode::Move, 7, 5, 0);
    call_global(&mut chunk, 8, "istype", 6, 2);
    chunk.emit(Opcode::Len, 10, 2, 0);
    chunk.emit(Opcode::Len, 11, 3, 0);
    chunk.emit(Opcode::List, 9, 8, 4);
    chunk.emit(Opcode::Return, 9, 0, 0);

    let mut vm = vm();
    let v = run(&mut vm, chunk).unwrap();
    let items = vm.heap().list_items(v.as_list().unwrap()).unwrap().to_vec();
    // istype, (param list), len(original), len(copy)
    assert_eq!(items[0], Value::TRUE);
    assert_eq!(items[2], Value::Number(2.0));
    assert_eq!(items[3], Value::Number(3.0));
}

#[test]
fn test_save_load_exists_from_bytecode() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("note.txt").display().to_string();

    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 12, 0, 0);
    chunk.string(0, &file).unwrap();
    chunk.string(1, "saved text").unwrap();
    call_global(&mut chunk, 2, "save", 0, 2);
    call_global(&mut chunk, 4, "exists", 0, 1);
    call_global(&mut chunk, 6, "load", 0, 1);
    chunk.emit(Opcode::Eq, 8, 6, 1);
    chunk.emit(Opcode::Add, 9, 4, 8);
    chunk.emit(Opcode::Return, 9, 0, 0);

    let mut vm = vm();
    assert_eq!(run(&mut vm, chunk).unwrap(), Value::Number(2.0));
    assert_eq!(std::fs::read_to_string(dir.path().join("note.txt")).unwrap(), "saved text");
}

#[test]
fn test_exec_of_loaded_bytecode() {
    let dir = tempfile::tempdir().unwrap();
    let mut inner = BytecodeChunk::new();
    inner.emit(Opcode::Regs, 2, 0, 0);
    inner.string(0, "x").unwrap();
    inner.number(1, 11.0);
    inner.emit(Opcode::GSet, 0, 1, 0);
    inner.emit(Opcode::Return, 1, 0, 0);
    let path = dir.path().join("inner.tpc");
    std::fs::write(&path, inner.finish().unwrap()).unwrap();

    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 10, 0, 0);
    chunk.string(0, &path.display().to_string()).unwrap();
    call_global(&mut chunk, 1, "load", 0, 1);
    chunk.emit(Opcode::Dict, 2, 0, 0);
    call_global(&mut chunk, 3, "exec", 1, 2);
    chunk.string(5, "x").unwrap();
    chunk.emit(Opcode::Get, 6, 2, 5);
    chunk.emit(Opcode::Add, 7, 3, 6);
    chunk.emit(Opcode::Return, 7, 0, 0);

    let mut vm = vm();
    assert_eq!(run(&mut vm, chunk).unwrap(), Value::Number(22.0));
}

#[test]
fn test_import_builtin_uses_module_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut util = BytecodeChunk::new();
    util.emit(Opcode::Regs, 2, 0, 0);
    util.string(0, "value").unwrap();
    util.number(1, 5.0);
    util.emit(Opcode::GSet, 0, 1, 0);
    util.emit(Opcode::Eof, 0, 0, 0);
    std::fs::write(dir.path().join("util.tpc"), util.finish().unwrap()).unwrap();

    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 6, 0, 0);
    chunk.string(0, "util").unwrap();
    call_global(&mut chunk, 1, "import", 0, 1);
    chunk.string(3, "value").unwrap();
    chunk.emit(Opcode::Get, 4, 1, 3);
    chunk.emit(Opcode::Return, 4, 0, 0);

    let mut vm = vm_with(VmConfig::default().with_module_dir(dir.path()));
    assert_eq!(run(&mut vm, chunk).unwrap(), Value::Number(5.0));

    let modules = vm.modules();
    let key = vm.string("util").unwrap();
    assert!(vm.has(modules, key).unwrap());
}

#[test]
fn test_missing_module_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 4, 0, 0);
    chunk.string(0, "nowhere").unwrap();
    call_global(&mut chunk, 1, "import", 0, 1);
    chunk.emit(Opcode::Return, 1, 0, 0);

    let mut vm = vm_with(VmConfig::default().with_module_dir(dir.path()));
    assert_eq!(run(&mut vm, chunk).unwrap_err().kind, ErrorKind::IOError);
}

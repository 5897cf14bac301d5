//! Bytecode and Interpreter Integration Tests
//!
//! Programs assembled with `BytecodeChunk` and run by the VM with the
//! standard builtins installed.

use bytecode_system::{BytecodeChunk, Opcode};
use core_types::{ErrorKind, Value};
use integration_tests::{call_global, call_method, def_global, param, run, vm};

#[test]
fn test_recursive_fibonacci() {
    let mut body = BytecodeChunk::new();
    body.emit(Opcode::Regs, 8, 0, 0);
    param(&mut body, 1, 0);
    body.number(2, 2.0);
    body.emit(Opcode::Lt, 3, 1, 2);
    body.emit(Opcode::Ifn, 3, 0, 0);
    body.emit(Opcode::Return, 1, 0, 0);
    body.number(2, 1.0);
    body.emit(Opcode::Sub, 3, 1, 2);
    call_global(&mut body, 4, "fib", 3, 1);
    body.number(2, 2.0);
    body.emit(Opcode::Sub, 3, 1, 2);
    call_global(&mut body, 5, "fib", 3, 1);
    body.emit(Opcode::Add, 7, 4, 5);
    body.emit(Opcode::Return, 7, 0, 0);

    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 4, 0, 0);
    def_global(&mut chunk, 0, "fib", body);
    chunk.number(1, 15.0);
    call_global(&mut chunk, 2, "fib", 1, 1);
    chunk.emit(Opcode::Return, 2, 0, 0);

    let mut vm = vm();
    assert_eq!(run(&mut vm, chunk).unwrap(), Value::Number(610.0));
    assert_eq!(vm.depth(), 0);
}

#[test]
fn test_iter_over_range_sums() {
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 8, 0, 0);
    chunk.number(1, 10.0);
    call_global(&mut chunk, 2, "range", 1, 1);
    chunk.number(4, 0.0);
    chunk.number(5, 0.0);
    let (top, end) = (chunk.label(), chunk.label());
    chunk.bind(top).unwrap();
    chunk.emit(Opcode::Iter, 6, 2, 4);
    chunk.jump(end);
    chunk.emit(Opcode::Add, 5, 5, 6);
    chunk.jump(top);
    chunk.bind(end).unwrap();
    chunk.emit(Opcode::Return, 5, 0, 0);

    let mut vm = vm();
    assert_eq!(run(&mut vm, chunk).unwrap(), Value::Number(45.0));
}

/// `Derived(name).hello()` where `hello` and `greeting` live on `Base`.
#[test]
fn test_class_hierarchy_with_inherited_method() {
    let mut hello = BytecodeChunk::new();
    hello.emit(Opcode::Regs, 6, 0, 0);
    param(&mut hello, 1, 0);
    hello.string(2, "greeting").unwrap();
    hello.emit(Opcode::Get, 3, 1, 2);
    hello.string(2, "name").unwrap();
    hello.emit(Opcode::Get, 4, 1, 2);
    hello.string(5, " ").unwrap();
    hello.emit(Opcode::Add, 3, 3, 5);
    hello.emit(Opcode::Add, 3, 3, 4);
    hello.emit(Opcode::Return, 3, 0, 0);

    let mut init = BytecodeChunk::new();
    init.emit(Opcode::Regs, 5, 0, 0);
    param(&mut init, 1, 0);
    param(&mut init, 2, 1);
    init.string(3, "name").unwrap();
    init.emit(Opcode::Set, 1, 3, 2);
    init.emit(Opcode::None, 4, 0, 0);
    init.emit(Opcode::Return, 4, 0, 0);

    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 12, 0, 0);
    // Base, a subclass of object
    chunk.emit(Opcode::Dict, 0, 0, 0);
    chunk.string(1, "object").unwrap();
    chunk.emit(Opcode::GGet, 1, 1, 0);
    call_global(&mut chunk, 2, "setmeta", 0, 2);
    chunk.def(4, hello).unwrap();
    chunk.string(5, "hello").unwrap();
    chunk.emit(Opcode::Set, 0, 5, 4);
    chunk.string(4, "hi").unwrap();
    chunk.string(5, "greeting").unwrap();
    chunk.emit(Opcode::Set, 0, 5, 4);
    // Derived, a subclass of Base
    chunk.emit(Opcode::Dict, 1, 0, 0);
    chunk.emit(Opcode::Move, 6, 1, 0);
    chunk.emit(Opcode::Move, 7, 0, 0);
    call_global(&mut chunk, 8, "setmeta", 6, 2);
    chunk.def(4, init).unwrap();
    chunk.string(5, "__init__").unwrap();
    chunk.emit(Opcode::Set, 1, 5, 4);
    // Derived("tern").hello()
    chunk.string(6, "tern").unwrap();
    chunk.emit(Opcode::Params, 7, 6, 1);
    chunk.emit(Opcode::Call, 8, 1, 7);
    call_method(&mut chunk, 9, 8, "hello", 0, 0);
    chunk.emit(Opcode::Return, 9, 0, 0);

    let mut vm = vm();
    let v = run(&mut vm, chunk).unwrap();
    assert_eq!(vm.text(v), "hi tern");
}

#[test]
fn test_string_methods_from_bytecode() {
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 12, 0, 0);
    chunk.string(0, "a,b,c").unwrap();
    chunk.string(1, ",").unwrap();
    call_method(&mut chunk, 2, 0, "split", 1, 1);
    chunk.string(4, "-").unwrap();
    call_method(&mut chunk, 5, 4, "join", 2, 1);
    chunk.string(7, "b").unwrap();
    chunk.string(8, "B").unwrap();
    call_method(&mut chunk, 9, 5, "replace", 7, 2);
    chunk.emit(Opcode::Return, 9, 0, 0);

    let mut vm = vm();
    let v = run(&mut vm, chunk).unwrap();
    assert_eq!(vm.text(v), "a-B-c");
}

#[test]
fn test_builtin_error_caught_as_string() {
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 4, 0, 0);
    let catch = chunk.label();
    chunk.setjmp(catch);
    chunk.string(0, "ab").unwrap();
    call_global(&mut chunk, 1, "ord", 0, 1);
    chunk.emit(Opcode::Return, 1, 0, 0);
    chunk.bind(catch).unwrap();
    chunk.number(3, -1.0);
    chunk.emit(Opcode::Return, 3, 0, 0);

    let mut vm = vm();
    assert_eq!(run(&mut vm, chunk).unwrap(), Value::Number(-1.0));
    assert_eq!(
        vm.text(vm.exception()),
        "TypeError: ord() expected a character"
    );
}

/// The innermost frame's handler wins over one installed further out.
#[test]
fn test_nearest_handler_wins() {
    let mut thrower = BytecodeChunk::new();
    thrower.emit(Opcode::Regs, 1, 0, 0);
    thrower.string(0, "inner").unwrap();
    thrower.emit(Opcode::Raise, 0, 0, 0);

    let mut middle = BytecodeChunk::new();
    middle.emit(Opcode::Regs, 4, 0, 0);
    let catch = middle.label();
    middle.setjmp(catch);
    call_global(&mut middle, 1, "thrower", 3, 0);
    middle.emit(Opcode::Return, 1, 0, 0);
    middle.bind(catch).unwrap();
    middle.string(1, "middle caught").unwrap();
    middle.emit(Opcode::Return, 1, 0, 0);

    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 6, 0, 0);
    def_global(&mut chunk, 0, "thrower", thrower);
    def_global(&mut chunk, 0, "middle", middle);
    let outer = chunk.label();
    chunk.setjmp(outer);
    call_global(&mut chunk, 2, "middle", 5, 0);
    chunk.emit(Opcode::Return, 2, 0, 0);
    chunk.bind(outer).unwrap();
    chunk.string(2, "outer caught").unwrap();
    chunk.emit(Opcode::Return, 2, 0, 0);

    let mut vm = vm();
    let v = run(&mut vm, chunk).unwrap();
    assert_eq!(vm.text(v), "middle caught");
}

#[test]
fn test_uncaught_builtin_error_reaches_host() {
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 4, 0, 0);
    chunk.line(1, "x = [][0]").unwrap();
    chunk.emit(Opcode::List, 0, 0, 0);
    chunk.number(1, 0.0);
    chunk.emit(Opcode::Get, 2, 0, 1);

    let mut vm = vm();
    let err = run(&mut vm, chunk).unwrap_err();
    assert_eq!(err.kind, ErrorKind::IndexError);
    assert_eq!(err.stack.len(), 1);
    assert_eq!(err.stack[0].text, "x = [][0]");
}

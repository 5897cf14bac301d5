//! Unit tests for VmError

use core_types::{ErrorKind, StackFrame, VmError};

#[test]
fn test_shorthand_constructors() {
    assert_eq!(VmError::type_error("x").kind, ErrorKind::TypeError);
    assert_eq!(VmError::key_error("x").kind, ErrorKind::KeyError);
    assert_eq!(VmError::index_error("x").kind, ErrorKind::IndexError);
    assert_eq!(VmError::value_error("x").kind, ErrorKind::ValueError);
    assert_eq!(VmError::runtime_error("x").kind, ErrorKind::RuntimeError);
    assert_eq!(VmError::io_error("x").kind, ErrorKind::IOError);
}

#[test]
fn test_traceback_without_frames() {
    let error = VmError::new(ErrorKind::AssertionError, "assert failed");
    assert_eq!(
        error.traceback(),
        "\nException:\nAssertionError: assert failed\n"
    );
}

#[test]
fn test_with_stack_replaces_frames() {
    let error = VmError::runtime_error("boom").with_stack(vec![StackFrame::default()]);
    assert_eq!(error.stack.len(), 1);
}

#[test]
fn test_error_is_std_error() {
    fn takes(_: &dyn std::error::Error) {}
    takes(&VmError::value_error("substring not found"));
}

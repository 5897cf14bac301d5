//! Unit tests for StackFrame

use core_types::StackFrame;

#[test]
fn test_stack_frame_fields() {
    let frame = StackFrame {
        file: "lib.py".into(),
        name: "helper".into(),
        line: 40,
        text: "return 1".into(),
    };
    assert_eq!(frame.line, 40);
    assert_eq!(frame.name, "helper");
}

#[test]
fn test_stack_frame_clone_eq() {
    let frame = StackFrame {
        file: "a".into(),
        ..Default::default()
    };
    assert_eq!(frame.clone(), frame);
}

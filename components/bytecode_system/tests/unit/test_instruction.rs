//! Tests for instruction words

use bytecode_system::{Instruction, Opcode, WORD};

#[test]
fn test_word_size() {
    assert_eq!(WORD, 4);
}

#[test]
fn test_operand_layout() {
    let inst = Instruction::new(Opcode::Call, 3, 4, 5);
    assert_eq!(inst.encode(), [Opcode::Call as u8, 3, 4, 5]);
    assert_eq!(inst.op(), Ok(Opcode::Call));
}

#[test]
fn test_ubc_is_big_endian_pair() {
    let inst = Instruction::decode([Opcode::String as u8, 0, 0x12, 0x34]);
    assert_eq!(inst.ubc(), 0x1234);
}

#[test]
fn test_sbc_negative() {
    let inst = Instruction::decode([Opcode::Jump as u8, 0, 0xff, 0xff]);
    assert_eq!(inst.sbc(), -1);
    assert_eq!(Instruction::with_sbc(Opcode::Jump, 0, -1), inst);
}

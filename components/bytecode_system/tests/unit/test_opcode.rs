//! Tests for the opcode table

use bytecode_system::Opcode;

#[test]
fn test_opcode_count() {
    assert_eq!(Opcode::ALL.len(), 49);
}

#[test]
fn test_opcode_numbers_match_format() {
    let expected = [
        (Opcode::Eof, 0),
        (Opcode::Add, 1),
        (Opcode::Cmp, 8),
        (Opcode::Number, 11),
        (Opcode::String, 12),
        (Opcode::Def, 16),
        (Opcode::Jump, 18),
        (Opcode::Return, 20),
        (Opcode::Line, 30),
        (Opcode::Params, 31),
        (Opcode::Raise, 37),
        (Opcode::Mod, 39),
        (Opcode::Iter, 42),
        (Opcode::Regs, 44),
        (Opcode::Ifn, 46),
        (Opcode::BitNot, 48),
    ];
    for (op, byte) in expected {
        assert_eq!(op as u8, byte, "{}", op);
    }
}

#[test]
fn test_mnemonics_unique() {
    let mut names: Vec<&str> = Opcode::ALL.iter().map(|op| op.mnemonic()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), Opcode::ALL.len());
}

#[test]
fn test_try_from_rejects_out_of_range() {
    for byte in 49..=255u8 {
        assert!(Opcode::try_from(byte).is_err());
    }
}

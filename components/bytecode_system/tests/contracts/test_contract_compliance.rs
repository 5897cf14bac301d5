//! Contract compliance tests for bytecode_system
//! Verifies the `.tpc` layout the interpreter relies on

use bytecode_system::{disassemble, BytecodeChunk, Instruction, Opcode, WORD};

/// Contract: NUMBER occupies three words with the f64 little-endian
#[test]
fn test_contract_number_layout() {
    let mut chunk = BytecodeChunk::new();
    chunk.number(0, -2.25);
    let code = chunk.finish().unwrap();
    assert_eq!(code.len(), 3 * WORD);
    let mut le = [0u8; 8];
    le.copy_from_slice(&code[4..12]);
    assert_eq!(f64::from_le_bytes(le), -2.25);
}

/// Contract: STRING payload is len / 4 + 1 words
#[test]
fn test_contract_string_layout() {
    for len in 0..12usize {
        let mut chunk = BytecodeChunk::new();
        chunk.string(0, vec![b'a'; len]).unwrap();
        assert_eq!(chunk.word_len(), 1 + len / WORD + 1);
    }
}

/// Contract: LINE text is a * 4 - 1 bytes and NUL padded
#[test]
fn test_contract_line_layout() {
    let mut chunk = BytecodeChunk::new();
    chunk.line(12, "abc").unwrap();
    let code = chunk.finish().unwrap();
    let inst = Instruction::decode([code[0], code[1], code[2], code[3]]);
    assert_eq!(inst.op(), Ok(Opcode::Line));
    assert_eq!(inst.a, 1);
    assert_eq!(&code[4..8], b"abc\0");
}

/// Contract: DEF immediate counts the DEF word plus its body
#[test]
fn test_contract_def_layout() {
    let mut body = BytecodeChunk::new();
    body.number(0, 1.0);
    body.emit(Opcode::Return, 0, 0, 0);
    let mut chunk = BytecodeChunk::new();
    chunk.def(2, body).unwrap();
    let code = chunk.finish().unwrap();
    let inst = Instruction::decode([code[0], code[1], code[2], code[3]]);
    assert_eq!(inst.sbc(), 5);
    assert_eq!(code.len(), 5 * WORD);
}

/// Contract: the disassembler walks inline payloads
#[test]
fn test_contract_disassembler() {
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::Regs, 4, 0, 0);
    chunk.number(1, 10.0);
    chunk.string(2, "x").unwrap();
    chunk.emit(Opcode::GSet, 2, 1, 0);
    chunk.emit(Opcode::Eof, 0, 0, 0);
    let listing = disassemble(&chunk.finish().unwrap()).unwrap();
    assert_eq!(
        listing,
        "0000 REGS 4\n0001 NUMBER 1 10\n0004 STRING 2 \"x\"\n0006 GSET 2 1 0\n0007 EOF 0 0 0\n"
    );
}

//! Human-readable listing of `.tpc` code
//!
//! One line per instruction: word offset, mnemonic, operands. Inline
//! payloads are decoded in place; function bodies follow their `DEF`.

use crate::error::BytecodeError;
use crate::instruction::{Instruction, WORD};
use crate::opcode::Opcode;
use std::fmt::Write;

fn word_at(code: &[u8], word: usize) -> Option<[u8; WORD]> {
    let at = word * WORD;
    code.get(at..at + WORD)?.try_into().ok()
}

fn payload(code: &[u8], word: usize, len: usize) -> Result<&[u8], BytecodeError> {
    let at = (word + 1) * WORD;
    code.get(at..at + len).ok_or(BytecodeError::Truncated(word))
}

fn quoted(bytes: &[u8]) -> String {
    format!("{:?}", String::from_utf8_lossy(bytes))
}

/// Disassemble `code` into a listing
///
/// # Example
///
/// ```
/// use bytecode_system::{disassemble, BytecodeChunk, Opcode};
///
/// let mut chunk = BytecodeChunk::new();
/// chunk.number(0, 2.0);
/// chunk.emit(Opcode::Return, 0, 0, 0);
/// let listing = disassemble(&chunk.finish().unwrap()).unwrap();
/// assert!(listing.contains("NUMBER 0 2"));
/// ```
pub fn disassemble(code: &[u8]) -> Result<String, BytecodeError> {
    let mut out = String::new();
    let mut word = 0;
    while let Some(bytes) = word_at(code, word) {
        let inst = Instruction::decode(bytes);
        let _ = write!(out, "{:04} ", word);
        let op = match inst.op() {
            Ok(op) => op,
            Err(byte) => {
                let _ = writeln!(out, "INVALID {}", byte);
                word += 1;
                continue;
            }
        };
        let mut next = word + 1;
        let _ = match op {
            Opcode::Number => {
                let raw = payload(code, word, 8)?;
                let mut le = [0u8; 8];
                le.copy_from_slice(raw);
                next = word + 3;
                writeln!(out, "NUMBER {} {}", inst.a, f64::from_le_bytes(le))
            }
            Opcode::String => {
                let len = inst.ubc() as usize;
                let text = payload(code, word, len)?;
                next = word + len / WORD + 2;
                writeln!(out, "STRING {} {}", inst.a, quoted(text))
            }
            Opcode::Line => {
                let len = (inst.a as usize * WORD).saturating_sub(1);
                let raw = payload(code, word, len)?;
                let text = raw.split(|b| *b == 0).next().unwrap_or_default();
                next = word + inst.a as usize + 1;
                writeln!(out, "LINE {} {}", inst.ubc(), quoted(text))
            }
            Opcode::Def => writeln!(out, "DEF {} {} words", inst.a, inst.sbc() as i32 - 1),
            Opcode::SetJmp if inst.sbc() == 0 => writeln!(out, "SETJMP off"),
            Opcode::Jump | Opcode::SetJmp => writeln!(
                out,
                "{} -> {:04}",
                op,
                word as i64 + inst.sbc() as i64
            ),
            Opcode::Regs => writeln!(out, "REGS {}", inst.a),
            _ => writeln!(out, "{} {} {} {}", op, inst.a, inst.b, inst.c),
        };
        word = next;
    }
    if code.len() % WORD != 0 {
        return Err(BytecodeError::Truncated(word));
    }
    Ok(out)
}

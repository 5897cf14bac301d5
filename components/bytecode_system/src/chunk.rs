//! Bytecode chunk - an assembler for `.tpc` code
//!
//! Instructions are appended as 4-byte words. Numbers, strings, line text
//! and function bodies are stored inline after the instruction that uses
//! them. Jumps and handlers are emitted against labels and patched when
//! the chunk is finished.

use crate::error::BytecodeError;
use crate::instruction::{Instruction, WORD};
use crate::opcode::Opcode;

/// A jump target inside a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(usize);

#[derive(Debug, Clone, Copy)]
struct Fixup {
    at: usize,
    op: Opcode,
    label: Label,
}

/// A growable buffer of bytecode words
#[derive(Debug, Clone, Default)]
pub struct BytecodeChunk {
    code: Vec<u8>,
    labels: Vec<Option<usize>>,
    fixups: Vec<Fixup>,
}

impl BytecodeChunk {
    /// Create a new empty bytecode chunk
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of words emitted so far
    pub fn word_len(&self) -> usize {
        self.code.len() / WORD
    }

    /// Whether nothing has been emitted
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Emit an instruction
    pub fn emit(&mut self, op: Opcode, a: u8, b: u8, c: u8) {
        self.emit_instruction(Instruction::new(op, a, b, c));
    }

    /// Emit an already built instruction
    pub fn emit_instruction(&mut self, inst: Instruction) {
        self.code.extend_from_slice(&inst.encode());
    }

    fn pad_payload(&mut self, bytes: &[u8]) {
        let words = bytes.len() / WORD + 1;
        self.code.extend_from_slice(bytes);
        self.code.resize(self.code.len() + words * WORD - bytes.len(), 0);
    }

    /// `NUMBER a` followed by the little-endian f64
    pub fn number(&mut self, a: u8, n: f64) {
        self.emit(Opcode::Number, a, 0, 0);
        self.code.extend_from_slice(&n.to_le_bytes());
    }

    /// `STRING a` followed by the bytes, zero padded to a whole word
    pub fn string(&mut self, a: u8, bytes: impl AsRef<[u8]>) -> Result<(), BytecodeError> {
        let bytes = bytes.as_ref();
        let len = u16::try_from(bytes.len())
            .map_err(|_| BytecodeError::StringTooLong(bytes.len()))?;
        self.emit_instruction(Instruction::with_ubc(Opcode::String, a, len));
        self.pad_payload(bytes);
        Ok(())
    }

    /// `LINE` recording `lineno` and its source text
    pub fn line(&mut self, lineno: u16, text: &str) -> Result<(), BytecodeError> {
        let words = u8::try_from(text.len() / WORD + 1)
            .map_err(|_| BytecodeError::LineTooLong(text.len()))?;
        self.emit_instruction(Instruction::with_ubc(Opcode::Line, words, lineno));
        self.pad_payload(text.as_bytes());
        Ok(())
    }

    /// `DEF a` followed by `body` inline
    ///
    /// The body's own labels are resolved first; its jumps are relative
    /// and stay valid once embedded.
    pub fn def(&mut self, a: u8, body: BytecodeChunk) -> Result<(), BytecodeError> {
        let body = body.finish()?;
        let words = body.len() / WORD;
        let skip = i16::try_from(words + 1).map_err(|_| BytecodeError::BodyTooLong(words))?;
        self.emit_instruction(Instruction::with_sbc(Opcode::Def, a, skip));
        self.code.extend_from_slice(&body);
        Ok(())
    }

    /// Allocate an unbound label
    pub fn label(&mut self) -> Label {
        self.labels.push(None);
        Label(self.labels.len() - 1)
    }

    /// Bind `label` to the next emitted word
    pub fn bind(&mut self, label: Label) -> Result<(), BytecodeError> {
        let slot = &mut self.labels[label.0];
        if slot.is_some() {
            return Err(BytecodeError::LabelRebound(label.0));
        }
        *slot = Some(self.code.len() / WORD);
        Ok(())
    }

    fn emit_to(&mut self, op: Opcode, label: Label) {
        self.fixups.push(Fixup {
            at: self.word_len(),
            op,
            label,
        });
        self.emit(op, 0, 0, 0);
    }

    /// `JUMP` to `label`
    pub fn jump(&mut self, label: Label) {
        self.emit_to(Opcode::Jump, label);
    }

    /// `SETJMP` installing a handler at `label`
    pub fn setjmp(&mut self, label: Label) {
        self.emit_to(Opcode::SetJmp, label);
    }

    /// `SETJMP 0`, clearing the frame's handler
    pub fn clear_handler(&mut self) {
        self.emit(Opcode::SetJmp, 0, 0, 0);
    }

    /// Resolve every label and return the encoded bytes
    pub fn finish(mut self) -> Result<Vec<u8>, BytecodeError> {
        for fixup in std::mem::take(&mut self.fixups) {
            let target = self.labels[fixup.label.0]
                .ok_or(BytecodeError::UnboundLabel(fixup.label.0))?;
            let distance = target as i64 - fixup.at as i64;
            let sbc =
                i16::try_from(distance).map_err(|_| BytecodeError::JumpOutOfRange(distance))?;
            let at = fixup.at * WORD;
            let patched = Instruction::with_sbc(fixup.op, 0, sbc);
            self.code[at..at + WORD].copy_from_slice(&patched.encode());
        }
        Ok(self.code)
    }
}

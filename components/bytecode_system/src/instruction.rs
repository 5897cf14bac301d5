//! Bytecode instruction words
//!
//! An instruction is four bytes: opcode, then operands `a`, `b`, `c`.
//! `b` and `c` also combine into a 16-bit immediate.

use crate::opcode::Opcode;

/// Size of one instruction word in bytes.
pub const WORD: usize = 4;

/// A single decoded instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Raw opcode byte; may not name a valid [`Opcode`]
    pub opcode: u8,
    /// First operand
    pub a: u8,
    /// Second operand
    pub b: u8,
    /// Third operand
    pub c: u8,
}

impl Instruction {
    /// Create a new instruction
    pub fn new(opcode: Opcode, a: u8, b: u8, c: u8) -> Self {
        Self {
            opcode: opcode as u8,
            a,
            b,
            c,
        }
    }

    /// Create an instruction whose `b`,`c` hold an unsigned immediate
    pub fn with_ubc(opcode: Opcode, a: u8, value: u16) -> Self {
        let [b, c] = value.to_be_bytes();
        Self::new(opcode, a, b, c)
    }

    /// Create an instruction whose `b`,`c` hold a signed immediate
    pub fn with_sbc(opcode: Opcode, a: u8, value: i16) -> Self {
        Self::with_ubc(opcode, a, value as u16)
    }

    /// Decode a word
    pub fn decode(word: [u8; WORD]) -> Self {
        Self {
            opcode: word[0],
            a: word[1],
            b: word[2],
            c: word[3],
        }
    }

    /// Encode to a word
    pub fn encode(&self) -> [u8; WORD] {
        [self.opcode, self.a, self.b, self.c]
    }

    /// The opcode, or the raw byte if it names none
    pub fn op(&self) -> Result<Opcode, u8> {
        Opcode::try_from(self.opcode)
    }

    /// `(b << 8) | c`
    pub fn ubc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    /// `ubc` reinterpreted as signed
    pub fn sbc(&self) -> i16 {
        self.ubc() as i16
    }
}

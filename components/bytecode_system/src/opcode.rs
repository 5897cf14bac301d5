//! Bytecode opcodes
//!
//! The numbering is part of the `.tpc` format and must not change.

use std::fmt;

/// Bytecode opcodes for the register VM.
///
/// Operands are the `a`, `b`, `c` bytes of the instruction word; `R[x]`
/// is register `x` of the current frame's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Return None from the current frame
    Eof = 0,
    /// `R[a] = R[b] + R[c]`
    Add,
    /// `R[a] = R[b] - R[c]`
    Sub,
    /// `R[a] = R[b] * R[c]`
    Mul,
    /// `R[a] = R[b] / R[c]`
    Div,
    /// `R[a] = R[b] ** R[c]`
    Pow,
    /// `R[a] = R[b] & R[c]`
    BitAnd,
    /// `R[a] = R[b] | R[c]`
    BitOr,
    /// `R[a] = cmp(R[b], R[c])` as -1, 0 or 1
    Cmp,
    /// `R[a] = R[b][R[c]]`
    Get,
    /// `R[a][R[b]] = R[c]`
    Set,
    /// `R[a]` = the f64 in the next two words
    Number,
    /// `R[a]` = the `ubc` bytes following the instruction
    String,
    /// `R[a]` = global or builtin named `R[b]`
    GGet,
    /// Global named `R[a]` = `R[b]`
    GSet,
    /// `R[a] = R[b]`
    Move,
    /// `R[a]` = function over the next `sbc - 1` words
    Def,
    /// No operation
    Pass,
    /// Jump `sbc` words
    Jump,
    /// `R[a] = R[b](R[c])`
    Call,
    /// Return `R[a]`
    Return,
    /// Skip the next instruction if `R[a]` is truthy
    If,
    /// Print `R[a]`
    Debug,
    /// `R[a] = R[b] == R[c]`
    Eq,
    /// `R[a] = R[b] <= R[c]`
    Le,
    /// `R[a] = R[b] < R[c]`
    Lt,
    /// `R[a]` = dict of `c / 2` pairs starting at `R[b]`
    Dict,
    /// `R[a]` = list of `c` registers starting at `R[b]`
    List,
    /// `R[a] = None`
    None,
    /// `R[a] = len(R[b])`
    Len,
    /// Record source line `ubc` with `a` words of text
    Line,
    /// `R[a]` = parameter list of `c` registers starting at `R[b]`
    Params,
    /// `R[a] = R[b][R[c]]` if present, else unchanged
    IGet,
    /// Record file name `R[a]`
    File,
    /// Record function name `R[a]`
    Name,
    /// `R[a] = R[b] != R[c]`
    Ne,
    /// `R[a]` = whether `R[c]` is in `R[b]`
    Has,
    /// Raise `R[a]`
    Raise,
    /// Install a handler `sbc` words away, or clear it when 0
    SetJmp,
    /// `R[a] = R[b] % R[c]`
    Mod,
    /// `R[a] = R[b] << R[c]`
    Lsh,
    /// `R[a] = R[b] >> R[c]`
    Rsh,
    /// Iterate `R[b]` with cursor `R[c]` into `R[a]`, skipping the next instruction while items remain
    Iter,
    /// `del R[a][R[b]]`
    Del,
    /// Declare `a` registers
    Regs,
    /// `R[a] = R[b] ^ R[c]`
    BitXor,
    /// Skip the next instruction if `R[a]` is falsy
    Ifn,
    /// `R[a] = not R[b]`
    Not,
    /// `R[a] = ~R[b]`
    BitNot,
}

impl Opcode {
    /// Every opcode in numbering order.
    pub const ALL: [Opcode; 49] = [
        Opcode::Eof,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Pow,
        Opcode::BitAnd,
        Opcode::BitOr,
        Opcode::Cmp,
        Opcode::Get,
        Opcode::Set,
        Opcode::Number,
        Opcode::String,
        Opcode::GGet,
        Opcode::GSet,
        Opcode::Move,
        Opcode::Def,
        Opcode::Pass,
        Opcode::Jump,
        Opcode::Call,
        Opcode::Return,
        Opcode::If,
        Opcode::Debug,
        Opcode::Eq,
        Opcode::Le,
        Opcode::Lt,
        Opcode::Dict,
        Opcode::List,
        Opcode::None,
        Opcode::Len,
        Opcode::Line,
        Opcode::Params,
        Opcode::IGet,
        Opcode::File,
        Opcode::Name,
        Opcode::Ne,
        Opcode::Has,
        Opcode::Raise,
        Opcode::SetJmp,
        Opcode::Mod,
        Opcode::Lsh,
        Opcode::Rsh,
        Opcode::Iter,
        Opcode::Del,
        Opcode::Regs,
        Opcode::BitXor,
        Opcode::Ifn,
        Opcode::Not,
        Opcode::BitNot,
    ];

    /// Upper-case mnemonic used by the disassembler.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Eof => "EOF",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Pow => "POW",
            Opcode::BitAnd => "BITAND",
            Opcode::BitOr => "BITOR",
            Opcode::Cmp => "CMP",
            Opcode::Get => "GET",
            Opcode::Set => "SET",
            Opcode::Number => "NUMBER",
            Opcode::String => "STRING",
            Opcode::GGet => "GGET",
            Opcode::GSet => "GSET",
            Opcode::Move => "MOVE",
            Opcode::Def => "DEF",
            Opcode::Pass => "PASS",
            Opcode::Jump => "JUMP",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::If => "IF",
            Opcode::Debug => "DEBUG",
            Opcode::Eq => "EQ",
            Opcode::Le => "LE",
            Opcode::Lt => "LT",
            Opcode::Dict => "DICT",
            Opcode::List => "LIST",
            Opcode::None => "NONE",
            Opcode::Len => "LEN",
            Opcode::Line => "LINE",
            Opcode::Params => "PARAMS",
            Opcode::IGet => "IGET",
            Opcode::File => "FILE",
            Opcode::Name => "NAME",
            Opcode::Ne => "NE",
            Opcode::Has => "HAS",
            Opcode::Raise => "RAISE",
            Opcode::SetJmp => "SETJMP",
            Opcode::Mod => "MOD",
            Opcode::Lsh => "LSH",
            Opcode::Rsh => "RSH",
            Opcode::Iter => "ITER",
            Opcode::Del => "DEL",
            Opcode::Regs => "REGS",
            Opcode::BitXor => "BITXOR",
            Opcode::Ifn => "IFN",
            Opcode::Not => "NOT",
            Opcode::BitNot => "BITNOT",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Opcode::ALL.get(byte as usize).copied().ok_or(byte)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

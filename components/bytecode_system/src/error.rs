//! Assembler and disassembler errors

use thiserror::Error;

/// Errors raised while assembling or decoding bytecode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BytecodeError {
    /// A jump or handler refers to a label that was never bound
    #[error("label {0} is never bound")]
    UnboundLabel(usize),
    /// A label was bound twice
    #[error("label {0} is bound twice")]
    LabelRebound(usize),
    /// A jump distance does not fit in a signed 16-bit immediate
    #[error("jump of {0} words is out of range")]
    JumpOutOfRange(i64),
    /// A string constant is longer than 65535 bytes
    #[error("string constant of {0} bytes is too long")]
    StringTooLong(usize),
    /// Line text does not fit in 255 words
    #[error("line text of {0} bytes is too long")]
    LineTooLong(usize),
    /// A function body does not fit in a signed 16-bit word count
    #[error("function body of {0} words is too long")]
    BodyTooLong(usize),
    /// An inline payload runs past the end of the code
    #[error("truncated instruction at word {0}")]
    Truncated(usize),
}

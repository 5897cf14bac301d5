//! Bytecode system for the Tern VM
//!
//! This crate defines the `.tpc` instruction format shared by the
//! interpreter and the tools that produce or inspect code.
//!
//! # Features
//!
//! - Fixed u8 opcode numbering with 4-byte instruction words
//! - An assembler with inline numbers, strings, line records and function bodies
//! - Label-based jumps and exception handlers
//! - A disassembler for listings
//!
//! # Example
//!
//! ```
//! use bytecode_system::{BytecodeChunk, Opcode};
//!
//! let mut chunk = BytecodeChunk::new();
//! chunk.number(0, 42.0);
//! chunk.emit(Opcode::Return, 0, 0, 0);
//! chunk.emit(Opcode::Eof, 0, 0, 0);
//!
//! let code = chunk.finish().unwrap();
//! assert_eq!(code.len(), 20);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod disasm;
pub mod error;
pub mod instruction;
pub mod opcode;

// Re-export main types at crate root
pub use chunk::{BytecodeChunk, Label};
pub use disasm::disassemble;
pub use error::BytecodeError;
pub use instruction::{Instruction, WORD};
pub use opcode::Opcode;

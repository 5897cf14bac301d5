//! VM error types.
//!
//! Every fallible runtime operation returns [`VmResult`]. Errors raised by
//! the interpreter loop carry the traceback captured when no frame had a
//! pending handler.

use crate::StackFrame;
use std::fmt;

/// The kind of a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Operand tag mismatch, uncallable object, unsupported operator, invalid opcode
    TypeError,
    /// Missing dict key or attribute
    KeyError,
    /// List index out of bounds
    IndexError,
    /// Search with no match, bad conversion
    ValueError,
    /// Collector or iteration invariant, lookup depth, stack exhaustion, invalid bytecode
    RuntimeError,
    /// File open or stat failure
    IOError,
    /// Failed user assertion
    AssertionError,
    /// A user value passed to RAISE
    Exception,
}

impl ErrorKind {
    /// The kind's name as shown in messages.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::KeyError => "KeyError",
            ErrorKind::IndexError => "IndexError",
            ErrorKind::ValueError => "ValueError",
            ErrorKind::RuntimeError => "RuntimeError",
            ErrorKind::IOError => "IOError",
            ErrorKind::AssertionError => "AssertionError",
            ErrorKind::Exception => "Exception",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime error with message and traceback.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, VmError};
///
/// let error = VmError::key_error("foo");
/// assert_eq!(error.kind, ErrorKind::KeyError);
/// assert_eq!(error.to_string(), "KeyError: foo");
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct VmError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Frames active when the error escaped all handlers, outermost first
    pub stack: Vec<StackFrame>,
}

/// Result alias used across the runtime.
pub type VmResult<T> = Result<T, VmError>;

impl VmError {
    /// Creates an error without a traceback.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        VmError {
            kind,
            message: message.into(),
            stack: Vec::new(),
        }
    }

    /// Shorthand for a `TypeError`.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    /// Shorthand for a `KeyError`.
    pub fn key_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyError, message)
    }

    /// Shorthand for an `IndexError`.
    pub fn index_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IndexError, message)
    }

    /// Shorthand for a `ValueError`.
    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValueError, message)
    }

    /// Shorthand for a `RuntimeError`.
    pub fn runtime_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RuntimeError, message)
    }

    /// Shorthand for an `IOError`.
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IOError, message)
    }

    /// Attaches a traceback.
    pub fn with_stack(mut self, stack: Vec<StackFrame>) -> Self {
        self.stack = stack;
        self
    }

    /// Renders the traceback report printed for unhandled errors.
    ///
    /// Frames come first, outermost to innermost, then the exception text.
    pub fn traceback(&self) -> String {
        let mut out = String::new();
        for frame in &self.stack {
            out.push_str(&frame.to_string());
            out.push('\n');
        }
        out.push_str("\nException:\n");
        out.push_str(&self.to_string());
        out.push('\n');
        out
    }
}

impl From<std::io::Error> for VmError {
    fn from(err: std::io::Error) -> Self {
        VmError::io_error(err.to_string())
    }
}

//! Traceback frames.
//!
//! A [`StackFrame`] is a snapshot of one call frame's diagnostic fields,
//! captured when an error escapes every handler.

use std::fmt;

/// One entry of a traceback.
///
/// # Examples
///
/// ```
/// use core_types::StackFrame;
///
/// let frame = StackFrame {
///     file: "main.py".to_string(),
///     name: "__main__".to_string(),
///     line: 3,
///     text: "x = a[1]".to_string(),
/// };
///
/// assert_eq!(frame.to_string(), "File \"main.py\", line 3, in __main__\n  x = a[1]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackFrame {
    /// Source file recorded by the FILE instruction
    pub file: String,
    /// Function name recorded by the NAME instruction
    pub name: String,
    /// Line number of the last LINE instruction
    pub line: u32,
    /// Source text of that line
    pub text: String,
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File \"{}\", line {}, in {}\n  {}",
            self.file, self.line, self.name, self.text
        )
    }
}

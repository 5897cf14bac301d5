//! Output sinks for `print` and `DEBUG`

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// A cloneable in-memory sink.
///
/// Hand one clone to [`crate::Vm::set_output`] and keep the other to read
/// what the script printed.
///
/// # Example
///
/// ```
/// use interpreter::{CaptureOutput, Vm, VmConfig};
///
/// let out = CaptureOutput::new();
/// let mut vm = Vm::new(VmConfig::default()).unwrap();
/// vm.set_output(Box::new(out.clone()));
/// vm.write_out(b"hi\n").unwrap();
/// assert_eq!(out.contents(), "hi\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CaptureOutput(Rc<RefCell<Vec<u8>>>);

impl CaptureOutput {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded lossily
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// Discards captured output
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for CaptureOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

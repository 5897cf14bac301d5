//! Call frames and the register window stack
//!
//! Every active call owns a window of the shared register array. The two
//! slots below the window hold the frame's globals and code so both stay
//! reachable from the root while the frame runs.

use crate::vm::Vm;
use core_types::{StackFrame, StrView, Value, VmError, VmResult};

/// Capacity of the frame table.
pub const FRAMES: usize = 256;

/// Bookkeeping slots below each window (globals, code).
pub const REGS_EXTRA: usize = 2;

/// Registers reserved for a worst-case function body on every push.
pub const BODY_RESERVE: usize = 256;

/// Where a frame's return value goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTo {
    /// Absolute register in the caller's window
    Register(usize),
    /// Handed back to a host call waiting in [`Vm::run`]
    Host,
    /// Dropped (module bodies)
    Discard,
}

/// One active call.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    /// Globals dict
    pub globals: Value,
    /// Code being executed
    pub code: StrView,
    /// Byte offset of the next instruction within `code`
    pub ip: usize,
    /// Pending exception handler, as a byte offset
    pub handler: Option<usize>,
    /// Absolute index of register 0
    pub window: usize,
    /// Declared register count
    pub cregs: usize,
    /// Return destination
    pub ret: ReturnTo,
    /// File name recorded by `FILE`
    pub file: Value,
    /// Function name recorded by `NAME`
    pub name: Value,
    /// Source text recorded by `LINE`
    pub line: Value,
    /// Line number recorded by `LINE`; 0 until the first `LINE`
    pub lineno: u32,
}

impl Vm {
    /// Pushes a frame running `code` over `globals`.
    ///
    /// The window starts after the caller's declared registers. Fails with
    /// RuntimeError "stack overflow" when the window plus a full body would
    /// leave the register array or the frame table is full.
    pub(crate) fn push_frame(&mut self, globals: Value, code: Value, ret: ReturnTo) -> VmResult<()> {
        let view = code
            .as_str()
            .ok_or_else(|| VmError::type_error(format!("cannot run {} as code", code.tag())))?;
        let window = match self.frames.last() {
            Some(top) => top.window + top.cregs + REGS_EXTRA,
            None => REGS_EXTRA,
        };
        if window + BODY_RESERVE + REGS_EXTRA >= self.config.registers
            || self.frames.len() >= FRAMES - 1
        {
            return Err(VmError::runtime_error("stack overflow"));
        }
        self.set_reg(window - 2, globals)?;
        self.set_reg(window - 1, code)?;
        tracing::trace!(depth = self.frames.len() + 1, window, "push frame");
        self.frames.push(Frame {
            globals,
            code: view,
            ip: 0,
            handler: None,
            window,
            cregs: 0,
            ret,
            file: Value::None,
            name: Value::None,
            line: Value::None,
            lineno: 0,
        });
        Ok(())
    }

    /// Pops the top frame, delivering `v` to its return destination.
    pub(crate) fn return_frame(&mut self, v: Value) -> VmResult<()> {
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| VmError::runtime_error("return outside of a frame"))?;
        match frame.ret {
            ReturnTo::Register(abs) => self.set_reg(abs, v)?,
            ReturnTo::Host => {
                self.host_return = v;
                self.heap.grey(v);
            }
            ReturnTo::Discard => {}
        }
        self.clear_window(&frame)
    }

    /// Zeroes a frame's bookkeeping slots and declared registers.
    pub(crate) fn clear_window(&mut self, frame: &Frame) -> VmResult<()> {
        let start = frame.window - REGS_EXTRA;
        let end = (frame.window + frame.cregs).min(self.config.registers);
        let regs = self.heap.list_mut(self.regs)?;
        for slot in &mut regs.items[start..end] {
            *slot = Value::None;
        }
        Ok(())
    }

    /// Pops frames until `depth` remain, clearing their windows.
    pub(crate) fn unwind_to(&mut self, depth: usize) -> VmResult<()> {
        while self.frames.len() > depth {
            if let Some(frame) = self.frames.pop() {
                self.clear_window(&frame)?;
            }
        }
        Ok(())
    }

    /// Traceback entries for every frame that recorded a line.
    pub(crate) fn stack_frames(&self) -> Vec<StackFrame> {
        let text = |v: Value, default: &str| match v {
            Value::None => default.to_string(),
            v => self.heap.display(v),
        };
        self.frames
            .iter()
            .filter(|f| f.lineno != 0)
            .map(|f| StackFrame {
                file: text(f.file, "?"),
                name: text(f.name, "?"),
                line: f.lineno,
                text: text(f.line, "").trim_end_matches('\0').to_string(),
            })
            .collect()
    }

    /// Number of active frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

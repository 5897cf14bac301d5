//! Dispatch loop for bytecode execution
//!
//! [`Vm::run`] steps the top frame until the frame table shrinks back to a
//! given depth. Errors unwind to the innermost frame with a handler; with
//! none left above the stop depth they come back as `Err`.

use crate::call::Called;
use crate::call_frame::ReturnTo;
use crate::ops::BinOp;
use crate::vm::Vm;
use bytecode_system::{Instruction, Opcode, WORD};
use core_types::{DictKind, ErrorKind, Value, VmError, VmResult};
use memory_manager::{FnCode, FnObj};
use std::cmp::Ordering;

fn invalid_bytecode() -> VmError {
    VmError::runtime_error("invalid bytecode")
}

impl Vm {
    /// Offset `words` instruction words away from `at`.
    fn relative(at: usize, words: i64) -> VmResult<usize> {
        usize::try_from(at as i64 + words * WORD as i64).map_err(|_| invalid_bytecode())
    }

    /// `n` registers starting at absolute index `start`.
    fn reg_range(&self, start: usize, n: usize) -> VmResult<Vec<Value>> {
        self.heap
            .list_items(self.regs)?
            .get(start..start + n)
            .map(<[Value]>::to_vec)
            .ok_or_else(|| VmError::runtime_error("register out of range"))
    }

    /// Executes one instruction of the top frame.
    pub(crate) fn step(&mut self) -> VmResult<()> {
        let top = self
            .frames
            .len()
            .checked_sub(1)
            .ok_or_else(|| VmError::runtime_error("no frame to run"))?;
        let frame = self.frames[top];
        let at = frame.ip;
        let word: [u8; WORD] = self
            .heap
            .str_bytes(frame.code)?
            .get(at..at + WORD)
            .and_then(|w| w.try_into().ok())
            .ok_or_else(invalid_bytecode)?;
        let inst = Instruction::decode(word);
        self.frames[top].ip = at + WORD;

        let w = frame.window;
        let (ra, rb, rc) = (w + inst.a as usize, w + inst.b as usize, w + inst.c as usize);
        let op = inst
            .op()
            .map_err(|byte| VmError::type_error(format!("invalid opcode {}", byte)))?;

        match op {
            Opcode::Eof => self.return_frame(Value::None)?,
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Pow
            | Opcode::Mod
            | Opcode::BitAnd
            | Opcode::BitOr
            | Opcode::BitXor
            | Opcode::Lsh
            | Opcode::Rsh => {
                let bin = match op {
                    Opcode::Add => BinOp::Add,
                    Opcode::Sub => BinOp::Sub,
                    Opcode::Mul => BinOp::Mul,
                    Opcode::Div => BinOp::Div,
                    Opcode::Pow => BinOp::Pow,
                    Opcode::Mod => BinOp::Mod,
                    Opcode::BitAnd => BinOp::BitAnd,
                    Opcode::BitOr => BinOp::BitOr,
                    Opcode::BitXor => BinOp::BitXor,
                    Opcode::Lsh => BinOp::Lsh,
                    _ => BinOp::Rsh,
                };
                let v = self.binary(bin, self.reg(rb)?, self.reg(rc)?)?;
                self.set_reg(ra, v)?;
            }
            Opcode::Cmp | Opcode::Eq | Opcode::Ne | Opcode::Lt | Opcode::Le => {
                let ord = self.compare(self.reg(rb)?, self.reg(rc)?)?;
                let v = match op {
                    Opcode::Cmp => Value::Number(match ord {
                        Ordering::Less => -1.0,
                        Ordering::Equal => 0.0,
                        Ordering::Greater => 1.0,
                    }),
                    Opcode::Eq => Value::from_bool(ord == Ordering::Equal),
                    Opcode::Ne => Value::from_bool(ord != Ordering::Equal),
                    Opcode::Lt => Value::from_bool(ord == Ordering::Less),
                    _ => Value::from_bool(ord != Ordering::Greater),
                };
                self.set_reg(ra, v)?;
            }
            Opcode::Not => {
                let v = Value::from_bool(!self.truthy(self.reg(rb)?)?);
                self.set_reg(ra, v)?;
            }
            Opcode::BitNot => {
                let v = self.bit_not(self.reg(rb)?)?;
                self.set_reg(ra, v)?;
            }
            Opcode::Get => {
                let v = self.get(self.reg(rb)?, self.reg(rc)?)?;
                self.set_reg(ra, v)?;
            }
            Opcode::IGet => {
                if let Some(v) = self.safe_get(self.reg(rb)?, self.reg(rc)?)? {
                    self.set_reg(ra, v)?;
                }
            }
            Opcode::Set => self.set(self.reg(ra)?, self.reg(rb)?, self.reg(rc)?)?,
            Opcode::Has => {
                let v = Value::from_bool(self.has(self.reg(rb)?, self.reg(rc)?)?);
                self.set_reg(ra, v)?;
            }
            Opcode::Del => self.del(self.reg(ra)?, self.reg(rb)?)?,
            Opcode::Len => {
                let v = Value::Number(self.len(self.reg(rb)?)? as f64);
                self.set_reg(ra, v)?;
            }
            Opcode::GGet => {
                let name = self.reg(rb)?;
                let v = match self.safe_get(frame.globals, name)? {
                    Some(v) => v,
                    None => self.get(self.builtins, name)?,
                };
                self.set_reg(ra, v)?;
            }
            Opcode::GSet => self.set(frame.globals, self.reg(ra)?, self.reg(rb)?)?,
            Opcode::Move => self.set_reg(ra, self.reg(rb)?)?,
            Opcode::None => self.set_reg(ra, Value::None)?,
            Opcode::Number => {
                let start = at + WORD;
                let payload: [u8; 8] = self
                    .heap
                    .str_bytes(frame.code)?
                    .get(start..start + 8)
                    .and_then(|b| b.try_into().ok())
                    .ok_or_else(invalid_bytecode)?;
                self.set_reg(ra, Value::Number(f64::from_le_bytes(payload)))?;
                self.frames[top].ip = start + 8;
            }
            Opcode::String => {
                let start = at + WORD;
                let len = inst.ubc() as usize;
                let view = frame.code.substring(start as i64, (start + len) as i64);
                self.set_reg(ra, Value::Str(view))?;
                self.frames[top].ip = start + (len / WORD + 1) * WORD;
            }
            Opcode::Def => {
                let start = at + WORD;
                let words = inst.sbc() as i64;
                let end = Self::relative(at, words)?;
                let body = frame.code.substring(start as i64, end as i64);
                let f = self.heap.new_function(FnObj {
                    code: FnCode::Bytecode(Value::Str(body)),
                    bound: false,
                    self_: Value::None,
                    globals: frame.globals,
                })?;
                self.set_reg(ra, f)?;
                self.frames[top].ip = end;
            }
            Opcode::Line => {
                let start = at + WORD;
                let words = inst.a as usize;
                let text = frame
                    .code
                    .substring(start as i64, (start + words * WORD) as i64 - 1);
                let frame = &mut self.frames[top];
                frame.line = Value::Str(text);
                frame.lineno = inst.ubc() as u32;
                frame.ip = start + words * WORD;
            }
            Opcode::File => self.frames[top].file = self.reg(ra)?,
            Opcode::Name => self.frames[top].name = self.reg(ra)?,
            Opcode::Regs => self.frames[top].cregs = inst.a as usize,
            Opcode::Pass => {}
            Opcode::Jump => self.frames[top].ip = Self::relative(at, inst.sbc() as i64)?,
            Opcode::SetJmp => {
                self.frames[top].handler = match inst.sbc() {
                    0 => None,
                    words => Some(Self::relative(at, words as i64)?),
                };
            }
            Opcode::If | Opcode::Ifn => {
                let truthy = self.truthy(self.reg(ra)?)?;
                if truthy == (op == Opcode::If) {
                    self.frames[top].ip += WORD;
                }
            }
            Opcode::Iter => {
                let seq = self.reg(rb)?;
                let n = match self.reg(rc)? {
                    Value::Number(n) => n,
                    other => {
                        return Err(VmError::type_error(format!(
                            "iteration cursor must be a number, got {}",
                            other.tag()
                        )))
                    }
                };
                if n < self.len(seq)? as f64 {
                    let v = self.iterate(seq, Value::Number(n))?;
                    self.set_reg(ra, v)?;
                    self.set_reg(rc, Value::Number(n + 1.0))?;
                    self.frames[top].ip += WORD;
                }
            }
            Opcode::Dict => {
                let items = self.reg_range(rb, inst.c as usize / 2 * 2)?;
                let v = self.heap.dict_from_pairs(DictKind::Class, &items)?;
                self.set_reg(ra, v)?;
            }
            Opcode::List | Opcode::Params => {
                let items = self.reg_range(rb, inst.c as usize)?;
                let v = self.heap.list_from(&items)?;
                self.set_reg(ra, v)?;
            }
            Opcode::Call => {
                let (f, params) = (self.reg(rb)?, self.reg(rc)?);
                if let Called::Done(v) = self.invoke(f, params, ReturnTo::Register(ra))? {
                    self.set_reg(ra, v)?;
                }
            }
            Opcode::Return => self.return_frame(self.reg(ra)?)?,
            Opcode::Raise => {
                let v = self.reg(ra)?;
                if !v.is_none() {
                    self.set_exception(v)?;
                }
                return Err(VmError::new(
                    ErrorKind::Exception,
                    self.text(self.exception()),
                ));
            }
            Opcode::Debug => {
                let line = format!("DEBUG: {} {}\n", inst.a, self.text(self.reg(ra)?));
                self.write_out(line.as_bytes())?;
            }
        }
        Ok(())
    }

    /// Runs until only `stop` frames remain.
    pub(crate) fn run(&mut self, stop: usize) -> VmResult<()> {
        while self.frames.len() > stop {
            if let Err(err) = self.step() {
                self.handle(err, stop)?;
            }
        }
        Ok(())
    }

    /// Delivers `err` to the innermost handler above `stop`.
    ///
    /// Frames above the handling frame are dropped and the handler is
    /// consumed. Without a handler every frame above `stop` is dropped
    /// and the error, with its traceback, is returned.
    fn handle(&mut self, mut err: VmError, stop: usize) -> VmResult<()> {
        let catcher = (stop..self.frames.len())
            .rev()
            .find(|&i| self.frames[i].handler.is_some());
        let Some(i) = catcher else {
            if err.stack.is_empty() {
                err = err.with_stack(self.stack_frames());
            }
            if !self.frames[..stop].iter().any(|f| f.handler.is_some()) {
                tracing::warn!(%err, depth = self.frames.len(), "uncaught exception");
            }
            self.unwind_to(stop)?;
            return Err(err);
        };

        if err.kind != ErrorKind::Exception {
            let v = self.string(&err.to_string())?;
            self.set_exception(v)?;
        }
        tracing::debug!(%err, frame = i, "exception handled");
        self.unwind_to(i + 1)?;
        let frame = &mut self.frames[i];
        if let Some(handler) = frame.handler.take() {
            frame.ip = handler;
        }
        Ok(())
    }
}

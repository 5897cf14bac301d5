//! Function and call protocol
//!
//! A call resolves its callee in order: class dicts delegate to `__new__`
//! with the class prepended, object dicts delegate to `__call__`, natives
//! run immediately, bytecode functions get a new frame with the parameter
//! list in register 0. Bound functions prepend their receiver first.

use crate::call_frame::ReturnTo;
use crate::vm::{list_ref, Vm};
use core_types::{DictKind, Value, VmError, VmResult};
use memory_manager::{FnCode, NativeId};

/// Outcome of starting a call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Called {
    /// A native ran to completion
    Done(Value),
    /// A bytecode frame was pushed and runs in the dispatch loop
    Pushed,
}

impl Vm {
    /// Starts calling `f` with the parameter list `params`.
    ///
    /// `params` is modified in place when a receiver is prepended.
    pub(crate) fn invoke(&mut self, f: Value, params: Value, ret: ReturnTo) -> VmResult<Called> {
        let params = match params {
            Value::None => self.heap.new_list()?,
            p => p,
        };
        let plist = list_ref(params)?;
        let mut callee = f;
        for _ in 0..=self.config.lookup_depth {
            match callee {
                Value::Dict(_, DictKind::Class) => {
                    if let Some(hook) = self.lookup(callee, self.names.new)? {
                        self.heap.list_insert(plist, 0, callee)?;
                        callee = hook;
                        continue;
                    }
                }
                Value::Dict(_, DictKind::Object) => {
                    if let Some(hook) = self.lookup(callee, self.names.call)? {
                        callee = hook;
                        continue;
                    }
                }
                Value::Function(r) => {
                    let func = *self.heap.function(r)?;
                    if func.bound {
                        self.heap.list_insert(plist, 0, func.self_)?;
                    }
                    return match func.code {
                        FnCode::Native(id) => self.call_native(id, params).map(Called::Done),
                        FnCode::Bytecode(code) => {
                            self.push_frame(func.globals, code, ret)?;
                            let window = self.frames.last().map_or(0, |top| top.window);
                            self.set_reg(window, params)?;
                            Ok(Called::Pushed)
                        }
                    };
                }
                _ => {}
            }
            break;
        }
        Err(VmError::type_error("object is not callable"))
    }

    /// Runs a native with `params` rooted for the duration of the call.
    fn call_native(&mut self, id: NativeId, params: Value) -> VmResult<Value> {
        let f = *self
            .natives
            .get(id.0 as usize)
            .ok_or_else(|| VmError::runtime_error(format!("unknown native function {}", id.0)))?;
        let mark = self.heap.list_len(self.params)?;
        self.heap.list_append(self.params, params)?;
        let result = f(self, params);
        self.heap.list_truncate(self.params, mark)?;
        let v = result?;
        self.heap.grey(v);
        Ok(v)
    }

    /// Calls `f` with `args` and runs it to completion.
    ///
    /// Errors not handled inside the call come back as `Err`; frames the
    /// call pushed are gone either way.
    ///
    /// # Example
    ///
    /// ```
    /// use interpreter::{Vm, VmConfig};
    /// use core_types::Value;
    ///
    /// let mut vm = Vm::new(VmConfig::default()).unwrap();
    /// let f = vm.native(|vm, params| vm.len(params).map(|n| Value::Number(n as f64))).unwrap();
    /// let n = vm.call(f, &[Value::None, Value::None]).unwrap();
    /// assert_eq!(n, Value::Number(2.0));
    /// ```
    pub fn call(&mut self, f: Value, args: &[Value]) -> VmResult<Value> {
        let params = self.heap.list_from(args)?;
        self.call_with(f, params)
    }

    /// Like [`Vm::call`] with an existing parameter list.
    pub fn call_with(&mut self, f: Value, params: Value) -> VmResult<Value> {
        let depth = self.frames.len();
        match self.invoke(f, params, ReturnTo::Host)? {
            Called::Done(v) => Ok(v),
            Called::Pushed => {
                self.run(depth)?;
                Ok(std::mem::take(&mut self.host_return))
            }
        }
    }

    /// Creates an object of `klass` and runs its `__init__` with `args`.
    pub fn object(&mut self, klass: Value, args: &[Value]) -> VmResult<Value> {
        let params = self.heap.list_from(args)?;
        self.construct(klass, params)
    }

    /// Object construction over an existing parameter list.
    ///
    /// The new object is an object-kind dict whose meta is `klass`. When
    /// `__init__` resolves on it, the bound initializer is called with
    /// `params`; its result is discarded.
    pub fn construct(&mut self, klass: Value, params: Value) -> VmResult<Value> {
        let obj = self.heap.new_dict(DictKind::Object)?;
        if let Value::Dict(r, _) = obj {
            self.heap.set_dict_meta(r, klass)?;
        }
        if let Some(init) = self.lookup(obj, self.names.init)? {
            let mark = self.heap.list_len(self.params)?;
            self.heap.list_append(self.params, obj)?;
            let result = self.call_with(init, params);
            self.heap.list_truncate(self.params, mark)?;
            result?;
        }
        Ok(obj)
    }
}

//! The virtual machine instance
//!
//! A [`Vm`] owns the heap, the shared register array, the frame table and
//! the `builtins`/`modules` registries. Everything the collector must keep
//! alive hangs off one untracked root list:
//!
//! | slot | contents |
//! |------|----------|
//! | 0 | builtins dict |
//! | 1 | modules dict |
//! | 2 | register array |
//! | 3 | parameter lists of running natives |
//! | 4 | pending exception |
//! | 5 | interned hook names |

use crate::call_frame::{Frame, FRAMES};
use crate::config::VmConfig;
use crate::methods;
use arrayvec::ArrayVec;
use core_types::{DictKind, GcRef, Value, VmError, VmResult};
use memory_manager::{FnCode, FnObj, GcStats, Heap, NativeId};
use std::any::Any;
use std::fmt;
use std::io::{self, Write};

/// Host routine callable from scripts.
///
/// Receives the parameter list (bound receivers already prepended) and
/// returns one value.
pub type NativeFn = fn(&mut Vm, Value) -> VmResult<Value>;

const ROOT_BUILTINS: usize = 0;
const ROOT_MODULES: usize = 1;
const ROOT_REGISTERS: usize = 2;
const ROOT_PARAMS: usize = 3;
const ROOT_EXCEPTION: usize = 4;
const ROOT_INTERNED: usize = 5;
const ROOT_SLOTS: usize = 6;

/// Interned keys for the hook protocol
#[derive(Debug, Clone, Copy)]
pub(crate) struct HookNames {
    pub(crate) get: Value,
    pub(crate) set: Value,
    pub(crate) call: Value,
    pub(crate) new: Value,
    pub(crate) init: Value,
}

/// A Tern virtual machine.
///
/// # Example
///
/// ```
/// use interpreter::{Vm, VmConfig};
/// use bytecode_system::{BytecodeChunk, Opcode};
/// use core_types::Value;
///
/// let mut vm = Vm::new(VmConfig::default()).unwrap();
/// let mut chunk = BytecodeChunk::new();
/// chunk.emit(Opcode::Regs, 2, 0, 0);
/// chunk.number(0, 6.0);
/// chunk.number(1, 7.0);
/// chunk.emit(Opcode::Mul, 0, 0, 1);
/// chunk.emit(Opcode::Return, 0, 0, 0);
/// chunk.emit(Opcode::Eof, 0, 0, 0);
///
/// let code = vm.bytes(&chunk.finish().unwrap()).unwrap();
/// let globals = vm.dict().unwrap();
/// assert_eq!(vm.exec(code, globals).unwrap(), Value::Number(42.0));
/// ```
pub struct Vm {
    pub(crate) heap: Heap,
    pub(crate) config: VmConfig,
    pub(crate) root: GcRef,
    pub(crate) builtins: Value,
    pub(crate) modules: Value,
    pub(crate) regs: GcRef,
    pub(crate) params: GcRef,
    pub(crate) frames: ArrayVec<Frame, FRAMES>,
    pub(crate) natives: Vec<NativeFn>,
    pub(crate) names: HookNames,
    pub(crate) host_return: Value,
    out: Box<dyn Write>,
}

impl fmt::Debug for Vm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vm")
            .field("config", &self.config)
            .field("depth", &self.frames.len())
            .field("natives", &self.natives.len())
            .field("gc", &self.heap.stats())
            .finish()
    }
}

pub(crate) fn list_ref(v: Value) -> VmResult<GcRef> {
    v.as_list()
        .ok_or_else(|| VmError::type_error(format!("expected list, got {}", v.tag())))
}

pub(crate) fn dict_ref(v: Value) -> VmResult<GcRef> {
    v.as_dict()
        .map(|(r, _)| r)
        .ok_or_else(|| VmError::type_error(format!("expected dict, got {}", v.tag())))
}

impl Vm {
    /// Creates a VM with empty registries.
    ///
    /// The builtins dict starts with only its cross links (`MODULES`,
    /// `BUILTINS`); the `builtins` crate fills in the standard functions.
    pub fn new(config: VmConfig) -> VmResult<Self> {
        let mut heap = Heap::with_threshold(config.gc_threshold);
        let root_value = heap.new_list_untracked();
        heap.set_root(root_value);
        let root = list_ref(root_value)?;
        heap.list_assign(root, &[Value::None; ROOT_SLOTS])?;

        let builtins = heap.new_dict(DictKind::Class)?;
        heap.list_set(root, ROOT_BUILTINS as i64, builtins)?;
        let modules = heap.new_dict(DictKind::Class)?;
        heap.list_set(root, ROOT_MODULES as i64, modules)?;
        let regs = heap.new_list()?;
        heap.list_set(root, ROOT_REGISTERS as i64, regs)?;
        let regs = list_ref(regs)?;
        heap.list_assign(regs, &vec![Value::None; config.registers])?;
        let params = heap.new_list()?;
        heap.list_set(root, ROOT_PARAMS as i64, params)?;
        let params = list_ref(params)?;

        let interned = heap.new_list()?;
        heap.list_set(root, ROOT_INTERNED as i64, interned)?;
        let interned = list_ref(interned)?;
        let intern = |heap: &mut Heap, s: &str| -> VmResult<Value> {
            let v = heap.string(s)?;
            heap.list_append(interned, v)?;
            Ok(v)
        };
        let names = HookNames {
            get: intern(&mut heap, "__get__")?,
            set: intern(&mut heap, "__set__")?,
            call: intern(&mut heap, "__call__")?,
            new: intern(&mut heap, "__new__")?,
            init: intern(&mut heap, "__init__")?,
        };

        let mut vm = Vm {
            heap,
            config,
            root,
            builtins,
            modules,
            regs,
            params,
            frames: ArrayVec::new(),
            natives: methods::TABLE.to_vec(),
            names,
            host_return: Value::None,
            out: Box::new(io::stdout()),
        };
        vm.link_registries()?;
        tracing::debug!(registers = vm.config.registers, "vm ready");
        Ok(vm)
    }

    fn link_registries(&mut self) -> VmResult<()> {
        let (builtins, modules) = (dict_ref(self.builtins)?, dict_ref(self.modules)?);
        let key = self.string("MODULES")?;
        self.heap.dict_set(builtins, key, self.modules)?;
        let key = self.string("BUILTINS")?;
        self.heap.dict_set(modules, key, self.builtins)?;
        self.heap.dict_set(builtins, key, self.builtins)?;

        let sys = self.dict()?;
        let key = self.string("sys")?;
        self.heap.dict_set(modules, key, sys)?;
        let flavour = if cfg!(debug_assertions) { "debug" } else { "release" };
        let entries = [
            ("version", env!("CARGO_PKG_VERSION")),
            ("flags", flavour),
            ("platform", std::env::consts::OS),
        ];
        for (k, v) in entries {
            let (k, v) = (self.string(k)?, self.string(v)?);
            self.heap.dict_set(dict_ref(sys)?, k, v)?;
        }
        Ok(())
    }

    // ---- registers ----

    /// Register at absolute index `i`.
    pub(crate) fn reg(&self, i: usize) -> VmResult<Value> {
        self.heap.list_get(self.regs, i as i64)
    }

    /// Stores into absolute register `i`, greying `v`.
    pub(crate) fn set_reg(&mut self, i: usize, v: Value) -> VmResult<()> {
        self.heap.list_set(self.regs, i as i64, v)
    }

    // ---- registries ----

    /// The builtins dict.
    pub fn builtins(&self) -> Value {
        self.builtins
    }

    /// The modules dict.
    pub fn modules(&self) -> Value {
        self.modules
    }

    /// Active configuration.
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Allocates a host function backed by `f`.
    pub fn native(&mut self, f: NativeFn) -> VmResult<Value> {
        let id = NativeId(self.natives.len() as u32);
        self.natives.push(f);
        self.heap.new_function(FnObj {
            code: FnCode::Native(id),
            bound: false,
            self_: Value::None,
            globals: Value::None,
        })
    }

    /// Host function `f` bound to `receiver`.
    pub fn method(&mut self, receiver: Value, f: NativeFn) -> VmResult<Value> {
        let id = NativeId(self.natives.len() as u32);
        self.natives.push(f);
        self.bound_native(receiver, id)
    }

    pub(crate) fn bound_native(&mut self, receiver: Value, id: NativeId) -> VmResult<Value> {
        self.heap.new_function(FnObj {
            code: FnCode::Native(id),
            bound: true,
            self_: receiver,
            globals: Value::None,
        })
    }

    /// Sets `builtins[name]` to a host function.
    ///
    /// # Example
    ///
    /// ```
    /// use interpreter::{Vm, VmConfig};
    /// use core_types::Value;
    ///
    /// let mut vm = Vm::new(VmConfig::default()).unwrap();
    /// vm.register_native("answer", |_, _| Ok(Value::Number(42.0))).unwrap();
    /// let f = vm.builtin("answer").unwrap();
    /// assert_eq!(vm.call(f, &[]).unwrap(), Value::Number(42.0));
    /// ```
    pub fn register_native(&mut self, name: &str, f: NativeFn) -> VmResult<()> {
        let fnc = self.native(f)?;
        self.register(name, fnc)
    }

    /// Sets `builtins[name] = v`.
    pub fn register(&mut self, name: &str, v: Value) -> VmResult<()> {
        let key = self.string(name)?;
        self.heap.dict_set(dict_ref(self.builtins)?, key, v)
    }

    /// `builtins[name]`; KeyError when missing.
    pub fn builtin(&mut self, name: &str) -> VmResult<Value> {
        let key = self.string(name)?;
        self.heap.dict_get(dict_ref(self.builtins)?, key)
    }

    /// Creates a module dict and registers it under `name`.
    ///
    /// The module carries `__name__`, `__doc__` and `__file__`; natives are
    /// added with [`Vm::set`].
    pub fn new_module(&mut self, name: &str, doc: &str) -> VmResult<Value> {
        let module = self.dict()?;
        let r = dict_ref(module)?;
        let name_v = self.string(name)?;
        self.heap.dict_set(dict_ref(self.modules)?, name_v, module)?;
        let entries = [("__name__", name_v), ("__doc__", self.string(doc)?)];
        for (k, v) in entries {
            let k = self.string(k)?;
            self.heap.dict_set(r, k, v)?;
        }
        let file = self.string(&format!("<{}>", name))?;
        let key = self.string("__file__")?;
        self.heap.dict_set(r, key, file)?;
        Ok(module)
    }

    /// Stores the script arguments as `builtins["ARGV"]`.
    pub fn set_argv(&mut self, args: &[String]) -> VmResult<()> {
        let argv = self.heap.new_list()?;
        self.register("ARGV", argv)?;
        let r = list_ref(argv)?;
        for arg in args {
            let s = self.string(arg)?;
            self.heap.list_append(r, s)?;
        }
        Ok(())
    }

    // ---- constructors ----

    /// A new string copied from `s`.
    pub fn string(&mut self, s: &str) -> VmResult<Value> {
        self.heap.string(s)
    }

    /// A new string copied from raw bytes.
    pub fn bytes(&mut self, bytes: &[u8]) -> VmResult<Value> {
        self.heap.copy_string(bytes)
    }

    /// A new list holding `items`.
    pub fn list(&mut self, items: &[Value]) -> VmResult<Value> {
        self.heap.list_from(items)
    }

    /// A new class-kind dict, the flavour scripts create.
    pub fn dict(&mut self) -> VmResult<Value> {
        self.heap.new_dict(DictKind::Class)
    }

    /// A new class whose meta is `builtins["object"]` when registered.
    pub fn class(&mut self) -> VmResult<Value> {
        let klass = self.dict()?;
        let key = self.string("object")?;
        let object = self
            .heap
            .dict_lookup(dict_ref(self.builtins)?, key)?
            .unwrap_or(Value::None);
        self.heap.set_dict_meta(dict_ref(klass)?, object)?;
        Ok(klass)
    }

    /// Wraps a host payload.
    pub fn data(&mut self, magic: i32, payload: Box<dyn Any>) -> VmResult<Value> {
        self.heap.new_data(magic, payload)
    }

    /// Wraps a host payload whose `finalizer` runs when the collector frees it.
    pub fn data_with_finalizer(
        &mut self,
        magic: i32,
        payload: Box<dyn Any>,
        finalizer: impl FnOnce(i32, Box<dyn Any>) + 'static,
    ) -> VmResult<Value> {
        self.heap.new_data_with_finalizer(magic, payload, finalizer)
    }

    // ---- collector ----

    /// Runs a full collection now.
    pub fn gc_full(&mut self) -> VmResult<()> {
        self.heap.full_collect()
    }

    /// Collector counters.
    pub fn gc_stats(&self) -> GcStats {
        self.heap.stats()
    }

    /// The heap.
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The heap, mutably.
    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    // ---- exceptions ----

    /// The last exception value delivered to a handler.
    pub fn exception(&self) -> Value {
        self.heap
            .list_get(self.root, ROOT_EXCEPTION as i64)
            .unwrap_or(Value::None)
    }

    pub(crate) fn set_exception(&mut self, v: Value) -> VmResult<()> {
        self.heap.list_set(self.root, ROOT_EXCEPTION as i64, v)
    }

    // ---- output ----

    /// Replaces the sink used by `print` and `DEBUG`.
    pub fn set_output(&mut self, out: Box<dyn Write>) {
        self.out = out;
    }

    /// Writes raw bytes to the output sink.
    pub fn write_out(&mut self, bytes: &[u8]) -> VmResult<()> {
        self.out.write_all(bytes)?;
        Ok(())
    }

    /// `str()` rendering of `v` as text.
    pub fn text(&self, v: Value) -> String {
        self.heap.display(v)
    }
}

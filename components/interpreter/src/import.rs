//! Modules, `exec` and program entry
//!
//! A module is a globals dict registered in `modules` before its body
//! runs, so circular imports see the partially initialized module.

use crate::call_frame::ReturnTo;
use crate::vm::{dict_ref, Vm};
use core_types::{Value, VmError, VmResult};
use std::path::PathBuf;

/// File extension of compiled modules.
pub const MODULE_EXT: &str = "tpc";

impl Vm {
    /// Imports module `name`.
    ///
    /// Returns `modules[name]` when already loaded. Otherwise reads
    /// `<name>.tpc` from the configured module directory (the current
    /// directory by default) and runs it.
    pub fn import(&mut self, name: &str) -> VmResult<Value> {
        let key = self.string(name)?;
        if let Some(module) = self.heap.dict_lookup(dict_ref(self.modules)?, key)? {
            return Ok(module);
        }
        let path = self
            .config
            .module_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(format!("{}.{}", name, MODULE_EXT));
        let code = std::fs::read(&path).map_err(|e| {
            VmError::io_error(format!("cannot import {}: {}: {}", name, path.display(), e))
        })?;
        self.import_module(&path.display().to_string(), name, &code)
    }

    /// Runs `code` as module `name` loaded from `fname`.
    ///
    /// The module dict gets `__name__`, `__file__`, `__code__` and a
    /// `__dict__` pointing at itself.
    pub fn import_module(&mut self, fname: &str, name: &str, code: &[u8]) -> VmResult<Value> {
        let module = self.dict()?;
        let name_v = self.string(name)?;
        self.heap.dict_set(dict_ref(self.modules)?, name_v, module)?;
        let r = dict_ref(module)?;
        let code = self.bytes(code)?;
        let key = self.string("__code__")?;
        self.heap.dict_set(r, key, code)?;
        let file = self.string(fname)?;
        for (k, v) in [("__name__", name_v), ("__file__", file), ("__dict__", module)] {
            let k = self.string(k)?;
            self.heap.dict_set(r, k, v)?;
        }

        tracing::debug!(module = name, file = fname, "import");
        let depth = self.frames.len();
        self.push_frame(module, code, ReturnTo::Discard)?;
        self.run(depth)?;
        Ok(module)
    }

    /// Runs a program as the `__main__` module.
    pub fn run_main(&mut self, fname: &str, code: &[u8]) -> VmResult<Value> {
        self.import_module(fname, "__main__", code)
    }

    /// Runs `code` over `globals` and returns what it returns.
    pub fn exec(&mut self, code: Value, globals: Value) -> VmResult<Value> {
        let depth = self.frames.len();
        self.push_frame(globals, code, ReturnTo::Host)?;
        self.run(depth)?;
        Ok(std::mem::take(&mut self.host_return))
    }
}

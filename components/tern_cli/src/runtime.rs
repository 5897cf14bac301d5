//! Runtime orchestration for script execution
//!
//! The Runtime owns one VM with the standard builtins installed and runs
//! bytecode files through it as the `__main__` module.

use crate::error::{CliError, CliResult};
use core_types::Value;
use interpreter::{Vm, VmConfig};
use std::path::Path;
use tracing::info;

/// Runs bytecode files on a VM with builtins registered
pub struct Runtime {
    vm: Vm,
}

impl Runtime {
    /// Create a runtime with the given VM settings
    ///
    /// # Example
    /// ```
    /// use tern_cli::Runtime;
    /// use interpreter::VmConfig;
    ///
    /// let runtime = Runtime::new(VmConfig::default()).unwrap();
    /// ```
    pub fn new(config: VmConfig) -> CliResult<Self> {
        Ok(Self {
            vm: builtins::new_vm(config)?,
        })
    }

    /// The underlying VM
    pub fn vm(&mut self) -> &mut Vm {
        &mut self.vm
    }

    /// Execute the bytecode file at `path` as `__main__`
    ///
    /// `argv` becomes `ARGV`; by convention its first entry is the file name.
    ///
    /// # Errors
    /// Returns `CliError` if the file cannot be read or the script raises
    /// an error nothing handles.
    pub fn execute_file(&mut self, path: &Path, argv: &[String]) -> CliResult<Value> {
        let code = read(path)?;
        self.vm.set_argv(argv)?;
        info!(file = %path.display(), bytes = code.len(), "running script");
        let fname = path.display().to_string();
        Ok(self.vm.run_main(&fname, &code)?)
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", self.vm.config())
            .finish()
    }
}

/// Listing of the bytecode file at `path`
pub fn disassemble_file(path: &Path) -> CliResult<String> {
    let code = read(path)?;
    Ok(bytecode_system::disassemble(&code)?)
}

fn read(path: &Path) -> CliResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

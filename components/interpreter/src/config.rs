//! VM configuration

use memory_manager::DEFAULT_GC_THRESHOLD;
use std::path::PathBuf;

/// Default size of the shared register array.
pub const DEFAULT_REGISTERS: usize = 16384;

/// Default prototype chain budget for attribute lookup.
pub const DEFAULT_LOOKUP_DEPTH: usize = 8;

/// Configuration for a [`crate::Vm`] instance.
///
/// # Example
///
/// ```
/// use interpreter::VmConfig;
///
/// let config = VmConfig::default()
///     .with_registers(4096)
///     .with_gc_threshold(256);
/// assert_eq!(config.registers, 4096);
/// assert_eq!(config.lookup_depth, 8);
/// ```
#[derive(Debug, Clone)]
pub struct VmConfig {
    /// Slots in the shared register array
    pub registers: usize,
    /// Collector increments between full collections
    pub gc_threshold: usize,
    /// Prototype chain budget
    pub lookup_depth: usize,
    /// Directory searched by `import` for `<name>.tpc`; the working directory when unset
    pub module_dir: Option<PathBuf>,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            registers: DEFAULT_REGISTERS,
            gc_threshold: DEFAULT_GC_THRESHOLD,
            lookup_depth: DEFAULT_LOOKUP_DEPTH,
            module_dir: None,
        }
    }
}

impl VmConfig {
    /// Sets the register array size
    pub fn with_registers(mut self, registers: usize) -> Self {
        self.registers = registers;
        self
    }

    /// Sets the number of increments between full collections
    pub fn with_gc_threshold(mut self, threshold: usize) -> Self {
        self.gc_threshold = threshold;
        self
    }

    /// Sets the prototype chain budget
    pub fn with_lookup_depth(mut self, depth: usize) -> Self {
        self.lookup_depth = depth;
        self
    }

    /// Sets the directory `import` loads modules from
    pub fn with_module_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.module_dir = Some(dir.into());
        self
    }
}

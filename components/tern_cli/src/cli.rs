//! Command line arguments

use clap::Parser;
use interpreter::VmConfig;
use std::path::{Path, PathBuf};

/// Run a Tern bytecode file
#[derive(Debug, Clone, Parser)]
#[command(name = "tern", version, about = "Run a Tern bytecode (.tpc) file")]
pub struct Cli {
    /// Bytecode file to run
    pub file: PathBuf,

    /// Arguments passed to the script as ARGV[1..]
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Print a listing of the file instead of running it
    #[arg(long)]
    pub disassemble: bool,

    /// Collector increments between full collections
    #[arg(long, value_name = "N")]
    pub gc_threshold: Option<usize>,

    /// Size of the register array
    #[arg(long, value_name = "N")]
    pub registers: Option<usize>,
}

impl Cli {
    /// VM settings for this run; modules are imported from the script's directory.
    pub fn vm_config(&self) -> VmConfig {
        let mut config = VmConfig::default();
        if let Some(n) = self.gc_threshold {
            config = config.with_gc_threshold(n);
        }
        if let Some(n) = self.registers {
            config = config.with_registers(n);
        }
        let dir = self.file.parent().unwrap_or(Path::new(""));
        if !dir.as_os_str().is_empty() {
            config = config.with_module_dir(dir);
        }
        config
    }

    /// `ARGV` as the script sees it: the file name, then the script arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.file.display().to_string())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

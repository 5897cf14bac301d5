//! Error types for the CLI

use bytecode_system::BytecodeError;
use core_types::VmError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// The script could not be read
    #[error("could not read '{}': {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The script raised an error nothing handled
    #[error(transparent)]
    Vm(#[from] VmError),

    /// The file is not well-formed bytecode
    #[error("bad bytecode: {0}")]
    Bytecode(#[from] BytecodeError),
}

impl CliError {
    /// Text printed to stderr before exiting; VM errors carry their traceback.
    pub fn report(&self) -> String {
        match self {
            CliError::Vm(e) => e.traceback(),
            other => format!("Error: {}\n", other),
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

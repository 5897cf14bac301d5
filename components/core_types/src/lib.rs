//! Core value and error types for the Tern VM.
//!
//! This crate provides the foundational types shared by every component:
//! the tagged value, heap handles, and the error/traceback types.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of runtime values
//! - [`GcRef`] - Generation-checked handle into the heap arena
//! - [`StrView`] - Offset/length view over a shared string buffer
//! - [`DictKind`] - Raw, class or object flavour of a dict value
//! - [`VmError`] - Runtime errors with tracebacks
//! - [`StackFrame`] - Traceback entry
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, Value, VmError};
//!
//! let num = Value::Number(42.0);
//! assert_eq!(num.as_number(), Some(42.0));
//!
//! let error = VmError::type_error("object is not callable");
//! assert_eq!(error.kind, ErrorKind::TypeError);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;
mod value;

pub use error::{ErrorKind, VmError, VmResult};
pub use source::StackFrame;
pub use value::{DictKind, GcRef, StrView, Tag, Value};

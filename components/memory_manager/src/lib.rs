//! Memory Manager - object heap and garbage collector
//!
//! This component provides:
//! - An arena of heap objects addressed by generation-checked handles
//! - A tri-color incremental mark/sweep collector with explicit white/grey/black sets
//! - List, dict and string algorithms operating on heap storage
//! - Value ordering and hashing shared by sorting and dict keys

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod compare;
pub mod dict;
pub mod gc;
pub mod heap;
pub mod list;
pub mod object;
pub mod string;

// Re-export main types
pub use compare::hash_bytes;
pub use gc::MarkColor;
pub use heap::{GcStats, Heap, DEFAULT_GC_THRESHOLD};
pub use object::{
    DataObj, DictItem, DictObj, Finalizer, FnCode, FnObj, ListObj, NativeId, Object, SlotState,
    StrObj,
};
pub use string::format_number;

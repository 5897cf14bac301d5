//! Heap object layouts.
//!
//! Each arena slot holds one [`Object`]. Values refer to objects through
//! [`core_types::GcRef`] handles; objects refer to each other through the
//! values they store.

use core_types::Value;
use std::any::Any;
use std::fmt;

/// Owned byte buffer behind one or more string views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrObj {
    /// Buffer contents
    pub bytes: Box<[u8]>,
}

/// Growable array of values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListObj {
    /// Elements; `items.capacity()` is the allocation
    pub items: Vec<Value>,
}

impl ListObj {
    /// Ensures room for `extra` more items, doubling the allocation.
    pub fn reserve(&mut self, extra: usize) {
        let need = self.items.len() + extra;
        let alloc = self.items.capacity();
        if need > alloc {
            let target = need.max(alloc * 2).max(4);
            self.items.reserve_exact(target - self.items.len());
        }
    }
}

/// State of one hash table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    /// Never used; terminates a probe
    #[default]
    Empty,
    /// Deleted; skipped by probes, reusable by inserts
    Tombstone,
    /// Holds a live key/value pair
    Occupied,
}

/// One hash table slot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DictItem {
    /// Slot state
    pub state: SlotState,
    /// Cached key hash
    pub hash: u32,
    /// Key
    pub key: Value,
    /// Value
    pub val: Value,
}

/// Open-addressed hash table with a prototype link.
///
/// `items.len()` is the allocation and is zero or a power of two.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictObj {
    /// Slot array
    pub items: Vec<DictItem>,
    /// Occupied slots
    pub len: usize,
    /// Occupied plus tombstone slots
    pub used: usize,
    /// Iteration cursor
    pub cursor: usize,
    /// Prototype consulted on lookup misses
    pub meta: Value,
}

impl DictObj {
    /// Slot count.
    pub fn alloc(&self) -> usize {
        self.items.len()
    }

    /// `alloc - 1`, or 0 for an unallocated table.
    pub fn mask(&self) -> usize {
        self.items.len().saturating_sub(1)
    }

    /// Occupied key/value pairs in slot order.
    pub fn pairs(&self) -> impl Iterator<Item = (Value, Value)> + '_ {
        self.items
            .iter()
            .filter(|item| item.state == SlotState::Occupied)
            .map(|item| (item.key, item.val))
    }
}

/// Index into the VM's native function table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeId(pub u32);

/// What a function runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FnCode {
    /// Host routine
    Native(NativeId),
    /// Bytecode held in a string view
    Bytecode(Value),
}

/// Native or bytecode function, possibly bound to a receiver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FnObj {
    /// Code to run
    pub code: FnCode,
    /// Bound method: `self_` is prepended to the parameters
    pub bound: bool,
    /// Receiver for bound methods, None otherwise
    pub self_: Value,
    /// Globals dict for bytecode functions
    pub globals: Value,
}

impl FnObj {
    /// Returns true for host routines.
    pub fn is_native(&self) -> bool {
        matches!(self.code, FnCode::Native(_))
    }

    /// Copy of this function bound to `receiver`.
    pub fn bind(&self, receiver: Value) -> FnObj {
        FnObj {
            bound: true,
            self_: receiver,
            ..*self
        }
    }
}

/// Finalizer run once when a data object is swept.
pub type Finalizer = Box<dyn FnOnce(i32, Box<dyn Any>)>;

/// Opaque host data.
pub struct DataObj {
    /// Host-defined type tag
    pub magic: i32,
    /// Host payload
    pub payload: Option<Box<dyn Any>>,
    /// Optional finalizer
    pub finalizer: Option<Finalizer>,
}

impl DataObj {
    /// Runs the finalizer, if any, consuming the payload.
    pub fn finalize(&mut self) {
        if let (Some(finalizer), Some(payload)) = (self.finalizer.take(), self.payload.take()) {
            finalizer(self.magic, payload);
        }
    }
}

impl fmt::Debug for DataObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataObj")
            .field("magic", &self.magic)
            .field("has_finalizer", &self.finalizer.is_some())
            .finish()
    }
}

/// Any heap object.
#[derive(Debug)]
pub enum Object {
    /// String buffer
    Str(StrObj),
    /// List
    List(ListObj),
    /// Dict
    Dict(DictObj),
    /// Function
    Function(FnObj),
    /// Host data
    Data(DataObj),
}

impl Object {
    /// Short name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Object::Str(_) => "string",
            Object::List(_) => "list",
            Object::Dict(_) => "dict",
            Object::Function(_) => "fnc",
            Object::Data(_) => "data",
        }
    }
}

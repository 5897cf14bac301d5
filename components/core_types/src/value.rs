//! Tagged value representation.
//!
//! Every runtime datum is a [`Value`]. Values are `Copy`: heap variants carry
//! a [`GcRef`] handle into the collector's arena (plus an offset/length view
//! for strings), so copying a value never copies the object it refers to.

use std::fmt;

/// Handle to an object slot in the heap arena.
///
/// The generation is bumped every time the slot is reused, so a handle that
/// outlived its object is detected instead of silently aliasing a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GcRef {
    /// Slot index in the arena
    pub index: u32,
    /// Slot generation at allocation time
    pub generation: u32,
}

impl GcRef {
    /// Creates a handle from a slot index and generation.
    pub fn new(index: u32, generation: u32) -> Self {
        GcRef { index, generation }
    }
}

/// A byte range over a string buffer.
///
/// Slices share the buffer of their parent: only `offset` and `len` differ,
/// and the GC mark lives once per buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrView {
    /// Backing buffer
    pub buf: GcRef,
    /// First byte of the view within the buffer
    pub offset: u32,
    /// Number of bytes in the view
    pub len: u32,
}

impl StrView {
    /// A view over the whole of a `len`-byte buffer.
    pub fn whole(buf: GcRef, len: usize) -> Self {
        StrView {
            buf,
            offset: 0,
            len: len as u32,
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns true for the empty string.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slices this view with wraparound for negative indices.
    ///
    /// `a` and `b` are clamped into `[0, len]` after adding `len` to negative
    /// values. An inverted range yields an empty view. No bytes are copied.
    ///
    /// # Example
    ///
    /// ```
    /// use core_types::{GcRef, StrView};
    ///
    /// let s = StrView::whole(GcRef::new(0, 0), 11);
    /// let tail = s.substring(-5, 11);
    /// assert_eq!(tail.offset, 6);
    /// assert_eq!(tail.len(), 5);
    /// ```
    pub fn substring(&self, a: i64, b: i64) -> StrView {
        let len = self.len as i64;
        let clamp = |i: i64| {
            let i = if i < 0 { len + i } else { i };
            i.clamp(0, len)
        };
        let a = clamp(a);
        let b = clamp(b).max(a);
        StrView {
            buf: self.buf,
            offset: self.offset + a as u32,
            len: (b - a) as u32,
        }
    }
}

/// Dict flavour carried on the value, not the storage.
///
/// The same table can be viewed with different kinds: `getraw` turns an
/// object into a raw view without copying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DictKind {
    /// Plain table, no prototype or hook semantics
    #[default]
    Raw = 0,
    /// Class-like dict: prototype lookup and `__new__` construction
    Class = 1,
    /// Object dict: prototype lookup, method binding and `__get__`/`__set__`/`__call__` hooks
    Object = 2,
}

/// Value tags in ordering rank.
///
/// Values of different tags compare by this rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Tag {
    /// The None singleton
    None = 0,
    /// Double precision number
    Number = 1,
    /// String view
    Str = 2,
    /// Dict of any kind
    Dict = 3,
    /// List
    List = 4,
    /// Native or bytecode function
    Function = 5,
    /// Opaque host data
    Data = 6,
}

impl Tag {
    /// Name used by `istype` and in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Tag::None => "none",
            Tag::Number => "number",
            Tag::Str => "string",
            Tag::Dict => "dict",
            Tag::List => "list",
            Tag::Function => "fnc",
            Tag::Data => "data",
        }
    }
}

/// A runtime value.
///
/// # Examples
///
/// ```
/// use core_types::{Tag, Value};
///
/// let n = Value::Number(42.0);
/// assert_eq!(n.tag(), Tag::Number);
/// assert!(!n.is_heap());
/// assert_eq!(Value::from_bool(true), Value::Number(1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    /// The None singleton
    #[default]
    None,
    /// Double precision number
    Number(f64),
    /// View over a string buffer
    Str(StrView),
    /// Growable array
    List(GcRef),
    /// Hash table, seen with the given kind
    Dict(GcRef, DictKind),
    /// Native or bytecode function
    Function(GcRef),
    /// Opaque host data with optional finalizer
    Data(GcRef),
}

impl Value {
    /// Number 1, the truthy result of comparisons.
    pub const TRUE: Value = Value::Number(1.0);
    /// Number 0, the falsy result of comparisons.
    pub const FALSE: Value = Value::Number(0.0);

    /// Converts a Rust bool to Number 1 or 0.
    pub fn from_bool(b: bool) -> Value {
        if b {
            Value::TRUE
        } else {
            Value::FALSE
        }
    }

    /// Returns the value's tag.
    pub fn tag(&self) -> Tag {
        match self {
            Value::None => Tag::None,
            Value::Number(_) => Tag::Number,
            Value::Str(_) => Tag::Str,
            Value::List(_) => Tag::List,
            Value::Dict(..) => Tag::Dict,
            Value::Function(_) => Tag::Function,
            Value::Data(_) => Tag::Data,
        }
    }

    /// Returns true for variants backed by arena storage.
    pub fn is_heap(&self) -> bool {
        self.heap_ref().is_some()
    }

    /// Handle of the backing storage, if any.
    pub fn heap_ref(&self) -> Option<GcRef> {
        match *self {
            Value::Str(s) => Some(s.buf),
            Value::List(r) | Value::Dict(r, _) | Value::Function(r) | Value::Data(r) => Some(r),
            Value::None | Value::Number(_) => None,
        }
    }

    /// Returns true for `None`.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// The number payload, if this is a Number.
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The string view, if this is a Str.
    pub fn as_str(&self) -> Option<StrView> {
        match *self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The list handle, if this is a List.
    pub fn as_list(&self) -> Option<GcRef> {
        match *self {
            Value::List(r) => Some(r),
            _ => None,
        }
    }

    /// The dict handle and kind, if this is a Dict.
    pub fn as_dict(&self) -> Option<(GcRef, DictKind)> {
        match *self {
            Value::Dict(r, k) => Some((r, k)),
            _ => None,
        }
    }

    /// The function handle, if this is a Function.
    pub fn as_function(&self) -> Option<GcRef> {
        match *self {
            Value::Function(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the same dict seen with another kind; other values are unchanged.
    pub fn with_kind(self, kind: DictKind) -> Value {
        match self {
            Value::Dict(r, _) => Value::Dict(r, kind),
            other => other,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

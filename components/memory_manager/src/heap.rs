//! Object arena.
//!
//! The heap owns every object in a slot vector addressed by [`GcRef`]
//! handles. Freed slots go on a free list and bump their generation, so a
//! stale handle is reported as an error instead of reaching a new object.
//!
//! New objects are created *tracked*: each allocation runs one collector
//! increment and greys the new value (see [`crate::gc`]). The only untracked
//! objects are the root list and string buffers still being filled.

use crate::object::{DataObj, DictObj, FnObj, ListObj, Object, StrObj};
use core_types::{DictKind, GcRef, StrView, Value, VmError, VmResult};
use std::any::Any;

/// Default number of increments between full collections.
pub const DEFAULT_GC_THRESHOLD: usize = 4096;

/// Allocation and collection counters.
///
/// `live()` returning to a previous value after full collections is how
/// callers observe that garbage was reclaimed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GcStats {
    /// Objects ever allocated
    pub allocated: u64,
    /// Objects freed by sweeps
    pub freed: u64,
    /// Completed full collections
    pub full_collections: u64,
}

impl GcStats {
    /// Objects currently held by the arena.
    pub fn live(&self) -> u64 {
        self.allocated - self.freed
    }
}

#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    pub(crate) marked: bool,
    pub(crate) object: Option<Object>,
}

/// The object arena and collector state.
///
/// # Example
///
/// ```
/// use memory_manager::Heap;
/// use core_types::Value;
///
/// let mut heap = Heap::new();
/// let list = heap.new_list().unwrap();
/// let r = list.as_list().unwrap();
/// heap.list_append(r, Value::Number(1.0)).unwrap();
/// assert_eq!(heap.list_len(r).unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct Heap {
    pub(crate) slots: Vec<Slot>,
    pub(crate) free: Vec<u32>,
    pub(crate) white: Vec<Value>,
    pub(crate) grey: Vec<Value>,
    pub(crate) black: Vec<Value>,
    pub(crate) root: Value,
    pub(crate) steps: usize,
    pub(crate) threshold: usize,
    pub(crate) stats: GcStats,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    /// Creates an empty heap with the default collection threshold.
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_GC_THRESHOLD)
    }

    /// Creates an empty heap that runs a full collection every `threshold` increments.
    pub fn with_threshold(threshold: usize) -> Self {
        Heap {
            slots: Vec::new(),
            free: Vec::new(),
            white: Vec::new(),
            grey: Vec::new(),
            black: Vec::new(),
            root: Value::None,
            steps: 0,
            threshold: threshold.max(1),
            stats: GcStats::default(),
        }
    }

    /// Current counters.
    pub fn stats(&self) -> GcStats {
        self.stats
    }

    /// Increments between full collections.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Sets the root list re-greyed after every full collection.
    pub fn set_root(&mut self, root: Value) {
        self.root = root;
    }

    /// The root list.
    pub fn root(&self) -> Value {
        self.root
    }

    /// Returns true if `r` still names a live object.
    pub fn is_live(&self, r: GcRef) -> bool {
        self.slot(r).is_some()
    }

    pub(crate) fn slot(&self, r: GcRef) -> Option<&Slot> {
        self.slots
            .get(r.index as usize)
            .filter(|slot| slot.generation == r.generation && slot.object.is_some())
    }

    pub(crate) fn slot_mut(&mut self, r: GcRef) -> Option<&mut Slot> {
        self.slots
            .get_mut(r.index as usize)
            .filter(|slot| slot.generation == r.generation && slot.object.is_some())
    }

    fn alloc(&mut self, object: Object) -> GcRef {
        self.stats.allocated += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.marked = false;
            slot.object = Some(object);
            return GcRef::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            marked: false,
            object: Some(object),
        });
        GcRef::new(index, 0)
    }

    /// Registers a freshly built value with the collector.
    ///
    /// Runs one collector increment, then greys `v` so it survives until at
    /// least the next full collection.
    pub fn track(&mut self, v: Value) -> VmResult<Value> {
        self.gc_increment()?;
        self.grey(v);
        Ok(v)
    }

    // ---- object access ----

    /// Borrows the object behind `r`.
    pub fn object(&self, r: GcRef) -> VmResult<&Object> {
        self.slot(r)
            .and_then(|slot| slot.object.as_ref())
            .ok_or_else(|| stale(r))
    }

    /// Mutably borrows the object behind `r`.
    pub fn object_mut(&mut self, r: GcRef) -> VmResult<&mut Object> {
        self.slot_mut(r)
            .and_then(|slot| slot.object.as_mut())
            .ok_or_else(|| stale(r))
    }

    /// Borrows a list.
    pub fn list(&self, r: GcRef) -> VmResult<&ListObj> {
        match self.object(r)? {
            Object::List(list) => Ok(list),
            other => Err(mismatch("list", other)),
        }
    }

    /// Mutably borrows a list.
    pub fn list_mut(&mut self, r: GcRef) -> VmResult<&mut ListObj> {
        match self.object_mut(r)? {
            Object::List(list) => Ok(list),
            other => Err(mismatch("list", other)),
        }
    }

    /// Borrows a dict.
    pub fn dict(&self, r: GcRef) -> VmResult<&DictObj> {
        match self.object(r)? {
            Object::Dict(dict) => Ok(dict),
            other => Err(mismatch("dict", other)),
        }
    }

    /// Mutably borrows a dict.
    pub fn dict_mut(&mut self, r: GcRef) -> VmResult<&mut DictObj> {
        match self.object_mut(r)? {
            Object::Dict(dict) => Ok(dict),
            other => Err(mismatch("dict", other)),
        }
    }

    /// Borrows a function.
    pub fn function(&self, r: GcRef) -> VmResult<&FnObj> {
        match self.object(r)? {
            Object::Function(f) => Ok(f),
            other => Err(mismatch("fnc", other)),
        }
    }

    /// Borrows a data object.
    pub fn data(&self, r: GcRef) -> VmResult<&DataObj> {
        match self.object(r)? {
            Object::Data(data) => Ok(data),
            other => Err(mismatch("data", other)),
        }
    }

    /// Mutably borrows a data object.
    pub fn data_mut(&mut self, r: GcRef) -> VmResult<&mut DataObj> {
        match self.object_mut(r)? {
            Object::Data(data) => Ok(data),
            other => Err(mismatch("data", other)),
        }
    }

    /// Bytes of a string view.
    pub fn str_bytes(&self, s: StrView) -> VmResult<&[u8]> {
        match self.object(s.buf)? {
            Object::Str(obj) => {
                let start = s.offset as usize;
                obj.bytes
                    .get(start..start + s.len())
                    .ok_or_else(|| VmError::runtime_error("string view out of bounds"))
            }
            other => Err(mismatch("string", other)),
        }
    }

    /// Mutable bytes of a whole string buffer, for filling untracked strings.
    pub fn string_buffer_mut(&mut self, r: GcRef) -> VmResult<&mut [u8]> {
        match self.object_mut(r)? {
            Object::Str(obj) => Ok(&mut obj.bytes),
            other => Err(mismatch("string", other)),
        }
    }

    // ---- constructors ----

    /// Allocates an untracked, zero-filled `n`-byte string.
    ///
    /// The caller fills it through [`Heap::string_buffer_mut`] and then
    /// passes it to [`Heap::track`].
    pub fn new_string(&mut self, n: usize) -> Value {
        let r = self.alloc(Object::Str(StrObj {
            bytes: vec![0; n].into_boxed_slice(),
        }));
        Value::Str(StrView::whole(r, n))
    }

    /// Allocates and tracks a string holding a copy of `bytes`.
    pub fn copy_string(&mut self, bytes: &[u8]) -> VmResult<Value> {
        let r = self.alloc(Object::Str(StrObj {
            bytes: bytes.to_vec().into_boxed_slice(),
        }));
        self.track(Value::Str(StrView::whole(r, bytes.len())))
    }

    /// Allocates an untracked empty list.
    ///
    /// Used for the root set, which must never be swept.
    pub fn new_list_untracked(&mut self) -> Value {
        Value::List(self.alloc(Object::List(ListObj::default())))
    }

    /// Allocates and tracks an empty list.
    pub fn new_list(&mut self) -> VmResult<Value> {
        let v = self.new_list_untracked();
        self.track(v)
    }

    /// Allocates and tracks a list holding `items`.
    pub fn list_from(&mut self, items: &[Value]) -> VmResult<Value> {
        let v = Value::List(self.alloc(Object::List(ListObj {
            items: items.to_vec(),
        })));
        self.track(v)?;
        for item in items {
            self.grey(*item);
        }
        Ok(v)
    }

    /// Allocates and tracks an empty dict seen with `kind`.
    pub fn new_dict(&mut self, kind: DictKind) -> VmResult<Value> {
        let r = self.new_dict_ref(kind)?;
        Ok(Value::Dict(r, kind))
    }

    pub(crate) fn new_dict_ref(&mut self, kind: DictKind) -> VmResult<GcRef> {
        let r = self.alloc(Object::Dict(DictObj::default()));
        self.track(Value::Dict(r, kind))?;
        Ok(r)
    }

    /// Allocates and tracks a function.
    pub fn new_function(&mut self, f: FnObj) -> VmResult<Value> {
        let r = self.alloc(Object::Function(f));
        self.track(Value::Function(r))
    }

    /// Allocates and tracks a host data object without a finalizer.
    pub fn new_data(&mut self, magic: i32, payload: Box<dyn Any>) -> VmResult<Value> {
        let r = self.alloc(Object::Data(DataObj {
            magic,
            payload: Some(payload),
            finalizer: None,
        }));
        self.track(Value::Data(r))
    }

    /// Allocates and tracks a host data object whose finalizer runs when it is swept.
    pub fn new_data_with_finalizer(
        &mut self,
        magic: i32,
        payload: Box<dyn Any>,
        finalizer: impl FnOnce(i32, Box<dyn Any>) + 'static,
    ) -> VmResult<Value> {
        let r = self.alloc(Object::Data(DataObj {
            magic,
            payload: Some(payload),
            finalizer: Some(Box::new(finalizer)),
        }));
        self.track(Value::Data(r))
    }

    /// Frees every remaining object, running data finalizers.
    fn release_all(&mut self) {
        for slot in &mut self.slots {
            if let Some(Object::Data(mut data)) = slot.object.take() {
                data.finalize();
            }
        }
    }
}

impl Drop for Heap {
    fn drop(&mut self) {
        self.release_all();
    }
}

fn stale(r: GcRef) -> VmError {
    VmError::runtime_error(format!(
        "stale object handle {}:{}",
        r.index, r.generation
    ))
}

fn mismatch(expected: &str, found: &Object) -> VmError {
    VmError::runtime_error(format!(
        "expected {} object, found {}",
        expected,
        found.kind_name()
    ))
}

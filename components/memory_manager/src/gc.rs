//! Tri-color incremental mark/sweep collector.
//!
//! Objects move between three explicit sets:
//! - *white*: survivors of the previous cycle, freed by the next sweep unless re-marked
//! - *grey*: marked but not yet traversed
//! - *black*: marked and traversed (strings and data objects go here directly)
//!
//! Every allocation performs one increment ([`Heap::gc_increment`]): two
//! grey-list steps. After `threshold` increments with an empty grey list a
//! full collection drains the grey list, sweeps the white set, swaps black
//! into white and re-greys the root's children.
//!
//! Stores into lists and dicts grey the stored value, which keeps the
//! invariant that a black object never points to an unmarked one.

use crate::heap::Heap;
use crate::object::{FnCode, Object};
use core_types::{Value, VmError, VmResult};

/// Mark colour of a value as seen by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkColor {
    /// Not marked this cycle
    White,
    /// Marked, awaiting traversal
    Grey,
    /// Marked and traversed
    Black,
}

impl Heap {
    /// Marks `v` and queues it.
    ///
    /// Non-heap values, stale handles and already marked objects are
    /// ignored. Strings and data objects hold no references and go straight
    /// to the black set.
    pub fn grey(&mut self, v: Value) {
        let Some(r) = v.heap_ref() else {
            return;
        };
        let Some(slot) = self.slot_mut(r) else {
            return;
        };
        if slot.marked {
            return;
        }
        slot.marked = true;
        match v {
            Value::Str(_) | Value::Data(_) => self.black.push(v),
            _ => self.grey.push(v),
        }
    }

    /// Greys every value directly referenced by `v`.
    pub fn follow(&mut self, v: Value) {
        let Some(r) = v.heap_ref() else {
            return;
        };
        match v {
            Value::List(_) => {
                let len = self.list(r).map(|l| l.items.len()).unwrap_or(0);
                for i in 0..len {
                    let item = match self.list(r) {
                        Ok(list) => list.items[i],
                        Err(_) => return,
                    };
                    self.grey(item);
                }
            }
            Value::Dict(..) => {
                let (alloc, meta) = match self.dict(r) {
                    Ok(dict) => (dict.alloc(), dict.meta),
                    Err(_) => return,
                };
                for i in 0..alloc {
                    let item = match self.dict(r) {
                        Ok(dict) => dict.items[i],
                        Err(_) => return,
                    };
                    if item.state == crate::object::SlotState::Occupied {
                        self.grey(item.key);
                        self.grey(item.val);
                    }
                }
                self.grey(meta);
            }
            Value::Function(_) => {
                let Ok(f) = self.function(r).copied() else {
                    return;
                };
                self.grey(f.self_);
                self.grey(f.globals);
                if let FnCode::Bytecode(code) = f.code {
                    self.grey(code);
                }
            }
            _ => {}
        }
    }

    /// Colour of `v` in the current cycle. Non-heap values report black.
    pub fn color(&self, v: Value) -> MarkColor {
        let Some(r) = v.heap_ref() else {
            return MarkColor::Black;
        };
        match self.slot(r) {
            Some(slot) if !slot.marked => MarkColor::White,
            Some(_) if self.grey.iter().any(|g| g.heap_ref() == Some(r)) => MarkColor::Grey,
            _ => MarkColor::Black,
        }
    }

    fn mark_step(&mut self) {
        if let Some(v) = self.grey.pop() {
            self.follow(v);
            self.black.push(v);
        }
    }

    /// One allocation-driven collector increment.
    pub fn gc_increment(&mut self) -> VmResult<()> {
        self.steps += 1;
        if self.steps < self.threshold || !self.grey.is_empty() {
            self.mark_step();
            self.mark_step();
        }
        if self.steps < self.threshold || !self.grey.is_empty() {
            return Ok(());
        }
        self.steps = 0;
        self.full_collect()
    }

    /// Drains the grey list, sweeps, then re-greys the root's children.
    pub fn full_collect(&mut self) -> VmResult<()> {
        while let Some(v) = self.grey.pop() {
            self.follow(v);
            self.black.push(v);
        }
        let before = self.stats.freed;
        self.collect()?;
        self.stats.full_collections += 1;
        let root = self.root;
        self.follow(root);
        tracing::debug!(
            freed = self.stats.freed - before,
            live = self.stats.live(),
            "full collection"
        );
        Ok(())
    }

    fn collect(&mut self) -> VmResult<()> {
        let mut white = std::mem::take(&mut self.white);
        for v in white.iter().copied() {
            let unmarked = v
                .heap_ref()
                .and_then(|r| self.slot(r))
                .map_or(false, |slot| !slot.marked);
            if unmarked {
                self.delete(v)?;
            }
        }
        white.clear();
        self.reset(white);
        Ok(())
    }

    /// Unmarks the black set and makes it the next white set.
    fn reset(&mut self, empty: Vec<Value>) {
        for i in 0..self.black.len() {
            if let Some(r) = self.black[i].heap_ref() {
                if let Some(slot) = self.slot_mut(r) {
                    slot.marked = false;
                }
            }
        }
        self.white = std::mem::replace(&mut self.black, empty);
    }

    /// Frees the object behind `v`.
    ///
    /// Data objects run their finalizer first. A non-heap value here means
    /// the sets are corrupt.
    pub(crate) fn delete(&mut self, v: Value) -> VmResult<()> {
        let r = v
            .heap_ref()
            .ok_or_else(|| VmError::type_error(format!("cannot free {} value", v.tag())))?;
        let Some(slot) = self.slot_mut(r) else {
            return Ok(());
        };
        let object = slot.object.take();
        slot.generation = slot.generation.wrapping_add(1);
        slot.marked = false;
        self.free.push(r.index);
        self.stats.freed += 1;
        if let Some(Object::Data(mut data)) = object {
            data.finalize();
        }
        Ok(())
    }
}

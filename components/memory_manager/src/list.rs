//! List operations.
//!
//! Every store greys the stored value (write barrier).

use crate::heap::Heap;
use crate::object::ListObj;
use core_types::{GcRef, Value, VmError, VmResult};

impl Heap {
    /// Number of elements.
    pub fn list_len(&self, r: GcRef) -> VmResult<usize> {
        Ok(self.list(r)?.items.len())
    }

    /// Elements as a slice.
    pub fn list_items(&self, r: GcRef) -> VmResult<&[Value]> {
        Ok(&self.list(r)?.items)
    }

    fn list_index(&self, r: GcRef, index: i64) -> VmResult<usize> {
        let len = self.list_len(r)?;
        if index < 0 || index as usize >= len {
            return Err(VmError::index_error(format!(
                "list index {} out of range",
                index
            )));
        }
        Ok(index as usize)
    }

    /// Element at `index`; IndexError when out of bounds.
    pub fn list_get(&self, r: GcRef, index: i64) -> VmResult<Value> {
        let i = self.list_index(r, index)?;
        Ok(self.list(r)?.items[i])
    }

    /// Replaces the element at `index`; IndexError when out of bounds.
    pub fn list_set(&mut self, r: GcRef, index: i64, v: Value) -> VmResult<()> {
        let i = self.list_index(r, index)?;
        self.list_mut(r)?.items[i] = v;
        self.grey(v);
        Ok(())
    }

    /// Inserts `v` before `index`, clamping the position into `[0, len]`.
    ///
    /// Negative positions count from the end.
    pub fn list_insert(&mut self, r: GcRef, index: i64, v: Value) -> VmResult<()> {
        let list = self.list_mut(r)?;
        let len = list.items.len() as i64;
        let at = (if index < 0 { len + index } else { index }).clamp(0, len);
        list.reserve(1);
        list.items.insert(at as usize, v);
        self.grey(v);
        Ok(())
    }

    /// Appends `v`.
    pub fn list_append(&mut self, r: GcRef, v: Value) -> VmResult<()> {
        let list = self.list_mut(r)?;
        list.reserve(1);
        list.items.push(v);
        self.grey(v);
        Ok(())
    }

    /// Removes and returns the element at `index`; IndexError when out of bounds.
    pub fn list_pop(&mut self, r: GcRef, index: i64) -> VmResult<Value> {
        let i = self.list_index(r, index)?;
        Ok(self.list_mut(r)?.items.remove(i))
    }

    /// Index of the first element equal to `v`, or None.
    pub fn list_find(&self, r: GcRef, v: Value) -> VmResult<Option<usize>> {
        for (i, item) in self.list(r)?.items.iter().enumerate() {
            if self.equals(*item, v)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    /// Sorts in place with the value ordering.
    pub fn list_sort(&mut self, r: GcRef) -> VmResult<()> {
        let mut items = self.list(r)?.items.clone();
        let mut failure = None;
        items.sort_by(|a, b| match self.cmp(*a, *b) {
            Ok(order) => order,
            Err(err) => {
                failure.get_or_insert(err);
                std::cmp::Ordering::Equal
            }
        });
        if let Some(err) = failure {
            return Err(err);
        }
        self.list_mut(r)?.items = items;
        Ok(())
    }

    /// Appends every element of `other`.
    pub fn list_extend(&mut self, r: GcRef, other: GcRef) -> VmResult<()> {
        let extra = self.list(other)?.items.clone();
        let list = self.list_mut(r)?;
        list.reserve(extra.len());
        list.items.extend_from_slice(&extra);
        for v in extra {
            self.grey(v);
        }
        Ok(())
    }

    /// Removes every element.
    pub fn list_clear(&mut self, r: GcRef) -> VmResult<()> {
        self.list_mut(r)?.items.clear();
        Ok(())
    }

    /// Truncates to `len` elements.
    pub fn list_truncate(&mut self, r: GcRef, len: usize) -> VmResult<()> {
        self.list_mut(r)?.items.truncate(len);
        Ok(())
    }

    /// Shallow copy in new storage.
    pub fn list_copy(&mut self, r: GcRef) -> VmResult<Value> {
        let items = self.list(r)?.items.clone();
        self.list_from(&items)
    }

    /// New list holding elements `[a, b)` after wraparound and clamping.
    pub fn list_slice(&mut self, r: GcRef, a: i64, b: i64) -> VmResult<Value> {
        let len = self.list_len(r)? as i64;
        let clamp = |i: i64| (if i < 0 { len + i } else { i }).clamp(0, len);
        let a = clamp(a) as usize;
        let b = (clamp(b) as usize).max(a);
        let items = self.list(r)?.items[a..b].to_vec();
        self.list_from(&items)
    }

    /// Replaces the contents with `items`, reusing the allocation.
    pub fn list_assign(&mut self, r: GcRef, items: &[Value]) -> VmResult<()> {
        let list: &mut ListObj = self.list_mut(r)?;
        list.items.clear();
        list.reserve(items.len());
        list.items.extend_from_slice(items);
        for v in items {
            self.grey(*v);
        }
        Ok(())
    }
}

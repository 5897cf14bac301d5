//! Open-addressed hash table operations.
//!
//! Probing is linear from `hash & mask`. Empty slots end a probe; tombstones
//! are skipped by lookups and reused by inserts. Before inserting a new key
//! the table grows ×2 when `len >= alloc/2`, otherwise it is rehashed at the
//! same size when `used >= 3*alloc/4` to purge tombstones.

use crate::heap::Heap;
use crate::object::{DictItem, SlotState};
use core_types::{DictKind, GcRef, Value, VmError, VmResult};

const MIN_ALLOC: usize = 8;

impl Heap {
    /// Slot holding `key`, if present.
    pub fn dict_find(&self, r: GcRef, key: Value) -> VmResult<Option<usize>> {
        let hash = self.hash(key)?;
        self.hash_find(r, hash, key)
    }

    fn hash_find(&self, r: GcRef, hash: u32, key: Value) -> VmResult<Option<usize>> {
        let dict = self.dict(r)?;
        let alloc = dict.alloc();
        let mask = dict.mask();
        let start = hash as usize;
        for i in start..start + alloc {
            let n = i & mask;
            let item = &dict.items[n];
            match item.state {
                SlotState::Empty => break,
                SlotState::Tombstone => continue,
                SlotState::Occupied => {
                    if item.hash == hash && self.equals(item.key, key)? {
                        return Ok(Some(n));
                    }
                }
            }
        }
        Ok(None)
    }

    fn hash_set(&mut self, r: GcRef, hash: u32, key: Value, val: Value) -> VmResult<()> {
        let dict = self.dict_mut(r)?;
        let mask = dict.mask();
        let start = hash as usize;
        for i in start..start + dict.alloc() {
            let n = i & mask;
            let item = &mut dict.items[n];
            if item.state == SlotState::Occupied {
                continue;
            }
            if item.state == SlotState::Empty {
                dict.used += 1;
            }
            *item = DictItem {
                state: SlotState::Occupied,
                hash,
                key,
                val,
            };
            dict.len += 1;
            return Ok(());
        }
        Err(VmError::runtime_error("hash table has no free slot"))
    }

    fn dict_realloc(&mut self, r: GcRef, alloc: usize) -> VmResult<()> {
        let alloc = alloc.max(MIN_ALLOC);
        let dict = self.dict_mut(r)?;
        let old = std::mem::replace(&mut dict.items, vec![DictItem::default(); alloc]);
        dict.len = 0;
        dict.used = 0;
        for item in old {
            if item.state == SlotState::Occupied {
                self.hash_set(r, item.hash, item.key, item.val)?;
            }
        }
        Ok(())
    }

    /// Inserts or overwrites `key`.
    pub fn dict_set(&mut self, r: GcRef, key: Value, val: Value) -> VmResult<()> {
        let hash = self.hash(key)?;
        if let Some(n) = self.hash_find(r, hash, key)? {
            self.dict_mut(r)?.items[n].val = val;
        } else {
            let (len, used, alloc) = {
                let dict = self.dict(r)?;
                (dict.len, dict.used, dict.alloc())
            };
            if len >= alloc / 2 {
                self.dict_realloc(r, alloc * 2)?;
            } else if used >= alloc * 3 / 4 {
                self.dict_realloc(r, alloc)?;
            }
            self.hash_set(r, hash, key, val)?;
        }
        self.grey(key);
        self.grey(val);
        Ok(())
    }

    /// Value for `key`; KeyError when missing.
    pub fn dict_get(&self, r: GcRef, key: Value) -> VmResult<Value> {
        match self.dict_lookup(r, key)? {
            Some(v) => Ok(v),
            None => Err(VmError::key_error(self.display(key))),
        }
    }

    /// Value for `key`, or None when missing.
    pub fn dict_lookup(&self, r: GcRef, key: Value) -> VmResult<Option<Value>> {
        Ok(self
            .dict_find(r, key)?
            .map(|n| self.dict(r).map(|d| d.items[n].val))
            .transpose()?)
    }

    /// Returns true if `key` is present.
    pub fn dict_has(&self, r: GcRef, key: Value) -> VmResult<bool> {
        Ok(self.dict_find(r, key)?.is_some())
    }

    /// Removes `key`, leaving a tombstone; KeyError when missing.
    pub fn dict_del(&mut self, r: GcRef, key: Value) -> VmResult<()> {
        let n = self
            .dict_find(r, key)?
            .ok_or_else(|| VmError::key_error(self.display(key)))?;
        let dict = self.dict_mut(r)?;
        dict.items[n].state = SlotState::Tombstone;
        dict.len -= 1;
        Ok(())
    }

    /// Occupied slot count.
    pub fn dict_len(&self, r: GcRef) -> VmResult<usize> {
        Ok(self.dict(r)?.len)
    }

    /// Advances the iteration cursor to the next occupied slot.
    ///
    /// RuntimeError on an empty table.
    pub fn dict_next(&mut self, r: GcRef) -> VmResult<usize> {
        let dict = self.dict_mut(r)?;
        if dict.len == 0 {
            return Err(VmError::runtime_error("iterating over an empty dict"));
        }
        let mask = dict.mask();
        loop {
            dict.cursor = (dict.cursor + 1) & mask;
            if dict.items[dict.cursor].state == SlotState::Occupied {
                return Ok(dict.cursor);
            }
        }
    }

    /// Key at the next cursor position.
    pub fn dict_next_key(&mut self, r: GcRef) -> VmResult<Value> {
        let n = self.dict_next(r)?;
        Ok(self.dict(r)?.items[n].key)
    }

    /// Occupied keys in slot order.
    pub fn dict_keys(&self, r: GcRef) -> VmResult<Vec<Value>> {
        Ok(self.dict(r)?.pairs().map(|(k, _)| k).collect())
    }

    /// Shallow copy seen as a class dict, keeping the meta link.
    pub fn dict_copy(&mut self, r: GcRef) -> VmResult<Value> {
        let c = self.new_dict_ref(DictKind::Class)?;
        let source = self.dict(r)?.clone();
        let copy = self.dict_mut(c)?;
        *copy = source;
        copy.cursor = 0;
        Ok(Value::Dict(c, DictKind::Class))
    }

    /// Sets every key of `src` into `dst`.
    pub fn dict_merge(&mut self, dst: GcRef, src: GcRef) -> VmResult<()> {
        let pairs: Vec<(Value, Value)> = self.dict(src)?.pairs().collect();
        for (k, v) in pairs {
            self.dict_set(dst, k, v)?;
        }
        Ok(())
    }

    /// New dict of `kind` holding `pairs` laid out as key, value, key, value...
    pub fn dict_from_pairs(&mut self, kind: DictKind, pairs: &[Value]) -> VmResult<Value> {
        let r = self.new_dict_ref(kind)?;
        for pair in pairs.chunks_exact(2) {
            self.dict_set(r, pair[0], pair[1])?;
        }
        Ok(Value::Dict(r, kind))
    }

    /// Prototype link.
    pub fn dict_meta(&self, r: GcRef) -> VmResult<Value> {
        Ok(self.dict(r)?.meta)
    }

    /// Replaces the prototype link.
    pub fn set_dict_meta(&mut self, r: GcRef, meta: Value) -> VmResult<()> {
        self.dict_mut(r)?.meta = meta;
        self.grey(meta);
        Ok(())
    }
}

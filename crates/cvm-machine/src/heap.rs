// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use cvm_codec::Value;
use cvm_types::VmError;

/// a bump-allocated region of addressable, tagged slots.
/// there is no garbage collector: `new` only ever appends at the
/// high-water mark `HP`, and `free`/frame unwinding only ever zero or
/// trim it back. `free` writes a zero value of the slot's own tag rather
/// than reclaiming it — a freed slot stays loadable/savable.
pub struct Heap {
    slots: Vec<Value>,
    capacity: usize,
}

impl Heap {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// the high-water mark: one past the highest slot ever allocated.
    pub fn hp(&self) -> usize {
        self.slots.len()
    }

    /// appends `value` at `HP`, returns its index.
    pub fn new_slot(&mut self, value: Value) -> Result<usize, VmError> {
        if self.slots.len() >= self.capacity {
            return Err(VmError::Overflow(format!(
                "heap overflow: capacity {} exceeded",
                self.capacity
            )));
        }
        let index = self.slots.len();
        self.slots.push(value);
        Ok(index)
    }

    pub fn load(&self, index: usize) -> Result<Value, VmError> {
        self.slots
            .get(index)
            .cloned()
            .ok_or_else(|| VmError::OutOfBounds(format!("heap index {} is not allocated", index)))
    }

    /// the tag-preservation invariant: a slot's tag is fixed for its
    /// lifetime once `new_slot` initializes it.
    pub fn save(&mut self, index: usize, value: Value) -> Result<(), VmError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| VmError::OutOfBounds(format!("heap index {} is not allocated", index)))?;
        if slot.tag() != value.tag() {
            return Err(VmError::TypeMismatch(format!(
                "heap slot {} holds {}, can't save a {}",
                index,
                slot.tag().name(),
                value.tag().name()
            )));
        }
        *slot = value;
        Ok(())
    }

    /// writes a zero value of the slot's own tag; does not shrink `HP` or
    /// otherwise reclaim the slot, which stays loadable/savable.
    pub fn free(&mut self, index: usize) -> Result<(), VmError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| VmError::OutOfBounds(format!("heap index {} is not allocated", index)))?;
        *slot = slot.zeroed_like()?;
        Ok(())
    }

    /// trims `HP` back to `len`, used when a call/block frame unwinds.
    pub fn truncate(&mut self, len: usize) {
        self.slots.truncate(len);
    }

    /// every slot up to `HP`. Used by `trace()`.
    pub fn slots(&self) -> &[Value] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_slot_appends_at_hp_and_returns_its_index() {
        let mut heap = Heap::new(4);
        let i0 = heap.new_slot(Value::from_i32(1)).unwrap();
        let i1 = heap.new_slot(Value::from_i32(2)).unwrap();
        assert_eq!(i0, 0);
        assert_eq!(i1, 1);
        assert_eq!(heap.hp(), 2);
    }

    #[test]
    fn load_returns_what_was_saved() {
        let mut heap = Heap::new(4);
        let i = heap.new_slot(Value::from_i32(7)).unwrap();
        assert_eq!(heap.load(i).unwrap().as_i32().unwrap(), 7);
    }

    #[test]
    fn load_past_hp_fails() {
        let heap = Heap::new(4);
        assert!(heap.load(0).is_err());
    }

    #[test]
    fn save_with_matching_tag_replaces_the_value() {
        let mut heap = Heap::new(4);
        let i = heap.new_slot(Value::from_i32(1)).unwrap();
        heap.save(i, Value::from_i32(2)).unwrap();
        assert_eq!(heap.load(i).unwrap().as_i32().unwrap(), 2);
    }

    #[test]
    fn save_with_mismatched_tag_fails() {
        let mut heap = Heap::new(4);
        let i = heap.new_slot(Value::from_i32(1)).unwrap();
        assert!(heap.save(i, Value::from_bool(true)).is_err());
    }

    #[test]
    fn free_zeroes_without_shrinking_hp() {
        let mut heap = Heap::new(4);
        let i = heap.new_slot(Value::from_i32(1)).unwrap();
        heap.free(i).unwrap();
        assert_eq!(heap.hp(), 1);
        assert_eq!(heap.load(i).unwrap().as_i32().unwrap(), 0);
    }

    #[test]
    fn free_then_save_still_works_since_the_slot_stays_allocated() {
        let mut heap = Heap::new(4);
        let i = heap.new_slot(Value::from_i32(1)).unwrap();
        heap.free(i).unwrap();
        heap.save(i, Value::from_i32(9)).unwrap();
        assert_eq!(heap.load(i).unwrap().as_i32().unwrap(), 9);
    }

    #[test]
    fn free_on_a_list_slot_preserves_its_element_tag_and_empties_it() {
        use cvm_types::Tag;
        let mut heap = Heap::new(4);
        let list = Value::list_from_raw(Tag::i32, 1, Value::from_i32(7).to_bytes());
        let i = heap.new_slot(list).unwrap();
        heap.free(i).unwrap();
        let zeroed = heap.load(i).unwrap();
        assert_eq!(zeroed.elem_tag().unwrap(), Tag::i32);
        assert_eq!(zeroed.len().unwrap(), 0);
    }

    #[test]
    fn new_slot_past_capacity_fails() {
        let mut heap = Heap::new(1);
        heap.new_slot(Value::from_i32(1)).unwrap();
        assert!(heap.new_slot(Value::from_i32(2)).is_err());
    }
}

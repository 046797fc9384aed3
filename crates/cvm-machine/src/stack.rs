// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use cvm_codec::Value;
use cvm_types::VmError;

/// the operand stack: fixed-capacity, LIFO.
pub struct Stack {
    data: Vec<Value>,
    capacity: usize,
}

impl Stack {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push(&mut self, value: Value) -> Result<(), VmError> {
        if self.data.len() >= self.capacity {
            return Err(VmError::Overflow(format!(
                "stack overflow: capacity {} exceeded",
                self.capacity
            )));
        }
        self.data.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Value, VmError> {
        self.data
            .pop()
            .ok_or_else(|| VmError::OutOfBounds("stack underflow".to_string()))
    }

    /// a read without removing it, used by `trace()`.
    pub fn peek(&self, depth_from_top: usize) -> Option<&Value> {
        let len = self.data.len();
        if depth_from_top >= len {
            return None;
        }
        self.data.get(len - 1 - depth_from_top)
    }

    /// truncates the stack back to `len`, discarding everything above it.
    /// used when a call/block frame unwinds.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pushes_and_pops_in_lifo_order() {
        let mut stack = Stack::new(4);
        stack.push(Value::from_i32(1)).unwrap();
        stack.push(Value::from_i32(2)).unwrap();
        assert_eq!(stack.pop().unwrap().as_i32().unwrap(), 2);
        assert_eq!(stack.pop().unwrap().as_i32().unwrap(), 1);
    }

    #[test]
    fn pop_on_empty_stack_fails() {
        let mut stack = Stack::new(4);
        assert!(stack.pop().is_err());
    }

    #[test]
    fn push_past_capacity_fails() {
        let mut stack = Stack::new(1);
        stack.push(Value::from_i32(1)).unwrap();
        assert!(stack.push(Value::from_i32(2)).is_err());
    }

    #[test]
    fn truncate_discards_everything_above_the_given_length() {
        let mut stack = Stack::new(4);
        stack.push(Value::from_i32(1)).unwrap();
        stack.push(Value::from_i32(2)).unwrap();
        stack.push(Value::from_i32(3)).unwrap();
        stack.truncate(1);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop().unwrap().as_i32().unwrap(), 1);
    }
}

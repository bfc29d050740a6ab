use crate::error::Error;

use super::value::ObjRef;

/// Bounded operand stack. Every entry is a collection root.
pub struct Stack {
    items: Vec<ObjRef>,
    capacity: usize,
}

impl Stack {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: vec![],
            capacity,
        }
    }

    pub fn push(&mut self, ptr: ObjRef) -> Result<(), Error> {
        if self.items.len() >= self.capacity {
            return Error::stack_overflow(self.capacity).err();
        }

        self.items.push(ptr);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<ObjRef, Error> {
        self.items.pop().ok_or_else(Error::stack_underflow)
    }

    /// Reads the entry `depth` places below the top without removing it.
    pub fn peek(&self, depth: usize) -> Result<ObjRef, Error> {
        self.items
            .len()
            .checked_sub(depth + 1)
            .map(|i| self.items[i])
            .ok_or_else(Error::stack_underflow)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn roots(&self) -> &[ObjRef] {
        &self.items
    }
}

use crate::error::Error;

use super::{
    config::VmConfig,
    heap::{Alloc, CollectStats, Heap},
    stack::Stack,
    value::{ObjRef, Object},
};

/// A stack machine owning one collected heap. The operand stack is the only
/// root set: anything not reachable from it is reclaimed at the next cycle.
pub struct Vm {
    heap: Heap,
    stack: Stack,
    config: VmConfig,
    torn_down: bool,
}

impl Vm {
    pub fn new(config: VmConfig) -> Self {
        Self {
            heap: Heap::new(config.initial_threshold).with_min_threshold(config.min_threshold),
            stack: Stack::new(config.stack_max),
            config,
            torn_down: false,
        }
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Allocates a new unmarked object, running a full collection first when
    /// the live count has reached the threshold.
    pub fn allocate(&mut self, value: Object) -> Result<ObjRef, Error> {
        if self.heap.should_collect() {
            self.collect();
        }

        self.heap.alloc(value)
    }

    /// Roots a handle the caller already holds. A handle whose object was
    /// reclaimed is refused, so every root on the stack stays live.
    pub fn push(&mut self, ptr: ObjRef) -> Result<(), Error> {
        if !self.heap.contains(ptr) {
            return Error::dangling_reference(ptr).err();
        }

        self.stack.push(ptr)
    }

    pub fn pop(&mut self) -> Result<ObjRef, Error> {
        self.stack.pop()
    }

    pub fn peek(&self) -> Result<ObjRef, Error> {
        self.stack.peek(0)
    }

    pub fn clear_roots(&mut self) {
        self.stack.clear();
    }

    pub fn push_int(&mut self, value: i32) -> Result<ObjRef, Error> {
        if self.stack.len() >= self.stack.capacity() {
            return Error::stack_overflow(self.stack.capacity()).err();
        }

        let ptr = self.allocate(Object::Scalar(value))?;
        self.stack.push(ptr)?;
        Ok(ptr)
    }

    /// Pops two roots and pushes a cell referencing them. The operands stay on
    /// the stack until the cell exists, so a collection triggered by the
    /// allocation cannot reclaim them.
    pub fn push_pair(&mut self) -> Result<ObjRef, Error> {
        let second = self.stack.peek(0)?;
        let first = self.stack.peek(1)?;

        let cell = self.allocate(Object::Cell(first, second))?;
        self.stack.pop()?;
        self.stack.pop()?;
        self.stack.push(cell)?;
        Ok(cell)
    }

    pub fn dup(&mut self) -> Result<ObjRef, Error> {
        let top = self.stack.peek(0)?;
        self.stack.push(top)?;
        Ok(top)
    }

    /// Pops a value and stores it as the first member of the cell below it.
    pub fn set_first(&mut self) -> Result<(), Error> {
        let value = self.stack.peek(0)?;
        let cell = self.stack.peek(1)?;
        self.heap.set_first(cell, value)?;
        self.stack.pop().map(drop)
    }

    /// Pops a value and stores it as the second member of the cell below it.
    pub fn set_second(&mut self) -> Result<(), Error> {
        let value = self.stack.peek(0)?;
        let cell = self.stack.peek(1)?;
        self.heap.set_second(cell, value)?;
        self.stack.pop().map(drop)
    }

    pub fn collect(&mut self) -> CollectStats {
        let stats = match self.heap.collect(self.stack.roots()) {
            Ok(stats) => stats,
            Err(e) => unreachable!("stack holds a reclaimed root: {}", e),
        };
        if self.config.report_collections {
            eprintln!("{}", stats);
        }

        stats
    }

    pub fn render(&self, ptr: ObjRef) -> Result<String, Error> {
        self.heap.to_string(ptr)
    }

    pub fn print_object(&self, ptr: ObjRef) -> Result<(), Error> {
        print!("{}", self.render(ptr)?);
        Ok(())
    }

    pub fn shutdown(mut self) -> CollectStats {
        self.teardown()
    }

    fn teardown(&mut self) -> CollectStats {
        self.torn_down = true;
        self.stack.clear();
        let stats = self.collect();
        log::info!("vm torn down, {} objects released", stats.collected);
        stats
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new(VmConfig::default())
    }
}

impl Drop for Vm {
    fn drop(&mut self) {
        if !self.torn_down {
            self.teardown();
        }
    }
}

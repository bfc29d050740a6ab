use core::fmt;
use std::collections::HashSet;

use colored::Colorize;

use crate::error::Error;

use super::value::{HeapObject, ObjRef, Object};

#[derive(Debug)]
enum Slot {
    Live {
        generation: u32,
        obj: HeapObject,
    },
    Free {
        generation: u32,
        next: Option<usize>,
    },
}

/// A location holding a link of the intrusive object list: either the heap
/// head or the `next` field of a live object.
#[derive(Clone, Copy)]
enum Link {
    Head,
    After(ObjRef),
}

/// Pending rendering work, processed from a stack so deep chains do not
/// recurse.
enum Render {
    Object(ObjRef),
    Text(&'static str),
    Leave(ObjRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectStats {
    pub before: usize,
    pub collected: usize,
    pub remaining: usize,
    pub threshold: usize,
}

impl fmt::Display for CollectStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Collected {} objects, {} remaining.",
            self.collected, self.remaining
        )
    }
}

pub trait Alloc<P> {
    fn access(&self, ptr: P) -> Option<&HeapObject>;

    fn access_mut(&mut self, ptr: P) -> Option<&mut HeapObject>;

    fn alloc(&mut self, value: Object) -> Result<P, Error>;
}

pub struct Heap {
    slots: Vec<Slot>,
    free: Option<usize>,
    head: Option<ObjRef>,
    count: usize,
    threshold: usize,
    min_threshold: usize,
}

impl Heap {
    pub fn new(threshold: usize) -> Self {
        Self {
            slots: vec![],
            free: None,
            head: None,
            count: 0,
            threshold,
            min_threshold: 0,
        }
    }

    pub fn with_min_threshold(self, min_threshold: usize) -> Self {
        Self {
            min_threshold,
            threshold: self.threshold.max(min_threshold),
            ..self
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn should_collect(&self) -> bool {
        self.count >= self.threshold
    }

    pub fn contains(&self, ptr: ObjRef) -> bool {
        self.access(ptr).is_some()
    }

    pub fn is_marked(&self, ptr: ObjRef) -> Option<bool> {
        self.access(ptr).map(HeapObject::marked)
    }

    /// Walks the intrusive list from the head, newest object first.
    pub fn iter(&self) -> impl Iterator<Item = (ObjRef, &HeapObject)> + '_ {
        std::iter::successors(self.head.map(|p| (p, self.live(p))), move |(_, obj)| {
            obj.next.map(|p| (p, self.live(p)))
        })
    }

    fn checked(&self, ptr: ObjRef) -> Result<&HeapObject, Error> {
        self.access(ptr)
            .ok_or_else(|| Error::dangling_reference(ptr))
    }

    fn checked_mut(&mut self, ptr: ObjRef) -> Result<&mut HeapObject, Error> {
        self.access_mut(ptr)
            .ok_or_else(|| Error::dangling_reference(ptr))
    }

    // Only for references the heap itself keeps live: list links and the
    // members of live cells.
    fn live(&self, ptr: ObjRef) -> &HeapObject {
        match self.access(ptr) {
            Some(obj) => obj,
            None => unreachable!("internal reference {} points at a free slot", ptr),
        }
    }

    fn live_mut(&mut self, ptr: ObjRef) -> &mut HeapObject {
        match self.access_mut(ptr) {
            Some(obj) => obj,
            None => unreachable!("internal reference {} points at a free slot", ptr),
        }
    }

    fn link_mut(&mut self, link: Link) -> &mut Option<ObjRef> {
        match link {
            Link::Head => &mut self.head,
            Link::After(ptr) => &mut self.live_mut(ptr).next,
        }
    }

    fn claim_slot(&mut self, obj: HeapObject) -> Result<ObjRef, Error> {
        let (index, generation) = match self.free {
            Some(index) => {
                let (generation, next) = match self.slots[index] {
                    Slot::Free { generation, next } => (generation, next),
                    Slot::Live { .. } => unreachable!("free list points at a live slot"),
                };
                self.free = next;
                self.slots[index] = Slot::Live { generation, obj };
                (index, generation)
            }
            None => {
                let index = self.slots.len();
                if u32::try_from(index).is_err() {
                    return Error::allocation_failure(self.count).err();
                }

                if self.slots.len() == self.slots.capacity() {
                    let additional = self.slots.len().max(8);
                    self.slots
                        .try_reserve(additional)
                        .map_err(|_| Error::allocation_failure(self.count))?;
                    log::debug!("heap grew to {} slots", self.slots.capacity());
                }

                self.slots.push(Slot::Live { generation: 0, obj });
                (index, 0)
            }
        };

        Ok(ObjRef::new(index as u32, generation))
    }

    fn release(&mut self, ptr: ObjRef) {
        log::trace!("reclaiming {}", ptr);
        self.slots[ptr.index()] = Slot::Free {
            generation: ptr.generation().wrapping_add(1),
            next: self.free,
        };
        self.free = Some(ptr.index());
        self.count -= 1;
    }

    pub fn set_first(&mut self, cell: ObjRef, target: ObjRef) -> Result<(), Error> {
        self.checked(target)?;
        match &mut self.checked_mut(cell)?.value {
            Object::Cell(first, _) => {
                *first = target;
                Ok(())
            }
            other => Error::not_a_cell(cell, other.type_name()).err(),
        }
    }

    pub fn set_second(&mut self, cell: ObjRef, target: ObjRef) -> Result<(), Error> {
        self.checked(target)?;
        match &mut self.checked_mut(cell)?.value {
            Object::Cell(_, second) => {
                *second = target;
                Ok(())
            }
            other => Error::not_a_cell(cell, other.type_name()).err(),
        }
    }

    pub fn mark(&mut self, ptr: ObjRef) -> Result<(), Error> {
        self.mark_from_roots(std::slice::from_ref(&ptr))
    }

    /// Marks everything reachable from `roots`. Every root is checked before
    /// any bit is set, so a dangling root leaves the heap untouched.
    pub fn mark_from_roots(&mut self, roots: &[ObjRef]) -> Result<(), Error> {
        for &root in roots {
            self.checked(root)?;
        }

        let mut worklist = roots.to_vec();
        while let Some(ptr) = worklist.pop() {
            let obj = self.live_mut(ptr);
            // Already visited: terminates cycles and shared references
            if obj.marked {
                continue;
            }

            obj.marked = true;
            worklist.extend(obj.value.children());
        }

        Ok(())
    }

    pub fn sweep(&mut self) -> usize {
        let mut cursor = Link::Head;
        let mut freed = 0;

        while let Some(ptr) = *self.link_mut(cursor) {
            let obj = self.live_mut(ptr);
            if obj.marked {
                obj.marked = false;
                cursor = Link::After(ptr);
                continue;
            }

            let next = obj.next;
            *self.link_mut(cursor) = next;
            self.release(ptr);
            freed += 1;
        }

        freed
    }

    pub fn collect(&mut self, roots: &[ObjRef]) -> Result<CollectStats, Error> {
        let before = self.count;

        self.mark_from_roots(roots)?;
        let collected = self.sweep();

        self.threshold = (self.count * 2).max(self.min_threshold);
        log::debug!(
            "gc cycle: {} roots, {} -> {} objects, next collection at {}",
            roots.len(),
            before,
            self.count,
            self.threshold
        );

        Ok(CollectStats {
            before,
            collected,
            remaining: self.count,
            threshold: self.threshold,
        })
    }

    /// Renders an object as a decimal or a `(first,second)` tree. A back edge
    /// into a cell that is still being rendered prints as `...`.
    pub fn to_string(&self, ptr: ObjRef) -> Result<String, Error> {
        self.checked(ptr)?;

        let mut out = String::new();
        let mut path = HashSet::new();
        let mut pending = vec![Render::Object(ptr)];

        while let Some(item) = pending.pop() {
            match item {
                Render::Text(text) => out.push_str(text),
                Render::Leave(cell) => {
                    path.remove(&cell);
                }
                Render::Object(ptr) => match self.live(ptr).value {
                    Object::Scalar(v) => out.push_str(&v.to_string()),
                    Object::Cell(_, _) if path.contains(&ptr) => out.push_str("..."),
                    Object::Cell(first, second) => {
                        path.insert(ptr);
                        out.push('(');
                        pending.extend([
                            Render::Leave(ptr),
                            Render::Text(")"),
                            Render::Object(second),
                            Render::Text(","),
                            Render::Object(first),
                        ]);
                    }
                },
            }
        }

        Ok(out)
    }

    pub fn dump(&self) {
        println!(
            "{} count = {} threshold = {} slots = {}",
            "Heap Dump".cyan(),
            self.count,
            self.threshold,
            self.slots.len()
        );
        for (ptr, obj) in self.iter() {
            let value = match obj.value {
                Object::Scalar(v) => format!("{}", v),
                Object::Cell(first, second) => format!("({}, {})", first, second),
            };
            println!(
                "H({}) = {} {}",
                ptr,
                obj.value.type_name().green(),
                value
            );
        }
    }
}

impl Alloc<ObjRef> for Heap {
    fn alloc(&mut self, value: Object) -> Result<ObjRef, Error> {
        let ptr = self.claim_slot(HeapObject::new(value, self.head))?;
        self.head = Some(ptr);
        self.count += 1;
        Ok(ptr)
    }

    fn access(&self, ptr: ObjRef) -> Option<&HeapObject> {
        match self.slots.get(ptr.index()) {
            Some(Slot::Live { generation, obj }) if *generation == ptr.generation() => Some(obj),
            _ => None,
        }
    }

    fn access_mut(&mut self, ptr: ObjRef) -> Option<&mut HeapObject> {
        match self.slots.get_mut(ptr.index()) {
            Some(Slot::Live { generation, obj }) if *generation == ptr.generation() => Some(obj),
            _ => None,
        }
    }
}

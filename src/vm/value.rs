use core::fmt;

/// Handle to an object living in a [`Heap`](super::heap::Heap) slot. The
/// generation changes every time the slot is released, so a handle outliving
/// its object never resolves to whatever reuses the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjRef {
    index: u32,
    generation: u32,
}

impl ObjRef {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Object {
    Scalar(i32),
    Cell(ObjRef, ObjRef),
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Scalar(_) => "Scalar",
            Object::Cell(_, _) => "Cell",
        }
    }

    pub fn children(&self) -> impl Iterator<Item = ObjRef> {
        let edges = match *self {
            Object::Scalar(_) => None,
            Object::Cell(first, second) => Some([first, second]),
        };
        edges.into_iter().flatten()
    }
}

/// A live heap node. `next` threads every live object in allocation order,
/// independently of the cell edges the marker follows.
#[derive(Debug)]
pub struct HeapObject {
    pub(super) marked: bool,
    pub(super) next: Option<ObjRef>,
    pub(super) value: Object,
}

impl HeapObject {
    pub(super) fn new(value: Object, next: Option<ObjRef>) -> Self {
        Self {
            marked: false,
            next,
            value,
        }
    }

    pub fn marked(&self) -> bool {
        self.marked
    }

    pub fn next(&self) -> Option<ObjRef> {
        self.next
    }

    pub fn value(&self) -> &Object {
        &self.value
    }
}

//! Opaque handles for rigs and picker entries.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Stable rig identity, assigned at creation and never reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RigHandle(pub u32);

/// One entry of the currently open resource picker.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ResourceHandle(pub u32);

impl From<u32> for RigHandle {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<u32> for ResourceHandle {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Monotonic allocator for one kind of handle.
#[derive(Debug)]
pub struct IdAllocator<H> {
    next: u32,
    _kind: PhantomData<H>,
}

impl<H> Default for IdAllocator<H> {
    fn default() -> Self {
        Self {
            next: 0,
            _kind: PhantomData,
        }
    }
}

impl<H: From<u32>> IdAllocator<H> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> H {
        let id = H::from(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

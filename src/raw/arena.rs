use alloc::vec::Vec;

use super::handle::Handle;

/// Slot storage for tree nodes.
///
/// Nodes never move once allocated; a removed node's slot is recycled by the
/// next allocation.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    vacant: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            vacant: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of occupied slots.
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.vacant.len())
    }

    pub(crate) fn insert(&mut self, element: T) -> Handle {
        if let Some(handle) = self.vacant.pop() {
            self.slots[handle.slot()] = Some(element);
            return handle;
        }

        // Strict less-than: after the push there are at most `Handle::MAX` slots.
        assert!(
            self.slots.len() < Handle::MAX,
            "`Arena::insert()` - arena is full ({} slots)",
            Handle::MAX
        );
        self.slots.push(Some(element));
        Handle::from_slot(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.slot()] {
            Some(element) => element,
            None => panic!("`Arena::get()` - {handle:?} refers to a vacant slot"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.slot()] {
            Some(element) => element,
            None => panic!("`Arena::get_mut()` - {handle:?} refers to a vacant slot"),
        }
    }

    /// Vacates the slot and hands back its element.
    pub(crate) fn remove(&mut self, handle: Handle) -> T {
        let Some(element) = self.slots[handle.slot()].take() else {
            panic!("`Arena::remove()` - {handle:?} refers to a vacant slot");
        };
        self.vacant.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
    }
}

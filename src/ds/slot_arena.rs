//! Backing storage for [`RecencyList`](crate::ds::RecencyList) nodes.
//!
//! Vacated slots go on a free list and are handed out again before the
//! vector grows. A cache that only rotates its anchor at capacity never
//! touches the free list at all, so `allocated()` stays at `capacity + 1`.

/// Stable handle to a node slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

#[derive(Debug)]
pub(crate) struct SlotArena<T> {
    slots: Vec<Option<T>>,
    vacant: Vec<usize>,
    occupied: usize,
}

impl<T> SlotArena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            vacant: Vec::new(),
            occupied: 0,
        }
    }

    /// Stores `value`, reusing a vacant slot when one exists.
    pub(crate) fn insert(&mut self, value: T) -> SlotId {
        let idx = match self.vacant.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                idx
            }
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            }
        };
        self.occupied += 1;
        SlotId(idx)
    }

    pub(crate) fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.vacant.push(id.0);
        self.occupied -= 1;
        Some(value)
    }

    pub(crate) fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    pub(crate) fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.occupied
    }

    /// Slots ever allocated, occupied or vacant.
    pub(crate) fn allocated(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
        self.occupied = 0;
    }
}

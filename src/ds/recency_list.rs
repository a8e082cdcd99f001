//! Circular doubly linked recency list backed by `SlotArena`.
//!
//! Nodes live in a `SlotArena` and link to each other by `SlotId`. One node,
//! the *anchor*, never carries an entry and marks both ends of the list.
//!
//! ## Architecture
//!
//! ```text
//!            ┌────────────────────────────────────────────────────┐
//!            ▼                                                    │
//!   ┌──────────────┐ next  ┌──────┐ next  ┌──────┐ next  ┌──────┐ │
//!   │    anchor    │──────►│  A   │──────►│  B   │──────►│  C   │─┘
//!   │ (no entry)   │◄──────│oldest│◄──────│      │◄──────│newest│
//!   └──────────────┘ prev  └──────┘ prev  └──────┘ prev  └──────┘
//!          ▲                                                 │
//!          └──────────────────── prev ───────────────────────┘
//! ```
//!
//! - `anchor.next` is the oldest entry (next eviction candidate).
//! - `anchor.prev` is the newest entry.
//! - An empty list is the anchor linked to itself.
//!
//! ## Anchor rotation
//!
//! When a full cache admits a new key, [`RecencyList::rotate_anchor`] writes
//! the new entry into the current anchor slot and turns the oldest node into
//! the new anchor. No node is allocated, freed or relinked.
//!
//! ```text
//!   before:  [anchor] ─► A ─► B ─► C ─► [anchor]
//!   rotate(D):
//!            [  D   ] ─► [anchor'] ─► B ─► C ─► [D]
//!   A's slot is now the anchor; D sits just before it (newest).
//! ```
//!
//! ## Performance
//! - `push_newest` / `pop_oldest` / `pop_newest`: O(1)
//! - `move_to_newest` / `remove`: O(1)
//! - `rotate_anchor`: O(1), no allocation
//! - `iter`: O(n)

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Link<K, V> {
    prev: SlotId,
    next: SlotId,
    entry: Option<(K, V)>,
}

/// Recency-ordered list of `(K, V)` entries with a sentinel anchor.
#[derive(Debug)]
pub struct RecencyList<K, V> {
    arena: SlotArena<Link<K, V>>,
    anchor: SlotId,
}

impl<K, V> RecencyList<K, V> {
    /// Creates an anchor-only list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an anchor-only list with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arena = SlotArena::with_capacity(capacity.saturating_add(1));
        let anchor = Self::insert_anchor(&mut arena);
        Self { arena, anchor }
    }

    fn insert_anchor(arena: &mut SlotArena<Link<K, V>>) -> SlotId {
        let id = arena.insert(Link {
            prev: SlotId(0),
            next: SlotId(0),
            entry: None,
        });
        if let Some(link) = arena.get_mut(id) {
            link.prev = id;
            link.next = id;
        }
        id
    }

    /// Number of live entries (the anchor is not counted).
    pub fn len(&self) -> usize {
        self.arena.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Node slots held by the backing arena, including the anchor and any
    /// vacated slots awaiting reuse.
    pub fn allocated_slots(&self) -> usize {
        self.arena.allocated()
    }

    /// Returns the current anchor handle.
    pub fn anchor_id(&self) -> SlotId {
        self.anchor
    }

    /// Returns `true` if `id` refers to a live entry.
    pub fn contains(&self, id: SlotId) -> bool {
        id != self.anchor && self.arena.contains(id)
    }

    /// Handle of the oldest entry, the next eviction candidate.
    pub fn oldest_id(&self) -> Option<SlotId> {
        let id = self.next_of(self.anchor);
        (id != self.anchor).then_some(id)
    }

    /// Handle of the newest entry.
    pub fn newest_id(&self) -> Option<SlotId> {
        let id = self.prev_of(self.anchor);
        (id != self.anchor).then_some(id)
    }

    /// Handle of the entry after `id` in oldest → newest order.
    pub fn successor(&self, id: SlotId) -> Option<SlotId> {
        if !self.contains(id) {
            return None;
        }
        let next = self.next_of(id);
        (next != self.anchor).then_some(next)
    }

    pub fn get(&self, id: SlotId) -> Option<(&K, &V)> {
        self.arena
            .get(id)
            .and_then(|link| link.entry.as_ref())
            .map(|(key, value)| (key, value))
    }

    pub fn value_mut(&mut self, id: SlotId) -> Option<&mut V> {
        self.arena
            .get_mut(id)
            .and_then(|link| link.entry.as_mut())
            .map(|(_, value)| value)
    }

    pub fn oldest(&self) -> Option<(&K, &V)> {
        self.oldest_id().and_then(|id| self.get(id))
    }

    pub fn newest(&self) -> Option<(&K, &V)> {
        self.newest_id().and_then(|id| self.get(id))
    }

    /// Inserts an entry just before the anchor (newest position).
    pub fn push_newest(&mut self, key: K, value: V) -> SlotId {
        let anchor = self.anchor;
        let newest = self.prev_of(anchor);
        let id = self.arena.insert(Link {
            prev: newest,
            next: anchor,
            entry: Some((key, value)),
        });
        self.set_next(newest, id);
        self.set_prev(anchor, id);
        id
    }

    /// Moves a live entry to the newest position; returns `false` if `id` is
    /// not a live entry.
    pub fn move_to_newest(&mut self, id: SlotId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.prev_of(self.anchor) == id {
            return true;
        }
        self.unlink(id);
        let anchor = self.anchor;
        let newest = self.prev_of(anchor);
        if let Some(link) = self.arena.get_mut(id) {
            link.prev = newest;
            link.next = anchor;
        }
        self.set_next(newest, id);
        self.set_prev(anchor, id);
        true
    }

    /// Unlinks and frees a live entry, returning it.
    pub fn remove(&mut self, id: SlotId) -> Option<(K, V)> {
        if !self.contains(id) {
            return None;
        }
        self.unlink(id);
        self.arena.remove(id).and_then(|link| link.entry)
    }

    pub fn pop_oldest(&mut self) -> Option<(K, V)> {
        let id = self.oldest_id()?;
        self.remove(id)
    }

    pub fn pop_newest(&mut self) -> Option<(K, V)> {
        let id = self.newest_id()?;
        self.remove(id)
    }

    /// Evicts the oldest entry by rotating the anchor.
    ///
    /// The new entry is written into the current anchor slot and the oldest
    /// node becomes the anchor. Returns the evicted entry and the handle now
    /// holding `(key, value)`. On an empty list the arguments are handed back
    /// in `Err` untouched.
    pub fn rotate_anchor(&mut self, key: K, value: V) -> Result<((K, V), SlotId), (K, V)> {
        let old_anchor = self.anchor;
        let oldest = self.next_of(old_anchor);
        if oldest == old_anchor {
            return Err((key, value));
        }
        let evicted = match self.arena.get_mut(oldest).and_then(|link| link.entry.take()) {
            Some(entry) => entry,
            None => return Err((key, value)),
        };
        if let Some(link) = self.arena.get_mut(old_anchor) {
            link.entry = Some((key, value));
        }
        self.anchor = oldest;
        Ok((evicted, old_anchor))
    }

    /// Drops every entry and resets to a fresh anchor-only list.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.anchor = Self::insert_anchor(&mut self.arena);
    }

    /// Iterates entries from oldest to newest.
    pub fn iter(&self) -> RecencyIter<'_, K, V> {
        RecencyIter {
            list: self,
            current: self.oldest_id(),
            remaining: self.len(),
        }
    }

    /// Iterates entry handles from oldest to newest.
    pub fn iter_ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        let mut current = self.oldest_id();
        std::iter::from_fn(move || {
            let id = current?;
            current = self.successor(id);
            Some(id)
        })
    }

    /// Walks the ring and checks the anchor and link invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let anchor = self
            .arena
            .get(self.anchor)
            .ok_or_else(|| InvariantError::new("anchor slot is vacant"))?;
        if anchor.entry.is_some() {
            return Err(InvariantError::new("anchor carries an entry"));
        }

        let mut seen = 0usize;
        let mut current = self.anchor;
        loop {
            let link = self
                .arena
                .get(current)
                .ok_or_else(|| InvariantError::new("link points at a vacant slot"))?;
            let next = self
                .arena
                .get(link.next)
                .ok_or_else(|| InvariantError::new("next points at a vacant slot"))?;
            if next.prev != current {
                return Err(InvariantError::new("next.prev does not point back"));
            }
            current = link.next;
            if current == self.anchor {
                break;
            }
            if self.arena.get(current).and_then(|l| l.entry.as_ref()).is_none() {
                return Err(InvariantError::new("non-anchor node without an entry"));
            }
            seen += 1;
            if seen > self.len() {
                return Err(InvariantError::new("ring longer than arena population"));
            }
        }

        if seen != self.len() {
            return Err(InvariantError::new(format!(
                "ring holds {} entries, arena holds {}",
                seen,
                self.len()
            )));
        }
        Ok(())
    }

    fn next_of(&self, id: SlotId) -> SlotId {
        self.arena.get(id).map_or(self.anchor, |link| link.next)
    }

    fn prev_of(&self, id: SlotId) -> SlotId {
        self.arena.get(id).map_or(self.anchor, |link| link.prev)
    }

    fn set_next(&mut self, id: SlotId, next: SlotId) {
        if let Some(link) = self.arena.get_mut(id) {
            link.next = next;
        }
    }

    fn set_prev(&mut self, id: SlotId, prev: SlotId) {
        if let Some(link) = self.arena.get_mut(id) {
            link.prev = prev;
        }
    }

    fn unlink(&mut self, id: SlotId) {
        let (prev, next) = match self.arena.get(id) {
            Some(link) => (link.prev, link.next),
            None => return,
        };
        self.set_next(prev, next);
        self.set_prev(next, prev);
        if let Some(link) = self.arena.get_mut(id) {
            link.prev = id;
            link.next = id;
        }
    }
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(&K, &V)` from oldest to newest.
pub struct RecencyIter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    current: Option<SlotId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for RecencyIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.list.successor(id);
        self.remaining = self.remaining.saturating_sub(1);
        self.list.get(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for RecencyIter<'_, K, V> {}

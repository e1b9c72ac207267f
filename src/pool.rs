//! Generic entity arena with deferred removal.
//!
//! Items live in index-stable slots; freed slots are recycled through a free
//! list.  Removal is two-phase: `mark_for_removal` only flags a slot, and
//! `commit_removals` frees every flagged slot at the end of the frame.  Marked
//! items are skipped by the alive iterators, so a body destroyed mid-frame is
//! never integrated or collided again, and no traversal ever observes a slot
//! vanishing under it.

use std::collections::HashMap;

use crate::entities::{Body, EntityId};

/// Anything that can be stored in an [`EntityPool`].
pub trait Pooled {
    fn id(&self) -> EntityId;
}

impl Pooled for Body {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Outcome of visiting one alive item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Remove,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    item: T,
    marked: bool,
}

#[derive(Clone, Debug)]
pub struct EntityPool<T> {
    slots: Vec<Option<Slot<T>>>,
    free: Vec<usize>,
    index: HashMap<EntityId, usize>,
    /// Marked ids in marking order, so commits report removals deterministically.
    pending: Vec<EntityId>,
}

impl<T> Default for EntityPool<T> {
    fn default() -> Self {
        EntityPool {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            pending: Vec::new(),
        }
    }
}

impl<T: Pooled> EntityPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `item`, reusing a freed slot when one is available.
    pub fn add(&mut self, item: T) -> EntityId {
        let id = item.id();
        debug_assert!(!self.index.contains_key(&id), "duplicate entity id {id:?}");
        let slot = Some(Slot { item, marked: false });
        let at = match self.free.pop() {
            Some(i) => {
                self.slots[i] = slot;
                i
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };
        self.index.insert(id, at);
        id
    }

    /// Flag `id` for removal at the next commit.  Returns `false` if the id is
    /// unknown or already marked.
    pub fn mark_for_removal(&mut self, id: EntityId) -> bool {
        let Some(&at) = self.index.get(&id) else {
            return false;
        };
        match self.slots[at].as_mut() {
            Some(slot) if !slot.marked => {
                slot.marked = true;
                self.pending.push(id);
                true
            }
            _ => false,
        }
    }

    pub fn is_marked(&self, id: EntityId) -> bool {
        self.slot(id).is_some_and(|s| s.marked)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slot(id).map(|s| &s.item)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        let at = *self.index.get(&id)?;
        self.slots[at].as_mut().map(|s| &mut s.item)
    }

    /// Unmarked items in slot order.
    pub fn iter_alive(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots
            .iter()
            .flatten()
            .filter(|s| !s.marked)
            .map(|s| &s.item)
    }

    /// Visit every unmarked item exactly once.  Items the visitor rejects are
    /// marked, not removed; they stay in place until `commit_removals`.
    pub fn for_each_alive<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut T) -> Verdict,
    {
        for slot in self.slots.iter_mut().flatten() {
            if slot.marked {
                continue;
            }
            if visit(&mut slot.item) == Verdict::Remove {
                slot.marked = true;
                self.pending.push(slot.item.id());
            }
        }
    }

    /// Free every marked slot.  Returns the removed ids in marking order.
    pub fn commit_removals(&mut self) -> Vec<EntityId> {
        let removed = std::mem::take(&mut self.pending);
        for id in &removed {
            if let Some(at) = self.index.remove(id) {
                self.slots[at] = None;
                self.free.push(at);
            }
        }
        removed
    }

    /// Population, including items marked but not yet committed.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn slot(&self, id: EntityId) -> Option<&Slot<T>> {
        let at = *self.index.get(&id)?;
        self.slots[at].as_ref()
    }
}

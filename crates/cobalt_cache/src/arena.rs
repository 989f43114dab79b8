//! Stable-slot storage for cache keys.
//!
//! Descriptors can be large, and the indices that reference them must stay
//! valid while the surrounding hash maps grow and rehash.  `Arena` gives each
//! record a generation-checked slot: the record is stored exactly once, the
//! slot never dangles, and freeing returns ownership so `Drop` runs exactly
//! once per record.

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable reference to a record inside an [`Arena`].
    pub struct KeySlot;
}

/// Slot allocator for out-of-line key records.
#[derive(Debug)]
pub struct Arena<T> {
    slots: SlotMap<KeySlot, T>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
        }
    }

    /// Pre-sizes the pool; existing slots stay valid.
    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    /// Stores `value` and returns its slot.
    pub fn alloc(&mut self, value: T) -> KeySlot {
        self.slots.insert(value)
    }

    /// Releases a slot, returning the record it held.
    ///
    /// A stale slot (already freed) yields `None`: the generation check
    /// turns what would be a use-after-free into a visible miss.
    pub fn free(&mut self, slot: KeySlot) -> Option<T> {
        self.slots.remove(slot)
    }

    pub fn get(&self, slot: KeySlot) -> Option<&T> {
        self.slots.get(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_free_roundtrip() {
        let mut arena = Arena::new();
        let slot = arena.alloc(String::from("layout"));
        assert_eq!(arena.get(slot).map(String::as_str), Some("layout"));
        assert_eq!(arena.free(slot).as_deref(), Some("layout"));
        assert!(arena.is_empty());
    }

    #[test]
    fn stale_slot_misses() {
        let mut arena = Arena::new();
        let slot = arena.alloc(1u32);
        arena.free(slot);
        assert!(arena.get(slot).is_none());
        assert!(arena.free(slot).is_none());
    }

    #[test]
    fn slots_survive_growth() {
        let mut arena = Arena::with_capacity(1);
        let first = arena.alloc(0u32);
        for i in 1..256u32 {
            arena.alloc(i);
        }
        assert_eq!(arena.get(first), Some(&0));
    }
}

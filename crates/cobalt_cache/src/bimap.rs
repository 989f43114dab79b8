//! Bidirectional map between large keys and small values.
//!
//! The shape is deliberately asymmetric.  Keys (content descriptors) can be
//! big, so each one is stored exactly once in an [`Arena`] and both indices
//! refer to it by [`KeySlot`]: growth and rehashing move 8-byte slots and
//! handles around, never the descriptors themselves.  Values (object
//! handles) are tiny and copied freely into both indices.
//!
//! The forward index maps a seeded content hash to a (nearly always
//! single-entry) bucket of `(slot, value)` pairs; lookups resolve hash
//! collisions by comparing actual key content.  The backward index is a
//! plain hash map from value to slot.  Every removal clears both indices and
//! frees the slot in one step, so no operation can leave a dangling
//! cross-reference.

use std::hash::{BuildHasher, Hash};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use xxhash_rust::xxh3::Xxh3Builder;

use crate::arena::{Arena, KeySlot};

/// Seed for the content hash, fixed so equal content hashes equally across
/// cache instances within a run.
const CONTENT_HASH_SEED: u64 = 0xC0BA_17D0_5EED_CA5E;

type Bucket<V> = SmallVec<[(KeySlot, V); 1]>;

/// Two-way map: key content → value, value → key.
///
/// `K` needs only `Hash + Eq`; `V` must be a cheap `Copy` token (an object
/// handle).  The hasher `S` is seeded xxh3 by default.
pub struct Bimap<K, V, S = Xxh3Builder> {
    keys: Arena<K>,
    forward: FxHashMap<u64, Bucket<V>>,
    backward: FxHashMap<V, KeySlot>,
    hasher: S,
}

impl<K, V> Bimap<K, V>
where
    K: Hash + Eq,
    V: Copy + Hash + Eq,
{
    pub fn new() -> Self {
        Self::with_hasher(Xxh3Builder::new().with_seed(CONTENT_HASH_SEED))
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut map = Self::new();
        map.reserve(capacity);
        map
    }
}

impl<K, V> Default for Bimap<K, V>
where
    K: Hash + Eq,
    V: Copy + Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Bimap<K, V, S>
where
    K: Hash + Eq,
    V: Copy + Hash + Eq,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            keys: Arena::new(),
            forward: FxHashMap::default(),
            backward: FxHashMap::default(),
            hasher,
        }
    }

    /// Pre-sizes key storage and both indices.
    pub fn reserve(&mut self, additional: usize) {
        self.keys.reserve(additional);
        self.forward.reserve(additional);
        self.backward.reserve(additional);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True iff both indices hold nothing.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.backward.is_empty()
    }

    /// Looks up by key content.
    pub fn find(&self, key: &K) -> Option<(KeySlot, V)> {
        let hash = self.hasher.hash_one(key);
        let bucket = self.forward.get(&hash)?;
        bucket
            .iter()
            .find(|(slot, _)| self.keys.get(*slot).map_or(false, |stored| stored == key))
            .copied()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.find(key).map(|(_, value)| value)
    }

    /// Looks up the key a value was inserted with.
    pub fn key_for(&self, value: &V) -> Option<(KeySlot, &K)> {
        let slot = *self.backward.get(value)?;
        let key = self
            .keys
            .get(slot)
            .expect("backward index referenced a freed key slot");
        Some((slot, key))
    }

    /// Inserts a new pair, storing `key` out of line.
    ///
    /// The caller must have checked for an existing equal key (via
    /// [`Bimap::find`]); inserting a duplicate key or value would corrupt
    /// the one-entry-per-content invariant, and is debug-asserted.
    pub fn insert(&mut self, key: K, value: V) -> KeySlot {
        debug_assert!(self.find(&key).is_none(), "insert of a key already present");
        debug_assert!(
            !self.backward.contains_key(&value),
            "insert of a value already present"
        );
        let hash = self.hasher.hash_one(&key);
        let slot = self.keys.alloc(key);
        self.forward.entry(hash).or_default().push((slot, value));
        self.backward.insert(value, slot);
        slot
    }

    /// Removes the entry holding `value`; returns the owned key.
    ///
    /// Clears both indices and frees the slot; the key's `Drop` runs when
    /// the returned value goes out of scope.
    pub fn remove_by_value(&mut self, value: &V) -> Option<K> {
        let slot = self.backward.remove(value)?;
        let key = self
            .keys
            .free(slot)
            .expect("backward index referenced a freed key slot");
        self.unlink_forward(&key, slot);
        Some(key)
    }

    /// Removes the entry whose key content equals `key`.
    pub fn remove_by_key(&mut self, key: &K) -> Option<(K, V)> {
        let (slot, value) = self.find(key)?;
        let removed = self.backward.remove(&value);
        debug_assert!(removed.is_some(), "forward entry had no backward twin");
        let owned = self
            .keys
            .free(slot)
            .expect("forward index referenced a freed key slot");
        self.unlink_forward(&owned, slot);
        Some((owned, value))
    }

    /// Entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.backward.iter().map(move |(value, &slot)| {
            let key = self
                .keys
                .get(slot)
                .expect("backward index referenced a freed key slot");
            (key, value)
        })
    }

    fn unlink_forward(&mut self, key: &K, slot: KeySlot) {
        let hash = self.hasher.hash_one(key);
        let bucket = self
            .forward
            .get_mut(&hash)
            .expect("forward index missing the bucket for a live key");
        bucket.retain(|&mut (s, _)| s != slot);
        if bucket.is_empty() {
            self.forward.remove(&hash);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::hash::Hasher;
    use std::rc::Rc;

    #[test]
    fn round_trip_identity() {
        let mut map: Bimap<String, u32> = Bimap::new();
        map.insert("ten".to_owned(), 10);
        let (slot, value) = map.find(&"ten".to_owned()).unwrap();
        assert_eq!(value, 10);
        let (back_slot, key) = map.key_for(&10).unwrap();
        assert_eq!(back_slot, slot);
        assert_eq!(key, "ten");
    }

    #[test]
    fn erase_clears_both_directions() {
        let mut map: Bimap<i32, &'static str> = Bimap::new();
        map.insert(10, "ten");
        map.insert(20, "twenty");

        assert_eq!(map.get(&10), Some("ten"));
        assert_eq!(map.key_for(&"twenty").map(|(_, k)| *k), Some(20));

        assert_eq!(map.remove_by_key(&10), Some((10, "ten")));
        assert_eq!(map.get(&10), None);
        assert!(map.key_for(&"ten").is_none());

        // the other entry is untouched
        assert_eq!(map.get(&20), Some("twenty"));
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());

        assert_eq!(map.remove_by_value(&"twenty"), Some(20));
        assert!(map.is_empty());
    }

    #[test]
    fn bidirectional_consistency_after_churn() {
        let mut map: Bimap<String, u64> = Bimap::new();
        for i in 0..64u64 {
            map.insert(format!("desc-{i}"), i);
        }
        for i in (0..64u64).step_by(2) {
            map.remove_by_value(&i);
        }
        assert_eq!(map.len(), 32);
        for (key, &value) in map.iter() {
            let (_, found_key) = map.key_for(&value).unwrap();
            assert_eq!(found_key, key);
            assert_eq!(map.get(key), Some(value));
        }
    }

    #[test]
    fn reserve_keeps_entries_findable() {
        let mut map: Bimap<String, u32> = Bimap::new();
        map.insert("a".to_owned(), 1);
        map.reserve(1024);
        assert_eq!(map.get(&"a".to_owned()), Some(1));
    }

    // Key type that counts live instances, for leak/double-free checks.
    struct Tracked {
        id: u32,
        live: Rc<Cell<i64>>,
    }

    impl Tracked {
        fn new(id: u32, live: &Rc<Cell<i64>>) -> Self {
            live.set(live.get() + 1);
            Self {
                id,
                live: Rc::clone(live),
            }
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    impl PartialEq for Tracked {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    impl Eq for Tracked {}

    impl Hash for Tracked {
        fn hash<H: Hasher>(&self, state: &mut H) {
            state.write_u32(self.id);
        }
    }

    #[test]
    fn every_key_dropped_exactly_once() {
        let live = Rc::new(Cell::new(0i64));
        {
            let mut map: Bimap<Tracked, u32> = Bimap::new();
            for i in 0..16 {
                map.insert(Tracked::new(i, &live), i);
            }
            assert_eq!(live.get(), 16);

            for i in 0..8 {
                let key = map.remove_by_value(&i).unwrap();
                drop(key);
            }
            assert_eq!(live.get(), 8);
        }
        // map dropped: remaining keys released by the arena
        assert_eq!(live.get(), 0);
    }

    #[test]
    #[should_panic(expected = "already present")]
    fn duplicate_insert_is_asserted() {
        let mut map: Bimap<i32, u32> = Bimap::new();
        map.insert(1, 100);
        map.insert(1, 200);
    }
}

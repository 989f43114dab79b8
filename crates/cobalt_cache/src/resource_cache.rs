//! Create-or-reuse / release-or-destroy policy over a [`Bimap`].
//!
//! A cache entry moves through three states: absent, cached with n
//! references, absent again.  The first `create` for a given content
//! actually creates the driver object; later `create`s with equal content
//! just bump the count and return the same handle; `destroy` decrements and
//! only the last one reaches the driver.  The descriptor alone is the
//! identity; the reference count lives beside the slot, never inside the
//! hashed key.

use std::fmt::Debug;
use std::hash::Hash;

use slotmap::SecondaryMap;

use cobalt_gpu::{Driver, DriverError};

use crate::arena::KeySlot;
use crate::bimap::Bimap;

/// A descriptor kind the cache knows how to realize through a [`Driver`].
pub trait CachedResource: Eq + Hash {
    type Handle: Copy + Eq + Hash + Debug;

    /// Shown in logs and panic messages.
    const KIND: &'static str;

    fn create_resource(&self, driver: &mut dyn Driver) -> Result<Self::Handle, DriverError>;

    fn destroy_resource(driver: &mut dyn Driver, handle: Self::Handle);
}

/// Running counters for one cache.
///
/// `misses` equals the number of driver-side creations; `hits` are requests
/// served without touching the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub destroyed: u64,
}

/// Ref-counted, content-addressed cache of driver objects.
///
/// Single-threaded by construction: every operation takes `&mut self`, so
/// sharing a cache across threads requires external synchronization, and the
/// borrow checker will say so.
pub struct ResourceCache<R: CachedResource> {
    entries: Bimap<R, R::Handle>,
    refs: SecondaryMap<KeySlot, u32>,
    stats: CacheStats,
}

impl<R: CachedResource> ResourceCache<R> {
    pub fn new() -> Self {
        Self {
            entries: Bimap::new(),
            refs: SecondaryMap::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut cache = Self::new();
        cache.reserve(capacity);
        cache
    }

    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    /// Number of distinct objects currently cached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Returns a handle for `desc`, creating the driver object only if no
    /// equal content is cached.  Driver failures propagate unchanged.
    pub fn create(&mut self, driver: &mut dyn Driver, desc: R) -> Result<R::Handle, DriverError> {
        if let Some((slot, handle)) = self.entries.find(&desc) {
            self.refs[slot] += 1;
            self.stats.hits += 1;
            return Ok(handle);
        }

        let handle = desc.create_resource(driver)?;
        let slot = self.entries.insert(desc, handle);
        self.refs.insert(slot, 1);
        self.stats.misses += 1;
        log::debug!(
            "{}: created {:?} ({} distinct objects live)",
            R::KIND,
            handle,
            self.entries.len()
        );
        Ok(handle)
    }

    /// Releases one reference to `handle`; destroys the driver object when
    /// the last reference goes away.
    ///
    /// # Panics
    /// If `handle` is not live in this cache (double-destroy, or a handle
    /// this cache never issued).
    pub fn destroy(&mut self, driver: &mut dyn Driver, handle: R::Handle) {
        let slot = self
            .entries
            .key_for(&handle)
            .map(|(slot, _)| slot)
            .unwrap_or_else(|| {
                panic!("{}: destroy of a handle that is not cached: {handle:?}", R::KIND)
            });

        let refs = self
            .refs
            .get_mut(slot)
            .expect("cache entry lost its reference count");
        *refs -= 1;
        if *refs > 0 {
            return;
        }

        self.refs.remove(slot);
        let key = self.entries.remove_by_value(&handle);
        debug_assert!(key.is_some(), "backward lookup vanished during destroy");
        R::destroy_resource(driver, handle);
        self.stats.destroyed += 1;
        log::debug!(
            "{}: destroyed {:?} ({} distinct objects live)",
            R::KIND,
            handle,
            self.entries.len()
        );
    }

    /// Teardown hook.  A non-empty cache here means some owner skipped its
    /// `destroy`; that is a programming error and trips a debug assertion.
    /// Release builds reclaim the survivors instead of leaking device
    /// objects.
    pub fn terminate(&mut self, driver: &mut dyn Driver) {
        if self.entries.is_empty() {
            return;
        }

        log::warn!(
            "{}: {} object(s) still referenced at terminate",
            R::KIND,
            self.entries.len()
        );
        debug_assert!(
            self.entries.is_empty(),
            "{}: cache not empty at terminate",
            R::KIND
        );

        let survivors: Vec<R::Handle> = self.entries.iter().map(|(_, &handle)| handle).collect();
        for handle in survivors {
            if self.entries.remove_by_value(&handle).is_some() {
                R::destroy_resource(driver, handle);
                self.stats.destroyed += 1;
            }
        }
        self.refs.clear();
    }
}

impl<R: CachedResource> Default for ResourceCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

//! A driver with no GPU behind it.
//!
//! `HeadlessDriver` mints sequential ids and keeps the descriptors it was
//! given, nothing more.  That is exactly what tests, demos and GPU-less CI
//! machines need: create/destroy bookkeeping that can be asserted on.

use rustc_hash::FxHashMap;

use crate::bind_layout::BindGroupLayoutDesc;
use crate::driver::{Driver, DriverError};
use crate::handle::{BindGroupLayoutHandle, VertexLayoutHandle};
use crate::vertex_layout::VertexLayoutDesc;

/// Running create/destroy totals for one object kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectCounts {
    pub created: u64,
    pub destroyed: u64,
}

/// Driver that tracks objects without talking to any device.
#[derive(Debug, Default)]
pub struct HeadlessDriver {
    next_id: u32,
    live_layouts: FxHashMap<u32, BindGroupLayoutDesc>,
    live_vertex_layouts: FxHashMap<u32, VertexLayoutDesc>,
    layout_counts: ObjectCounts,
    vertex_layout_counts: ObjectCounts,
}

impl HeadlessDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_id(&mut self) -> u32 {
        // id 0 is never issued so a zeroed handle is visibly bogus
        self.next_id += 1;
        self.next_id
    }

    /// Create/destroy totals for bind-group layouts.
    pub fn bind_group_layout_counts(&self) -> ObjectCounts {
        self.layout_counts
    }

    /// Create/destroy totals for vertex layouts.
    pub fn vertex_layout_counts(&self) -> ObjectCounts {
        self.vertex_layout_counts
    }

    /// Number of objects currently alive, both kinds combined.
    pub fn live_objects(&self) -> usize {
        self.live_layouts.len() + self.live_vertex_layouts.len()
    }

    /// The descriptor a live bind-group layout was created from.
    pub fn bind_group_layout_desc(
        &self,
        handle: BindGroupLayoutHandle,
    ) -> Option<&BindGroupLayoutDesc> {
        self.live_layouts.get(&handle.id())
    }
}

impl Driver for HeadlessDriver {
    fn create_bind_group_layout(
        &mut self,
        desc: &BindGroupLayoutDesc,
    ) -> Result<BindGroupLayoutHandle, DriverError> {
        let id = self.mint_id();
        self.live_layouts.insert(id, desc.clone());
        self.layout_counts.created += 1;
        log::trace!("headless: created bind group layout #{id}");
        Ok(BindGroupLayoutHandle::new(id))
    }

    fn destroy_bind_group_layout(&mut self, handle: BindGroupLayoutHandle) {
        let removed = self.live_layouts.remove(&handle.id());
        assert!(
            removed.is_some(),
            "destroy of bind group layout #{} which is not alive",
            handle.id()
        );
        self.layout_counts.destroyed += 1;
        log::trace!("headless: destroyed bind group layout #{}", handle.id());
    }

    fn create_vertex_layout(
        &mut self,
        desc: &VertexLayoutDesc,
    ) -> Result<VertexLayoutHandle, DriverError> {
        let id = self.mint_id();
        self.live_vertex_layouts.insert(id, *desc);
        self.vertex_layout_counts.created += 1;
        log::trace!("headless: created vertex layout #{id}");
        Ok(VertexLayoutHandle::new(id))
    }

    fn destroy_vertex_layout(&mut self, handle: VertexLayoutHandle) {
        let removed = self.live_vertex_layouts.remove(&handle.id());
        assert!(
            removed.is_some(),
            "destroy of vertex layout #{} which is not alive",
            handle.id()
        );
        self.vertex_layout_counts.destroyed += 1;
        log::trace!("headless: destroyed vertex layout #{}", handle.id());
    }
}

//! Vertex-layout deduplication.
//!
//! Vertex layouts are byte-identity descriptors: every mesh using the
//! standard position/normal/uv packing resolves to the same record, so one
//! cached object serves the whole scene.

use cobalt_gpu::{Driver, DriverError, VertexLayoutDesc, VertexLayoutHandle};

use crate::resource_cache::{CachedResource, ResourceCache};

impl CachedResource for VertexLayoutDesc {
    type Handle = VertexLayoutHandle;

    const KIND: &'static str = "vertex layout cache";

    fn create_resource(&self, driver: &mut dyn Driver) -> Result<Self::Handle, DriverError> {
        driver.create_vertex_layout(self)
    }

    fn destroy_resource(driver: &mut dyn Driver, handle: Self::Handle) {
        driver.destroy_vertex_layout(handle);
    }
}

/// Create-or-reuse cache for vertex layouts.
pub type VertexLayoutCache = ResourceCache<VertexLayoutDesc>;

#[cfg(test)]
mod tests {
    use super::*;
    use cobalt_gpu::{HeadlessDriver, VertexAttribute, VertexFormat};

    fn mesh_layout() -> VertexLayoutDesc {
        VertexLayoutDesc::new(1)
            .with_attribute(VertexAttribute::new(VertexFormat::Float32x3, 0, 0, 32))
            .with_attribute(VertexAttribute::new(VertexFormat::Float32x3, 0, 12, 32))
            .with_attribute(VertexAttribute::new(VertexFormat::Float32x2, 0, 24, 32))
    }

    #[test]
    fn equal_layouts_share_one_object() {
        let mut driver = HeadlessDriver::new();
        let mut cache = VertexLayoutCache::new();

        let a = cache.create(&mut driver, mesh_layout()).unwrap();
        let b = cache.create(&mut driver, mesh_layout()).unwrap();

        assert_eq!(a, b);
        assert_eq!(driver.vertex_layout_counts().created, 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn separately_built_but_equal_content_hits() {
        let mut driver = HeadlessDriver::new();
        let mut cache = VertexLayoutCache::new();

        // same content assembled through a different sequence of calls;
        // unused slots stay zeroed either way, so the bytes match
        let piecewise = {
            let position = VertexAttribute::new(VertexFormat::Float32x3, 0, 0, 32);
            let normal = VertexAttribute::new(VertexFormat::Float32x3, 0, 12, 32);
            let uv = VertexAttribute::new(VertexFormat::Float32x2, 0, 24, 32);
            VertexLayoutDesc::new(1)
                .with_attribute(position)
                .with_attribute(normal)
                .with_attribute(uv)
        };

        let a = cache.create(&mut driver, mesh_layout()).unwrap();
        let b = cache.create(&mut driver, piecewise).unwrap();

        assert_eq!(a, b);
        assert_eq!(driver.vertex_layout_counts().created, 1);
    }

    #[test]
    fn attribute_order_is_part_of_identity() {
        let mut driver = HeadlessDriver::new();
        let mut cache = VertexLayoutCache::new();

        let position_first = VertexLayoutDesc::new(1)
            .with_attribute(VertexAttribute::new(VertexFormat::Float32x3, 0, 0, 24))
            .with_attribute(VertexAttribute::new(VertexFormat::Float32x3, 0, 12, 24));
        let normal_first = VertexLayoutDesc::new(1)
            .with_attribute(VertexAttribute::new(VertexFormat::Float32x3, 0, 12, 24))
            .with_attribute(VertexAttribute::new(VertexFormat::Float32x3, 0, 0, 24));

        // attribute order maps to shader locations, so these are different
        // layouts on purpose
        let a = cache.create(&mut driver, position_first).unwrap();
        let b = cache.create(&mut driver, normal_first).unwrap();
        assert_ne!(a, b);
        assert_eq!(driver.vertex_layout_counts().created, 2);

        cache.destroy(&mut driver, a);
        cache.destroy(&mut driver, b);
        cache.terminate(&mut driver);
        assert_eq!(driver.live_objects(), 0);
    }

    #[test]
    fn refcount_symmetry() {
        let mut driver = HeadlessDriver::new();
        let mut cache = VertexLayoutCache::new();

        let handle = cache.create(&mut driver, mesh_layout()).unwrap();
        let again = cache.create(&mut driver, mesh_layout()).unwrap();
        assert_eq!(handle, again);

        cache.destroy(&mut driver, handle);
        assert_eq!(driver.vertex_layout_counts().destroyed, 0);
        cache.destroy(&mut driver, handle);
        assert_eq!(driver.vertex_layout_counts().destroyed, 1);
        assert!(cache.is_empty());
    }
}

//! Bind-group-layout deduplication.
//!
//! Layout objects are the poster child for content-addressed caching: a
//! scene's materials request the same handful of layouts thousands of times
//! per frame, and drivers charge real cost per distinct object.

use cobalt_gpu::{BindGroupLayoutDesc, BindGroupLayoutHandle, Driver, DriverError};

use crate::resource_cache::{CachedResource, ResourceCache};

impl CachedResource for BindGroupLayoutDesc {
    type Handle = BindGroupLayoutHandle;

    const KIND: &'static str = "bind group layout cache";

    fn create_resource(&self, driver: &mut dyn Driver) -> Result<Self::Handle, DriverError> {
        driver.create_bind_group_layout(self)
    }

    fn destroy_resource(driver: &mut dyn Driver, handle: Self::Handle) {
        driver.destroy_bind_group_layout(handle);
    }
}

/// Create-or-reuse cache for bind-group layouts.
pub type BindGroupLayoutCache = ResourceCache<BindGroupLayoutDesc>;

//! The driver trait: the narrow seam between content descriptors and real
//! GPU objects.
//!
//! Callers above this trait (the caches in `cobalt_cache`) never look inside
//! a handle; they only need create/destroy pairs.  Backends below it own
//! the objects and may fail at creation time; those failures propagate
//! through unchanged, this layer adds no wrapping of its own.

use thiserror::Error;

use crate::bind_layout::BindGroupLayoutDesc;
use crate::handle::{BindGroupLayoutHandle, VertexLayoutHandle};
use crate::vertex_layout::VertexLayoutDesc;

/// Errors a backend can raise while creating an object.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("device out of memory")]
    OutOfMemory,
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(&'static str),
    #[error("backend error: {0}")]
    Backend(String),
}

/// GPU object creation and destruction.
///
/// Implementations hand out handles whose ids are stable for the object's
/// lifetime.  Destroying a handle the implementation did not issue (or one
/// already destroyed) is a caller bug; implementations are free to panic.
pub trait Driver {
    fn create_bind_group_layout(
        &mut self,
        desc: &BindGroupLayoutDesc,
    ) -> Result<BindGroupLayoutHandle, DriverError>;

    fn destroy_bind_group_layout(&mut self, handle: BindGroupLayoutHandle);

    fn create_vertex_layout(
        &mut self,
        desc: &VertexLayoutDesc,
    ) -> Result<VertexLayoutHandle, DriverError>;

    fn destroy_vertex_layout(&mut self, handle: VertexLayoutHandle);
}

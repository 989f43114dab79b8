//! `cobalt_gpu` — the driver boundary of the Cobalt renderer.
//!
//! # Module layout
//!
//! | Module          | Responsibility                                        |
//! |-----------------|-------------------------------------------------------|
//! | `handle`        | Opaque, copyable ids for driver-owned objects         |
//! | `bind_layout`   | Bind-group-layout descriptor (canonicalized bindings) |
//! | `vertex_layout` | Vertex-layout descriptor (fixed-size plain data)      |
//! | `driver`        | The `Driver` trait + `DriverError`                    |
//! | `headless`      | GPU-less driver for tests, demos and CI               |
//! | `wgpu_driver`   | Real-device driver (feature `wgpu`)                   |
//!
//! Everything above the `Driver` trait treats driver objects as opaque: a
//! handle is just an id with equality and hashing, and a descriptor is just
//! content.  That is deliberate; it lets the caching layer in `cobalt_cache`
//! decide whether two requests are the same object without ever talking to a
//! device.
pub mod bind_layout;
pub mod driver;
pub mod handle;
pub mod headless;
pub mod vertex_layout;

#[cfg(feature = "wgpu")]
pub mod wgpu_driver;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use bind_layout::{BindGroupLayoutDesc, BindingFlags, BindingKind, LayoutBinding, ShaderStages};
pub use driver::{Driver, DriverError};
pub use handle::{BindGroupLayoutHandle, VertexLayoutHandle};
pub use headless::HeadlessDriver;
pub use vertex_layout::{
    VertexAttribute, VertexFormat, VertexLayoutDesc, MAX_VERTEX_ATTRIBUTES, MAX_VERTEX_BUFFERS,
};

#[cfg(feature = "wgpu")]
pub use wgpu_driver::WgpuDriver;

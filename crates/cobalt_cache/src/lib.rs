//! `cobalt_cache` — content-addressed, ref-counted caches for driver objects.
//!
//! Creating a GPU object is expensive and stateful; a renderer that asks for
//! the same bind-group layout once per material must still end up with one
//! driver object, and that object must die exactly when its last user lets
//! go.  This crate provides that policy and the data structure behind it.
//!
//! # Module layout
//!
//! | Module           | Responsibility                                      |
//! |------------------|-----------------------------------------------------|
//! | `arena`          | Stable-slot storage for out-of-line key records     |
//! | `bimap`          | Two-way content↔handle index over the arena         |
//! | `resource_cache` | Generic create-or-reuse / release-or-destroy policy |
//! | `layout_cache`   | Bind-group-layout instantiation                     |
//! | `vertex_cache`   | Vertex-layout instantiation                         |
//!
//! # Quick start
//! ```rust,ignore
//! use cobalt_cache::BindGroupLayoutCache;
//! use cobalt_gpu::{BindGroupLayoutDesc, BindingKind, HeadlessDriver, LayoutBinding, ShaderStages};
//!
//! let mut driver = HeadlessDriver::new();
//! let mut layouts = BindGroupLayoutCache::new();
//!
//! let desc = BindGroupLayoutDesc::new(vec![
//!     LayoutBinding::new(0, BindingKind::UniformBuffer, ShaderStages::VERTEX),
//! ]);
//! let handle = layouts.create(&mut driver, desc.clone())?;
//! let same = layouts.create(&mut driver, desc)?;   // cache hit, same handle
//!
//! layouts.destroy(&mut driver, handle);
//! layouts.destroy(&mut driver, same);              // driver object destroyed here
//! layouts.terminate(&mut driver);
//! ```
pub mod arena;
pub mod bimap;
pub mod layout_cache;
pub mod resource_cache;
pub mod vertex_cache;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use arena::{Arena, KeySlot};
pub use bimap::Bimap;
pub use layout_cache::BindGroupLayoutCache;
pub use resource_cache::{CacheStats, CachedResource, ResourceCache};
pub use vertex_cache::VertexLayoutCache;

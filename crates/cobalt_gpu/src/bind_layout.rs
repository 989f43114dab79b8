//! Bind-group-layout descriptor: the content that decides whether two layout
//! requests are the same GPU object.
//!
//! A [`BindGroupLayoutDesc`] is canonicalized on construction (bindings are
//! sorted by binding index), so two callers listing the same bindings in
//! different orders produce descriptors that compare and hash equal.  The
//! binding list is private to make that canonical form impossible to bypass.

use bitflags::bitflags;

bitflags! {
    /// Shader stages that can see a binding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStages: u8 {
        const VERTEX   = 1 << 0;
        const FRAGMENT = 1 << 1;
        const COMPUTE  = 1 << 2;
    }
}

bitflags! {
    /// Per-binding behavior flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BindingFlags: u8 {
        /// The buffer is bound once and addressed with a per-draw byte
        /// offset instead of a per-draw bind-group switch.
        const DYNAMIC_OFFSET = 1 << 0;
    }
}

/// What kind of resource a binding slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BindingKind {
    UniformBuffer,
    StorageBuffer,
    Sampler,
    SampledTexture,
}

/// One slot of a bind-group layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutBinding {
    /// Binding index within the group (`@binding(n)` on the shader side).
    pub binding: u16,
    pub kind: BindingKind,
    pub stages: ShaderStages,
    /// Array size; 1 for a plain binding.
    pub count: u16,
    pub flags: BindingFlags,
}

impl LayoutBinding {
    /// A plain (non-array, no flags) binding.
    pub fn new(binding: u16, kind: BindingKind, stages: ShaderStages) -> Self {
        Self {
            binding,
            kind,
            stages,
            count: 1,
            flags: BindingFlags::empty(),
        }
    }

    pub fn with_count(mut self, count: u16) -> Self {
        self.count = count;
        self
    }

    pub fn with_flags(mut self, flags: BindingFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Canonicalized bind-group-layout content.
///
/// Equality and hashing are element-wise over the sorted binding list, which
/// is exactly the identity a layout cache needs: same bindings, same object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindGroupLayoutDesc {
    bindings: Vec<LayoutBinding>,
}

impl BindGroupLayoutDesc {
    /// Builds a descriptor, sorting `bindings` by binding index.
    ///
    /// Binding indices must be unique within a group; a duplicate is a caller
    /// bug and trips a debug assertion.
    pub fn new(mut bindings: Vec<LayoutBinding>) -> Self {
        bindings.sort_by_key(|b| b.binding);
        debug_assert!(
            bindings.windows(2).all(|w| w[0].binding != w[1].binding),
            "duplicate binding index in bind-group layout"
        );
        Self { bindings }
    }

    /// The bindings, sorted by binding index.
    pub fn bindings(&self) -> &[LayoutBinding] {
        &self.bindings
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::{BuildHasher, RandomState};

    fn ub(binding: u16) -> LayoutBinding {
        LayoutBinding::new(binding, BindingKind::UniformBuffer, ShaderStages::VERTEX)
    }

    #[test]
    fn construction_sorts_bindings() {
        let desc = BindGroupLayoutDesc::new(vec![ub(5), ub(0), ub(2)]);
        let indices: Vec<u16> = desc.bindings().iter().map(|b| b.binding).collect();
        assert_eq!(indices, vec![0, 2, 5]);
    }

    #[test]
    fn binding_order_does_not_affect_identity() {
        let a = BindGroupLayoutDesc::new(vec![ub(2), ub(5)]);
        let b = BindGroupLayoutDesc::new(vec![ub(5), ub(2)]);
        assert_eq!(a, b);

        let s = RandomState::new();
        assert_eq!(s.hash_one(&a), s.hash_one(&b));
    }

    #[test]
    fn different_content_differs() {
        let a = BindGroupLayoutDesc::new(vec![ub(0)]);
        let b = BindGroupLayoutDesc::new(vec![ub(0).with_count(4)]);
        let c = BindGroupLayoutDesc::new(vec![LayoutBinding::new(
            0,
            BindingKind::Sampler,
            ShaderStages::FRAGMENT,
        )]);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}

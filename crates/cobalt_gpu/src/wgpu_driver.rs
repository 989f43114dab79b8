//! Real-device driver backed by `wgpu`.
//!
//! Bind-group layouts become `wgpu::BindGroupLayout` objects; vertex layouts
//! stay CPU-side (wgpu consumes them only at pipeline creation) and are
//! exposed as `wgpu::VertexBufferLayout` views over per-buffer attribute
//! tables kept alive by the driver.

use std::num::NonZeroU32;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::bind_layout::{BindGroupLayoutDesc, BindingFlags, BindingKind, ShaderStages};
use crate::driver::{Driver, DriverError};
use crate::handle::{BindGroupLayoutHandle, VertexLayoutHandle};
use crate::vertex_layout::{VertexFormat, VertexLayoutDesc};

/// Converted vertex layout: one stride + attribute table per vertex buffer.
struct VertexLayoutRecord {
    strides: Vec<wgpu::BufferAddress>,
    attributes: Vec<Vec<wgpu::VertexAttribute>>,
}

/// Driver that realizes descriptors on a `wgpu::Device`.
pub struct WgpuDriver {
    device: Arc<wgpu::Device>,
    next_id: u32,
    layouts: FxHashMap<u32, wgpu::BindGroupLayout>,
    vertex_layouts: FxHashMap<u32, VertexLayoutRecord>,
}

impl WgpuDriver {
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self {
            device,
            next_id: 0,
            layouts: FxHashMap::default(),
            vertex_layouts: FxHashMap::default(),
        }
    }

    fn mint_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// The live `wgpu::BindGroupLayout` behind a handle.
    pub fn bind_group_layout(&self, handle: BindGroupLayoutHandle) -> Option<&wgpu::BindGroupLayout> {
        self.layouts.get(&handle.id())
    }

    /// Buffer layouts for `wgpu::VertexState::buffers`, one per vertex buffer.
    pub fn vertex_buffer_layouts(
        &self,
        handle: VertexLayoutHandle,
    ) -> Option<Vec<wgpu::VertexBufferLayout<'_>>> {
        let record = self.vertex_layouts.get(&handle.id())?;
        Some(
            record
                .strides
                .iter()
                .zip(&record.attributes)
                .map(|(&array_stride, attributes)| wgpu::VertexBufferLayout {
                    array_stride,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes,
                })
                .collect(),
        )
    }
}

fn stage_flags(stages: ShaderStages) -> wgpu::ShaderStages {
    let mut out = wgpu::ShaderStages::NONE;
    if stages.contains(ShaderStages::VERTEX) {
        out |= wgpu::ShaderStages::VERTEX;
    }
    if stages.contains(ShaderStages::FRAGMENT) {
        out |= wgpu::ShaderStages::FRAGMENT;
    }
    if stages.contains(ShaderStages::COMPUTE) {
        out |= wgpu::ShaderStages::COMPUTE;
    }
    out
}

fn binding_type(kind: BindingKind, flags: BindingFlags) -> wgpu::BindingType {
    match kind {
        BindingKind::UniformBuffer => wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: flags.contains(BindingFlags::DYNAMIC_OFFSET),
            min_binding_size: None,
        },
        BindingKind::StorageBuffer => wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: false },
            has_dynamic_offset: flags.contains(BindingFlags::DYNAMIC_OFFSET),
            min_binding_size: None,
        },
        BindingKind::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        BindingKind::SampledTexture => wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
    }
}

fn vertex_format(format: VertexFormat) -> wgpu::VertexFormat {
    match format {
        VertexFormat::Float32 => wgpu::VertexFormat::Float32,
        VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
        VertexFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
        VertexFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
        VertexFormat::Uint32 => wgpu::VertexFormat::Uint32,
        VertexFormat::Sint32 => wgpu::VertexFormat::Sint32,
        VertexFormat::Unorm8x4 => wgpu::VertexFormat::Unorm8x4,
        VertexFormat::Uint16x2 => wgpu::VertexFormat::Uint16x2,
    }
}

fn convert_vertex_layout(desc: &VertexLayoutDesc) -> VertexLayoutRecord {
    let buffer_count = desc.buffer_count() as usize;
    let mut strides = vec![0 as wgpu::BufferAddress; buffer_count];
    let mut attributes: Vec<Vec<wgpu::VertexAttribute>> = vec![Vec::new(); buffer_count];

    // declaration order doubles as shader-location order
    for (location, attr) in desc.attributes().iter().enumerate() {
        let buffer = attr.buffer as usize;
        debug_assert!(
            strides[buffer] == 0 || strides[buffer] == attr.stride as wgpu::BufferAddress,
            "attributes of buffer {buffer} disagree on stride"
        );
        strides[buffer] = attr.stride as wgpu::BufferAddress;
        attributes[buffer].push(wgpu::VertexAttribute {
            format: vertex_format(attr.format()),
            offset: attr.offset as wgpu::BufferAddress,
            shader_location: location as u32,
        });
    }

    VertexLayoutRecord { strides, attributes }
}

impl Driver for WgpuDriver {
    fn create_bind_group_layout(
        &mut self,
        desc: &BindGroupLayoutDesc,
    ) -> Result<BindGroupLayoutHandle, DriverError> {
        let entries: Vec<wgpu::BindGroupLayoutEntry> = desc
            .bindings()
            .iter()
            .map(|b| wgpu::BindGroupLayoutEntry {
                binding: b.binding as u32,
                visibility: stage_flags(b.stages),
                ty: binding_type(b.kind, b.flags),
                count: if b.count > 1 {
                    NonZeroU32::new(b.count as u32)
                } else {
                    None
                },
            })
            .collect();

        // wgpu reports creation failures through device error scopes; from
        // this call's perspective layout creation does not fail
        let layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("cobalt bind group layout"),
                entries: &entries,
            });

        let id = self.mint_id();
        self.layouts.insert(id, layout);
        Ok(BindGroupLayoutHandle::new(id))
    }

    fn destroy_bind_group_layout(&mut self, handle: BindGroupLayoutHandle) {
        let removed = self.layouts.remove(&handle.id());
        assert!(
            removed.is_some(),
            "destroy of bind group layout #{} which is not alive",
            handle.id()
        );
        // dropping the wgpu object releases it
    }

    fn create_vertex_layout(
        &mut self,
        desc: &VertexLayoutDesc,
    ) -> Result<VertexLayoutHandle, DriverError> {
        let id = self.mint_id();
        self.vertex_layouts.insert(id, convert_vertex_layout(desc));
        Ok(VertexLayoutHandle::new(id))
    }

    fn destroy_vertex_layout(&mut self, handle: VertexLayoutHandle) {
        let removed = self.vertex_layouts.remove(&handle.id());
        assert!(
            removed.is_some(),
            "destroy of vertex layout #{} which is not alive",
            handle.id()
        );
    }
}

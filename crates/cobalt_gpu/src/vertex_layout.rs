//! Vertex-layout descriptor: a fixed-size, plain-data record describing how
//! vertex buffers and attributes feed a pipeline.
//!
//! Identity is byte-for-byte: two descriptors are the same layout iff their
//! raw bytes match, and the content hash walks those bytes as 32-bit words.
//! That only works if every byte is deterministic, so the struct derives
//! `bytemuck::Pod` (which refuses implicit padding), keeps its one reserved
//! gap as an explicit field, and is only constructed from zeroed memory.

use std::hash::{Hash, Hasher};

use bytemuck::{Pod, Zeroable};

/// Most attributes a single vertex layout can carry.
pub const MAX_VERTEX_ATTRIBUTES: usize = 16;

/// Most vertex buffers a single layout can source from.
pub const MAX_VERTEX_BUFFERS: usize = 8;

/// Data format of one vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VertexFormat {
    Float32 = 0,
    Float32x2 = 1,
    Float32x3 = 2,
    Float32x4 = 3,
    Uint32 = 4,
    Sint32 = 5,
    Unorm8x4 = 6,
    Uint16x2 = 7,
}

impl VertexFormat {
    /// Size of one element of this format in bytes.
    pub fn size_bytes(self) -> u32 {
        match self {
            VertexFormat::Float32 | VertexFormat::Uint32 | VertexFormat::Sint32 => 4,
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
            VertexFormat::Unorm8x4 => 4,
            VertexFormat::Uint16x2 => 4,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => VertexFormat::Float32,
            1 => VertexFormat::Float32x2,
            2 => VertexFormat::Float32x3,
            3 => VertexFormat::Float32x4,
            4 => VertexFormat::Uint32,
            5 => VertexFormat::Sint32,
            6 => VertexFormat::Unorm8x4,
            7 => VertexFormat::Uint16x2,
            _ => return None,
        })
    }
}

/// One vertex attribute: where it lives and how to read it.
///
/// 8 bytes, no padding.  The format is stored as its `u8` code so the whole
/// record stays `Pod`; use [`VertexAttribute::format`] for the typed view.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct VertexAttribute {
    /// Byte offset of the attribute within its buffer's vertex stride.
    pub offset: u32,
    /// Byte stride between consecutive vertices in the source buffer.
    pub stride: u16,
    /// Index of the source vertex buffer.
    pub buffer: u8,
    format: u8,
}

impl VertexAttribute {
    pub fn new(format: VertexFormat, buffer: u8, offset: u32, stride: u16) -> Self {
        Self {
            offset,
            stride,
            buffer,
            format: format as u8,
        }
    }

    pub fn format(&self) -> VertexFormat {
        VertexFormat::from_code(self.format).expect("vertex attribute holds an invalid format code")
    }
}

/// Fixed-size vertex-layout content.
///
/// Unused attribute slots and the reserved gap are always zero, so the
/// byte-wise equality below can never be perturbed by stale memory.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct VertexLayoutDesc {
    buffer_count: u8,
    attribute_count: u8,
    // kept explicit so the record has no implicit padding anywhere
    _reserved: [u8; 2],
    attributes: [VertexAttribute; MAX_VERTEX_ATTRIBUTES],
}

// the content hash reads the record as 32-bit words
const _: () = assert!(std::mem::size_of::<VertexLayoutDesc>() % 4 == 0);

impl VertexLayoutDesc {
    /// An empty layout sourcing from `buffer_count` vertex buffers.
    ///
    /// # Panics
    /// If `buffer_count` exceeds [`MAX_VERTEX_BUFFERS`].
    pub fn new(buffer_count: u8) -> Self {
        assert!(
            (buffer_count as usize) <= MAX_VERTEX_BUFFERS,
            "vertex layout uses {buffer_count} buffers, max is {MAX_VERTEX_BUFFERS}"
        );
        let mut desc = Self::zeroed();
        desc.buffer_count = buffer_count;
        desc
    }

    /// Appends an attribute.
    ///
    /// # Panics
    /// If the layout is full or `attr.buffer` is out of range.
    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        assert!(
            (self.attribute_count as usize) < MAX_VERTEX_ATTRIBUTES,
            "vertex layout already holds {MAX_VERTEX_ATTRIBUTES} attributes"
        );
        assert!(
            attr.buffer < self.buffer_count,
            "attribute sources from buffer {} but the layout declares {}",
            attr.buffer,
            self.buffer_count
        );
        self.attributes[self.attribute_count as usize] = attr;
        self.attribute_count += 1;
        self
    }

    pub fn buffer_count(&self) -> u8 {
        self.buffer_count
    }

    pub fn attribute_count(&self) -> u8 {
        self.attribute_count
    }

    /// The populated attributes, in declaration order (declaration order is
    /// also the shader-location order backends use).
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes[..self.attribute_count as usize]
    }
}

impl PartialEq for VertexLayoutDesc {
    fn eq(&self, other: &Self) -> bool {
        bytemuck::bytes_of(self) == bytemuck::bytes_of(other)
    }
}

impl Eq for VertexLayoutDesc {}

impl Hash for VertexLayoutDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let words: &[u32] = bytemuck::cast_slice(bytemuck::bytes_of(self));
        for word in words {
            state.write_u32(*word);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::{BuildHasher, RandomState};

    fn position_attr() -> VertexAttribute {
        VertexAttribute::new(VertexFormat::Float32x3, 0, 0, 24)
    }

    fn normal_attr() -> VertexAttribute {
        VertexAttribute::new(VertexFormat::Float32x3, 0, 12, 24)
    }

    #[test]
    fn identical_construction_is_byte_identical() {
        let a = VertexLayoutDesc::new(1)
            .with_attribute(position_attr())
            .with_attribute(normal_attr());
        let b = VertexLayoutDesc::new(1)
            .with_attribute(position_attr())
            .with_attribute(normal_attr());
        assert_eq!(a, b);

        let s = RandomState::new();
        assert_eq!(s.hash_one(a), s.hash_one(b));
    }

    #[test]
    fn differing_content_differs() {
        let a = VertexLayoutDesc::new(1).with_attribute(position_attr());
        let b = VertexLayoutDesc::new(1).with_attribute(normal_attr());
        let c = VertexLayoutDesc::new(2).with_attribute(position_attr());
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn attribute_roundtrip() {
        let attr = VertexAttribute::new(VertexFormat::Unorm8x4, 0, 4, 8);
        let desc = VertexLayoutDesc::new(1).with_attribute(attr);
        let got = desc.attributes()[0];
        assert_eq!(got.format(), VertexFormat::Unorm8x4);
        assert_eq!(got.offset, 4);
        assert_eq!(got.stride, 8);
        assert_eq!(got.buffer, 0);
    }

    #[test]
    #[should_panic(expected = "sources from buffer")]
    fn attribute_buffer_out_of_range_panics() {
        let _ = VertexLayoutDesc::new(1).with_attribute(VertexAttribute::new(
            VertexFormat::Float32,
            1,
            0,
            4,
        ));
    }

    #[test]
    fn format_sizes() {
        assert_eq!(VertexFormat::Float32x3.size_bytes(), 12);
        assert_eq!(VertexFormat::Unorm8x4.size_bytes(), 4);
        assert_eq!(VertexFormat::Uint16x2.size_bytes(), 4);
    }
}

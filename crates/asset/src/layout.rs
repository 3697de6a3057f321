//! Vertex attribute slots and byte views for buffer upload.
//!
//! Each attribute lives in its own tightly packed buffer bound to a fixed
//! shader location; one `u32` element buffer indexes all of them.

use crate::mesh::Mesh;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Position,
    TexCoord,
    Normal,
    Tangent,
    Bitangent,
}

/// One per-vertex attribute stream: shader location plus float count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    pub kind: AttributeKind,
    pub slot: u32,
    pub components: u32,
}

impl VertexAttribute {
    pub const POSITION: Self = Self::new(AttributeKind::Position, 0, 3);
    pub const TEX_COORD: Self = Self::new(AttributeKind::TexCoord, 1, 2);
    pub const NORMAL: Self = Self::new(AttributeKind::Normal, 2, 3);
    pub const TANGENT: Self = Self::new(AttributeKind::Tangent, 13, 3);
    pub const BITANGENT: Self = Self::new(AttributeKind::Bitangent, 14, 3);

    pub const fn new(kind: AttributeKind, slot: u32, components: u32) -> Self {
        Self {
            kind,
            slot,
            components,
        }
    }

    /// Same attribute bound to a different shader location.
    pub const fn at_slot(self, slot: u32) -> Self {
        Self { slot, ..self }
    }

    /// Byte distance between consecutive vertices in this attribute's buffer.
    pub const fn stride(&self) -> u64 {
        self.components as u64 * std::mem::size_of::<f32>() as u64
    }
}

/// Position, texcoord and normal at slots 0/1/2.
pub const BASIC_LAYOUT: [VertexAttribute; 3] = [
    VertexAttribute::POSITION,
    VertexAttribute::TEX_COORD,
    VertexAttribute::NORMAL,
];

/// Basic layout plus tangent frames for normal mapping.
pub const TANGENT_LAYOUT: [VertexAttribute; 5] = [
    VertexAttribute::POSITION,
    VertexAttribute::TEX_COORD,
    VertexAttribute::NORMAL,
    VertexAttribute::TANGENT,
    VertexAttribute::BITANGENT,
];

impl Mesh {
    pub fn attribute(&self, kind: AttributeKind) -> &[f32] {
        match kind {
            AttributeKind::Position => &self.positions,
            AttributeKind::TexCoord => &self.tex_coords,
            AttributeKind::Normal => &self.normals,
            AttributeKind::Tangent => &self.tangents,
            AttributeKind::Bitangent => &self.bitangents,
        }
    }

    pub fn attribute_bytes(&self, attribute: VertexAttribute) -> &[u8] {
        bytemuck::cast_slice(self.attribute(attribute.kind))
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// The layout matching the attributes this mesh actually carries.
    pub fn layout(&self) -> &'static [VertexAttribute] {
        if self.has_tangents() {
            &TANGENT_LAYOUT
        } else {
            &BASIC_LAYOUT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_follow_component_count() {
        assert_eq!(VertexAttribute::POSITION.stride(), 12);
        assert_eq!(VertexAttribute::TEX_COORD.stride(), 8);
        assert_eq!(VertexAttribute::NORMAL.at_slot(7).slot, 7);
    }

    #[test]
    fn byte_views_cover_arrays() {
        let mesh = Mesh {
            positions: vec![1.0; 9],
            tex_coords: vec![0.5; 6],
            normals: vec![0.0; 9],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        assert_eq!(mesh.attribute_bytes(VertexAttribute::POSITION).len(), 36);
        assert_eq!(mesh.attribute_bytes(VertexAttribute::TEX_COORD).len(), 24);
        assert_eq!(mesh.index_bytes().len(), 12);
        assert_eq!(mesh.layout(), &BASIC_LAYOUT);
        for attr in mesh.layout() {
            let expected = mesh.vertex_count() as u64 * attr.stride();
            assert_eq!(mesh.attribute_bytes(*attr).len() as u64, expected);
        }
    }
}

//! Trail vertex format and the layout descriptors handed to the GPU layer

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{utils, Vec3};

/// Interleaved position + normal vertex
///
/// `#[repr(C)]` keeps the field order stable so the merged buffer can be
/// uploaded as raw bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],

    /// Facing direction, the camera view direction for trails
    pub normal: [f32; 3],
}

impl Vertex {
    /// Layout of [`Vertex`] as seen by the upload layer
    pub const LAYOUT: [VertexAttributeDescriptor; 2] = [
        VertexAttributeDescriptor {
            attribute: VertexAttribute::Position,
            format: VertexFormat::Float32,
            dimension: 3,
            offset: 0,
        },
        VertexAttributeDescriptor {
            attribute: VertexAttribute::Normal,
            format: VertexFormat::Float32,
            dimension: 3,
            offset: 12,
        },
    ];

    /// Create a new vertex
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: utils::vec3_to_array(&position),
            normal: utils::vec3_to_array(&normal),
        }
    }

    /// Position as a vector
    pub fn position(&self) -> Vec3 {
        utils::vec3_from_array(self.position)
    }

    /// Normal as a vector
    pub fn normal(&self) -> Vec3 {
        utils::vec3_from_array(self.normal)
    }

    /// Size of one vertex in bytes
    pub const fn stride() -> usize {
        std::mem::size_of::<Self>()
    }
}

/// Semantic of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    /// World position
    Position,
    /// Surface normal
    Normal,
}

/// Component type of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// 32-bit float
    Float32,
}

/// One attribute within the interleaved vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttributeDescriptor {
    /// Attribute semantic
    pub attribute: VertexAttribute,
    /// Component type
    pub format: VertexFormat,
    /// Number of components
    pub dimension: u32,
    /// Byte offset within the vertex
    pub offset: u32,
}

/// Index width of the merged buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// 32-bit unsigned indices
    UInt32,
}

/// Primitive topology of a sub-mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshTopology {
    /// Every three indices form one triangle
    Triangles,
}

/// Region of the index buffer drawn as one sub-mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubMeshDescriptor {
    /// Primitive topology
    pub topology: MeshTopology,
    /// First index of the region
    pub index_start: usize,
    /// Number of indices in the region
    pub index_count: usize,
    /// Number of vertices referenced by the region
    pub vertex_count: usize,
}

impl SubMeshDescriptor {
    /// Triangle list covering a whole buffer
    pub fn whole_triangle_list(vertex_count: usize, index_count: usize) -> Self {
        Self {
            topology: MeshTopology::Triangles,
            index_start: 0,
            index_count,
            vertex_count,
        }
    }
}

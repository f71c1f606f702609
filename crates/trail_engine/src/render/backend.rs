//! Render boundary for merged trail meshes
//!
//! The compositor calls [`TrailRenderBackend::upload_trail_mesh`] at most
//! once per frame with one mesh covering every visible trail. Backends own
//! the GPU side; this crate never touches a graphics API.

use thiserror::Error;

use super::vertex::{IndexFormat, SubMeshDescriptor, Vertex, VertexAttributeDescriptor};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Errors reported by a render backend
#[derive(Error, Debug)]
pub enum RenderError {
    /// GPU buffer creation or resize failed
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// Uploading or drawing the mesh failed
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),
}

/// Everything the upload layer needs for one frame's trail mesh
#[derive(Debug, Clone, Copy)]
pub struct MeshUpload<'a> {
    /// Interleaved vertices
    pub vertices: &'a [Vertex],
    /// Vertex attribute layout
    pub layout: &'a [VertexAttributeDescriptor],
    /// Triangle indices into `vertices`
    pub indices: &'a [u32],
    /// Index width
    pub index_format: IndexFormat,
    /// The single sub-mesh spanning the whole buffer
    pub sub_mesh: SubMeshDescriptor,
}

impl<'a> MeshUpload<'a> {
    /// Describe a merged trail buffer
    pub fn new(vertices: &'a [Vertex], indices: &'a [u32]) -> Self {
        Self {
            vertices,
            layout: &Vertex::LAYOUT,
            indices,
            index_format: IndexFormat::UInt32,
            sub_mesh: SubMeshDescriptor::whole_triangle_list(vertices.len(), indices.len()),
        }
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Vertex data as raw bytes
    pub fn vertex_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.vertices)
    }

    /// Index data as raw bytes
    pub fn index_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.indices)
    }
}

/// Consumer of the per-frame merged trail mesh
pub trait TrailRenderBackend {
    /// Replace the trail mesh with this frame's geometry
    fn upload_trail_mesh(&mut self, upload: &MeshUpload<'_>) -> BackendResult<()>;
}
